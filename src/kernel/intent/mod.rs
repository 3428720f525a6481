//! Intent classification: chitchat table first, then the ordered keyword rules,
//! then the generic-query catch-all. A pure function of the utterance.

pub mod chitchat;
pub mod rules;
pub mod types;

pub use chitchat::{ChitchatRule, ChitchatTable};
pub use rules::{Pattern, Rule, RuleTable};
pub use types::{ControlSignal, Intent};

use crate::gateway::Utterance;

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    pub chitchat: ChitchatTable,
    pub rules: RuleTable,
}

impl Classifier {
    pub fn new(chitchat: ChitchatTable, rules: RuleTable) -> Self {
        Self { chitchat, rules }
    }

    pub fn classify(&self, utterance: &Utterance) -> Intent {
        match utterance {
            Utterance::NoInput => Intent::Silence,
            Utterance::Heard(text) => self.classify_text(text),
        }
    }

    pub fn classify_text(&self, text: &str) -> Intent {
        if let Some(rule) = self.chitchat.lookup(text) {
            return match rule.signal {
                ControlSignal::Exit => Intent::Exit,
                _ => Intent::Chitchat,
            };
        }
        self.rules.first_match(text).unwrap_or(Intent::GenericQuery)
    }
}
