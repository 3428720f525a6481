use super::types::Intent;

/// Keyword test applied to a lowercased utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Contains(&'static str),
    ContainsAll(&'static [&'static str]),
}

impl Pattern {
    pub fn matches(&self, utterance: &str) -> bool {
        match self {
            Pattern::Contains(keyword) => utterance.contains(keyword),
            Pattern::ContainsAll(keywords) => keywords.iter().all(|k| utterance.contains(k)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub intent: Intent,
}

/// Ordered keyword rules evaluated after chitchat. Rules overlap, so order is precedence.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

const fn rule(pattern: Pattern, intent: Intent) -> Rule {
    Rule { pattern, intent }
}

impl Default for RuleTable {
    fn default() -> Self {
        use Intent::*;
        use Pattern::*;

        Self {
            rules: vec![
                rule(Contains("open"), OpenApp),
                rule(ContainsAll(&["note", "take"]), TakeNote),
                rule(Contains("read note"), ReadNotes),
                rule(ContainsAll(&["remind", "add"]), AddReminder),
                rule(Contains("read reminder"), ReadReminders),
                rule(Contains("time"), TellTime),
                rule(Contains("joke"), Joke),
                rule(Contains("weather"), Weather),
                rule(Contains("meaning of"), DefineWord),
                rule(ContainsAll(&["search", "youtube"]), SearchVideo),
            ],
        }
    }
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn first_match(&self, utterance: &str) -> Option<Intent> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(utterance))
            .map(|rule| rule.intent)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Everything after "open", e.g. "open the calculator" -> "the calculator".
pub fn app_name(utterance: &str) -> &str {
    utterance
        .split_once("open")
        .map_or(utterance, |(_, rest)| rest)
        .trim()
}

/// The word following "meaning of", without trailing punctuation.
pub fn word_to_define(utterance: &str) -> &str {
    utterance
        .split_once("meaning of")
        .map_or(utterance, |(_, rest)| rest)
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
}

/// Strips the "search" and "on youtube" scaffolding, leaving the search term.
pub fn video_search_term(utterance: &str) -> String {
    utterance
        .replace("search", "")
        .replace("on youtube", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
