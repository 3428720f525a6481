use super::types::ControlSignal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChitchatRule {
    pub phrase: &'static str,
    pub response: &'static str,
    pub signal: ControlSignal,
}

/// Small-talk phrases and canned replies. Scanned in insertion order, first substring hit wins.
#[derive(Debug, Clone)]
pub struct ChitchatTable {
    rules: Vec<ChitchatRule>,
}

const fn reply(phrase: &'static str, response: &'static str) -> ChitchatRule {
    ChitchatRule { phrase, response, signal: ControlSignal::Continue }
}

impl Default for ChitchatTable {
    fn default() -> Self {
        Self {
            rules: vec![
                reply("good morning", "Good morning! Hope you're feeling refreshed."),
                reply("good afternoon", "Good afternoon! Ready to be productive?"),
                reply("good evening", "Good evening! Hope you had a great day."),
                reply("thank you", "You're welcome!"),
                reply("who created you", "I was created by Raza Ahamad using Rust."),
                reply("do you love me", "I'm code, but I like your vibe!"),
                reply("hello", "Hello! How can I assist you?"),
                reply("hi", "Hi there!"),
                reply("how are you", "All systems are go!"),
                reply("what's up", "Just waiting for your command."),
                reply("your name", "I'm your voice assistant."),
                ChitchatRule {
                    phrase: "bye",
                    response: "Goodbye! Talk soon.",
                    signal: ControlSignal::Exit,
                },
                ChitchatRule {
                    phrase: "stop",
                    response: "Okay, I'm going silent.",
                    signal: ControlSignal::Stop,
                },
            ],
        }
    }
}

impl ChitchatTable {
    pub fn new(rules: Vec<ChitchatRule>) -> Self {
        Self { rules }
    }

    pub fn lookup(&self, utterance: &str) -> Option<&ChitchatRule> {
        self.rules.iter().find(|rule| utterance.contains(rule.phrase))
    }

    pub fn rules(&self) -> &[ChitchatRule] {
        &self.rules
    }
}
