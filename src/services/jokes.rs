use std::sync::atomic::{AtomicUsize, Ordering};

pub trait JokeSource: Send + Sync {
    fn joke(&self) -> String;
}

const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people: those who understand binary and those who don't.",
    "A SQL query walks into a bar, walks up to two tables and asks: can I join you?",
    "Why did the developer go broke? Because he used up all his cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "To understand recursion, you must first understand recursion.",
];

/// Cycles through a fixed set of programmer jokes.
#[derive(Debug, Default)]
pub struct BuiltinJokes {
    cursor: AtomicUsize,
}

impl BuiltinJokes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JokeSource for BuiltinJokes {
    fn joke(&self) -> String {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        JOKES[i % JOKES.len()].to_string()
    }
}
