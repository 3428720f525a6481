//! Speech gateway: the boundary between the assistant and the user's ears and mouth.
//!
//! Transcription failures never escape `listen`; they surface as `Utterance::NoInput`.

pub mod console;

pub use console::ConsoleGateway;

use async_trait::async_trait;
use std::time::Duration;

/// One transcribed unit of user speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    /// Lowercased transcript.
    Heard(String),
    /// Nothing usable was captured (timeout or unrecognized audio).
    NoInput,
}

impl Utterance {
    pub fn heard(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            Utterance::NoInput
        } else {
            Utterance::Heard(text)
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self, Utterance::NoInput)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Utterance::Heard(text) => Some(text),
            Utterance::NoInput => None,
        }
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Blocks for at most `timeout` waiting for speech.
    async fn listen(&self, timeout: Duration) -> Utterance;

    /// Synchronous for the caller; implementations must tolerate concurrent callers.
    async fn speak(&self, text: &str);
}
