use serde::{Deserialize, Serialize};

/// The classified purpose of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Chitchat,
    OpenApp,
    TakeNote,
    ReadNotes,
    AddReminder,
    ReadReminders,
    TellTime,
    Joke,
    Weather,
    DefineWord,
    SearchVideo,
    /// Catch-all: handed to the information resolver.
    GenericQuery,
    /// Chitchat farewell that ends the session.
    Exit,
    /// The "no input" sentinel. Never routed.
    Silence,
}

/// Loop-control outcome of handling one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSignal {
    Continue,
    /// Handled; go quiet and wait for the next utterance.
    Stop,
    Exit,
}
