use serde::{Deserialize, Serialize};

/// One past journal entry as returned by `/entries/{session_id}`.
///
/// Only the id and the emotion label are read; any other fields the server
/// sends are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub emotion: String,
}

/// Rendering class for a history entry.
///
/// - `Bright`: the entry was labelled "Happy"
/// - `Calm`: any other label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Bright,
    Calm,
}

impl HistoryEntry {
    pub fn tone(&self) -> Tone {
        if self.emotion == "Happy" {
            Tone::Bright
        } else {
            Tone::Calm
        }
    }
}
