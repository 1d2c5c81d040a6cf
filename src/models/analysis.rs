use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Session;

/// Outbound journal entry, the `/generate-response/` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: String,
    pub age: u32,
    pub gender: String,
    pub session_id: String,
}

impl MoodEntry {
    pub fn new(text: impl Into<String>, session: &Session) -> Self {
        Self {
            mood: text.into(),
            age: session.profile.age,
            gender: session.profile.gender.clone(),
            session_id: session.session_id.clone(),
        }
    }
}

/// Supportive message and sentiment label for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub message: String,
    #[serde(default)]
    pub sentiment: String,
}

impl AnalysisResult {
    /// Extract a usable result from a response payload.
    ///
    /// Returns `None` when `message` is absent, not a string, or blank. A
    /// missing sentiment is tolerated and left empty.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let message = payload.get("message")?.as_str()?;
        if message.trim().is_empty() {
            return None;
        }
        let sentiment = payload
            .get("sentiment")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(Self {
            message: message.to_string(),
            sentiment: sentiment.to_string(),
        })
    }
}
