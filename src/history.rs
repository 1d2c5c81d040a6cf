//! Past mood entries for the trend panel.
//!
//! History is best effort: the workflow loads it once in the background and a
//! failure here never affects journaling.

use std::sync::Arc;

use crate::client::MoodApi;
use crate::error::MoodError;
use crate::models::HistoryEntry;

/// Fetches the past entries for a session.
///
/// Each call is one request and one snapshot; there is no paging or refresh.
#[derive(Clone)]
pub struct HistoryLoader {
    api: Arc<dyn MoodApi>,
}

impl HistoryLoader {
    pub fn new(api: Arc<dyn MoodApi>) -> Self {
        Self { api }
    }

    pub async fn load(&self, session_id: &str) -> Result<Vec<HistoryEntry>, MoodError> {
        tracing::debug!("Loading mood history for session {}", session_id);
        match self.api.entries(session_id).await {
            Ok(entries) => {
                tracing::info!("Loaded {} history entries", entries.len());
                Ok(entries)
            }
            Err(e) => {
                tracing::warn!("Failed to load mood history: {}", e);
                Err(e)
            }
        }
    }
}
