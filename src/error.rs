//! Error taxonomy for the journaling client.
//!
//! Every failure the client can observe is a [`MoodError`]. The workflow
//! records failures as a [`FailureKind`] plus a human-readable detail string,
//! so the presentation layer can pick a message without matching on payloads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced by the session client, history loader and workflow.
#[derive(Debug, Error)]
pub enum MoodError {
    /// Required local input is missing or malformed. Never reaches the network.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No complete identity (session id, age, gender) is stored locally.
    #[error("Not registered: no complete session is stored on this device")]
    NotRegistered,

    /// The server answered with something that is not the expected JSON.
    #[error("Unreadable server response ({status}): {body}")]
    Protocol { status: u16, body: String },

    /// The server understood the registration but did not issue a session.
    #[error("Registration rejected: {payload}")]
    RegistrationRejected { payload: serde_json::Value },

    /// Transport-level failure: timeout, DNS, refused or reset connection.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// The analysis request was accepted but no message came back.
    #[error("Analysis returned no message: {payload}")]
    EmptyAnalysis { payload: serde_json::Value },

    /// A submission is already in flight on this workflow.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// The identity store could not be read or written.
    #[error("Identity store error: {0}")]
    Store(String),
}

impl MoodError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::NotRegistered => FailureKind::NotRegistered,
            Self::Protocol { .. } => FailureKind::Protocol,
            Self::RegistrationRejected { .. } => FailureKind::RegistrationRejected,
            Self::Connectivity(_) => FailureKind::Connectivity,
            Self::EmptyAnalysis { .. } => FailureKind::EmptyAnalysis,
            Self::SubmissionInProgress => FailureKind::SubmissionInProgress,
            Self::Store(_) => FailureKind::Store,
        }
    }
}

impl From<reqwest::Error> for MoodError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Connectivity(format!("request timed out: {}", err))
        } else {
            Self::Connectivity(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for MoodError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

/// The variant of a [`MoodError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    NotRegistered,
    Protocol,
    RegistrationRejected,
    Connectivity,
    EmptyAnalysis,
    SubmissionInProgress,
    Store,
}

impl FailureKind {
    /// Whether resubmitting the same input may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity | Self::EmptyAnalysis)
    }

    /// Short message suitable for showing to the person journaling.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please fill in all fields.",
            Self::NotRegistered => "Tell us a bit about you first.",
            Self::Protocol => "The server sent a response we could not read.",
            Self::RegistrationRejected => "Registration failed.",
            Self::Connectivity => "Something went wrong! Check your connection and try again.",
            Self::EmptyAnalysis => "No message came back for that entry. Try again.",
            Self::SubmissionInProgress => "Still analyzing your last entry.",
            Self::Store => "Could not access saved profile data.",
        }
    }
}
