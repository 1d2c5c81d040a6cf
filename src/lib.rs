//! Mood journaling client.
//!
//! A user registers an age and gender once; the service issues a session id
//! that is persisted in an [`store::IdentityStore`]. The
//! [`workflow::MoodWorkflow`] then submits journal entries for analysis one
//! at a time and loads the session's history in the background.

pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod models;
pub mod render;
pub mod session;
pub mod store;
pub mod workflow;

pub use error::{FailureKind, MoodError};
