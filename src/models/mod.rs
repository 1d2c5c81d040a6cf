//! Domain models for the journaling client.
//!
//! # Core Concepts
//!
//! - [`UserProfile`]: Demographic attributes registered once and reused for
//!   every submission.
//! - [`Session`]: The server-issued session id together with the profile it
//!   was issued for. A session is the complete local identity.
//! - [`MoodEntry`]: Outbound journal entry. Exists only for one request.
//! - [`AnalysisResult`]: Supportive message and sentiment label returned for
//!   an entry.
//! - [`HistoryEntry`]: One past entry, used to render the mood trend.

mod analysis;
mod history;
mod profile;

pub use analysis::*;
pub use history::*;
pub use profile::*;
