//! Durable key-value storage for the local identity.
//!
//! The core never reaches for ambient storage; it receives an
//! [`IdentityStore`] at construction. Only three keys are ever written:
//! [`SESSION_ID_KEY`], [`USER_AGE_KEY`] and [`USER_GENDER_KEY`].

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::MoodError;
use crate::models::{Session, UserProfile};

pub const SESSION_ID_KEY: &str = "session_id";
pub const USER_AGE_KEY: &str = "user_age";
pub const USER_GENDER_KEY: &str = "user_gender";

/// Narrow read/write capability over a string-keyed store.
///
/// No atomicity across keys is assumed.
pub trait IdentityStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, MoodError>;

    fn set(&self, key: &str, value: &str) -> Result<(), MoodError>;

    fn remove(&self, key: &str) -> Result<(), MoodError>;
}

/// Read the stored identity.
///
/// Returns `Ok(None)` unless all three keys are present, non-empty, and the
/// age parses as a positive integer. A partial identity is never a session.
pub fn load_session(store: &dyn IdentityStore) -> Result<Option<Session>, MoodError> {
    let session_id = non_empty(store.get(SESSION_ID_KEY)?);
    let age = non_empty(store.get(USER_AGE_KEY)?);
    let gender = non_empty(store.get(USER_GENDER_KEY)?);

    let (Some(session_id), Some(age), Some(gender)) = (session_id, age, gender) else {
        return Ok(None);
    };

    let age = match age.trim().parse::<u32>() {
        Ok(age) if age > 0 => age,
        _ => {
            tracing::warn!("Stored age '{}' is not a positive integer, ignoring identity", age);
            return Ok(None);
        }
    };

    Ok(Some(Session {
        session_id,
        profile: UserProfile { age, gender },
    }))
}

/// Read whatever profile attributes are stored, even without a session id.
pub fn load_profile(store: &dyn IdentityStore) -> Result<Option<UserProfile>, MoodError> {
    let age = non_empty(store.get(USER_AGE_KEY)?).and_then(|a| a.trim().parse::<u32>().ok());
    let gender = non_empty(store.get(USER_GENDER_KEY)?);
    Ok(match (age, gender) {
        (Some(age), Some(gender)) if age > 0 => Some(UserProfile { age, gender }),
        _ => None,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
