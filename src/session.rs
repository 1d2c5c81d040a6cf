//! Registration: exchanges a [`UserProfile`] for a session id and persists
//! the resulting identity.

use std::sync::Arc;

use serde_json::Value;

use crate::client::MoodApi;
use crate::error::MoodError;
use crate::models::{Session, UserProfile};
use crate::store::{self, IdentityStore, SESSION_ID_KEY, USER_AGE_KEY, USER_GENDER_KEY};

/// Owns the registration call. Holds no session state of its own; the
/// identity lives in the store.
#[derive(Clone)]
pub struct SessionClient {
    api: Arc<dyn MoodApi>,
    store: Arc<dyn IdentityStore>,
}

impl SessionClient {
    pub fn new(api: Arc<dyn MoodApi>, store: Arc<dyn IdentityStore>) -> Self {
        Self { api, store }
    }

    /// Register `profile` and persist the issued session.
    ///
    /// The previous session id is removed before anything is written and the
    /// new one is written last, so an interrupted registration never leaves
    /// an identity that the workflow would treat as ready.
    pub async fn register(&self, profile: &UserProfile) -> Result<Session, MoodError> {
        profile.validate()?;

        tracing::info!(
            "Registering profile (age {}, gender {})",
            profile.age,
            profile.gender
        );
        let payload = self.api.register(profile).await.inspect_err(|e| {
            tracing::error!("Registration request failed: {}", e);
        })?;

        let Some(session_id) = session_id_from_payload(&payload) else {
            tracing::warn!("Registration response has no session_id: {}", payload);
            return Err(MoodError::RegistrationRejected { payload });
        };

        self.persist(&session_id, profile).inspect_err(|e| {
            tracing::error!("Registered but failed to persist identity: {}", e);
        })?;

        tracing::info!("Registered session {}", session_id);
        Ok(Session {
            session_id,
            profile: profile.clone(),
        })
    }

    /// The stored session, if the identity is complete.
    pub fn current_session(&self) -> Result<Option<Session>, MoodError> {
        store::load_session(self.store.as_ref())
    }

    /// The stored profile attributes, with or without a session id.
    pub fn current_profile(&self) -> Result<Option<UserProfile>, MoodError> {
        store::load_profile(self.store.as_ref())
    }

    fn persist(&self, session_id: &str, profile: &UserProfile) -> Result<(), MoodError> {
        self.store.remove(SESSION_ID_KEY)?;
        self.store.set(USER_AGE_KEY, &profile.age.to_string())?;
        self.store.set(USER_GENDER_KEY, &profile.gender)?;
        self.store.set(SESSION_ID_KEY, session_id)?;
        Ok(())
    }
}

fn session_id_from_payload(payload: &Value) -> Option<String> {
    payload
        .get("session_id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}
