//! HTTP client for the analysis/registration service.
//!
//! [`MoodApi`] is the seam the session client, history loader and workflow
//! depend on. [`ApiClient`] is the reqwest implementation. It maps transport
//! failures to [`MoodError::Connectivity`] and bodies that are not JSON to
//! [`MoodError::Protocol`]; interpreting the JSON (missing `session_id`,
//! missing `message`) is left to the callers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::config::Config;
use crate::error::MoodError;
use crate::models::{HistoryEntry, MoodEntry, UserProfile};

/// Remote operations the client consumes.
#[async_trait]
pub trait MoodApi: Send + Sync {
    /// `POST /register`. Returns the parsed response payload.
    async fn register(&self, profile: &UserProfile) -> Result<Value, MoodError>;

    /// `POST /generate-response/`. Returns the parsed response payload.
    async fn analyze(&self, entry: &MoodEntry) -> Result<Value, MoodError>;

    /// `GET /entries/{session_id}`.
    async fn entries(&self, session_id: &str) -> Result<Vec<HistoryEntry>, MoodError>;
}

/// HTTP client for the mood service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create with an explicit base URL and request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MoodError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &Config) -> Result<Self, MoodError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Read the body as text and parse it as JSON regardless of status.
    ///
    /// The service reports some failures as JSON with a success status and
    /// others as non-JSON error pages, so the body decides, not the status.
    async fn read_json(&self, response: reqwest::Response) -> Result<Value, MoodError> {
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Response {}: {}", status, body);

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Response body is not JSON ({}): {}", status, e);
            MoodError::Protocol {
                status: status.as_u16(),
                body,
            }
        })
    }
}

#[async_trait]
impl MoodApi for ApiClient {
    async fn register(&self, profile: &UserProfile) -> Result<Value, MoodError> {
        let response = self
            .request(Method::POST, "/register")
            .json(profile)
            .send()
            .await?;
        self.read_json(response).await
    }

    async fn analyze(&self, entry: &MoodEntry) -> Result<Value, MoodError> {
        let response = self
            .request(Method::POST, "/generate-response/")
            .json(entry)
            .send()
            .await?;
        self.read_json(response).await
    }

    async fn entries(&self, session_id: &str) -> Result<Vec<HistoryEntry>, MoodError> {
        // Push the session id as a path segment so it is percent-encoded.
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| MoodError::Connectivity(format!("invalid service URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| MoodError::Connectivity(format!("invalid service URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("entries")
            .push(session_id);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MoodError::Protocol {
                status: status.as_u16(),
                body,
            });
        }

        let payload = self.read_json(response).await?;
        serde_json::from_value(payload.clone()).map_err(|e| {
            tracing::warn!("History payload has unexpected shape: {}", e);
            MoodError::Protocol {
                status: status.as_u16(),
                body: payload.to_string(),
            }
        })
    }
}
