//! The mood submission workflow.
//!
//! [`MoodWorkflow`] coordinates the stored identity, the remote service and
//! the request lifecycle that drives the UI:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Succeeded(result) ─┐
//!  ▲                         └──▶ Failed(kind)      ─┤
//!  └──────────────── next submit ◀───────────────────┘
//! ```
//!
//! The workflow is a cheap, cloneable handle. State lives behind a mutex that
//! is never held across an await, so a second `submit` from a re-entrant UI
//! trigger sees `Submitting` and is rejected instead of racing the first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::client::MoodApi;
use crate::error::{FailureKind, MoodError};
use crate::history::HistoryLoader;
use crate::models::{AnalysisResult, HistoryEntry, MoodEntry, Session};
use crate::store::{self, IdentityStore};

/// Submission lifecycle. Exactly one of these holds at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed { kind: FailureKind, detail: String },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// True when the last submission failed in a way that resending the same
    /// text might fix. A protocol failure will fail the same way again.
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Failed { kind, .. } if kind.is_retryable())
    }
}

/// Whether a complete identity is available for submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// `initialize` has not run yet.
    Uninitialized,
    /// The store holds no complete identity.
    NotRegistered,
    Ready(Session),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Ready(session) => Some(session),
            _ => None,
        }
    }
}

/// Best-effort history side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryState {
    NotRequested,
    Loading,
    Loaded(Vec<HistoryEntry>),
    Failed(String),
}

impl HistoryState {
    pub fn entries(&self) -> &[HistoryEntry] {
        match self {
            Self::Loaded(entries) => entries,
            _ => &[],
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub readiness: Readiness,
    pub submission: SubmissionState,
    /// Current journal text. Cleared only by a usable analysis result.
    pub input: String,
    pub history: HistoryState,
}

#[derive(Debug)]
struct WorkflowInner {
    readiness: Readiness,
    submission: SubmissionState,
    input: String,
    history: HistoryState,
}

#[derive(Clone)]
pub struct MoodWorkflow {
    api: Arc<dyn MoodApi>,
    store: Arc<dyn IdentityStore>,
    inner: Arc<Mutex<WorkflowInner>>,
    history_settled: Arc<Notify>,
}

impl MoodWorkflow {
    pub fn new(api: Arc<dyn MoodApi>, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            api,
            store,
            inner: Arc::new(Mutex::new(WorkflowInner {
                readiness: Readiness::Uninitialized,
                submission: SubmissionState::Idle,
                input: String::new(),
                history: HistoryState::NotRequested,
            })),
            history_settled: Arc::new(Notify::new()),
        }
    }

    /// Read the stored identity and, the first time it is complete, start
    /// loading history in the background.
    ///
    /// Calling this again refreshes readiness from the store but never issues
    /// a second history request. Must be called from within a Tokio runtime.
    pub async fn initialize(&self) -> Result<Readiness, MoodError> {
        let loaded = store::load_session(self.store.as_ref());

        let (readiness, history_for) = {
            let mut inner = self.lock();
            let session = match loaded {
                Ok(session) => session,
                Err(e) => {
                    tracing::error!("Failed to read identity store: {}", e);
                    inner.readiness = Readiness::NotRegistered;
                    return Err(e);
                }
            };

            let mut history_for = None;
            inner.readiness = match session {
                Some(session) => {
                    if inner.history == HistoryState::NotRequested {
                        inner.history = HistoryState::Loading;
                        history_for = Some(session.session_id.clone());
                    }
                    Readiness::Ready(session)
                }
                None => Readiness::NotRegistered,
            };
            (inner.readiness.clone(), history_for)
        };

        match &readiness {
            Readiness::Ready(session) => {
                tracing::info!("Workflow ready for session {}", session.session_id)
            }
            _ => tracing::info!("No complete identity stored; registration required"),
        }

        if let Some(session_id) = history_for {
            self.spawn_history_load(session_id);
        }

        Ok(readiness)
    }

    fn spawn_history_load(&self, session_id: String) {
        let loader = HistoryLoader::new(self.api.clone());
        let inner = self.inner.clone();
        let settled = self.history_settled.clone();

        tokio::spawn(async move {
            let pending = PendingHistory {
                inner,
                settled,
                done: false,
            };
            let history = match loader.load(&session_id).await {
                Ok(entries) => HistoryState::Loaded(entries),
                Err(e) => HistoryState::Failed(e.to_string()),
            };
            pending.finish(history);
        });
    }

    /// Submit a journal entry for analysis.
    ///
    /// Precondition failures (`SubmissionInProgress`, `Validation`,
    /// `NotRegistered`) return immediately without a request and leave both
    /// the submission state and the preserved input alone. Every other
    /// outcome is both returned and recorded as `Succeeded` or `Failed`.
    pub async fn submit(&self, text: impl Into<String>) -> Result<AnalysisResult, MoodError> {
        let text = text.into();

        let entry = {
            let mut inner = self.lock();
            if inner.submission.is_submitting() {
                tracing::warn!("Submission rejected: another one is in flight");
                return Err(MoodError::SubmissionInProgress);
            }
            if text.trim().is_empty() {
                return Err(MoodError::validation("journal entry is empty"));
            }
            let Some(session) = inner.readiness.session() else {
                return Err(MoodError::NotRegistered);
            };

            let entry = MoodEntry::new(text.clone(), session);
            inner.input = text;
            inner.submission = SubmissionState::Submitting;
            entry
        };

        let in_flight = InFlight {
            inner: &self.inner,
            settled: false,
        };

        tracing::debug!(
            "Submitting entry for session {} ({} chars)",
            entry.session_id,
            entry.mood.chars().count()
        );
        let outcome = match self.api.analyze(&entry).await {
            Ok(payload) => match AnalysisResult::from_payload(&payload) {
                Some(result) => Ok(result),
                None => {
                    tracing::warn!("No message returned: {}", payload);
                    Err(MoodError::EmptyAnalysis { payload })
                }
            },
            Err(e) => {
                tracing::error!("Analyze mood failed: {}", e);
                Err(e)
            }
        };

        in_flight.settle(outcome)
    }

    /// Resubmit the preserved input after a retryable failure.
    pub async fn retry(&self) -> Result<AnalysisResult, MoodError> {
        let text = self.input();
        self.submit(text).await
    }

    /// Wait until the history request settles and return its state.
    ///
    /// Returns immediately if history was never requested or already settled.
    pub async fn wait_for_history(&self) -> HistoryState {
        loop {
            let settled = self.history_settled.notified();
            let history = self.lock().history.clone();
            if history != HistoryState::Loading {
                return history;
            }
            settled.await;
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let inner = self.lock();
        WorkflowSnapshot {
            readiness: inner.readiness.clone(),
            submission: inner.submission.clone(),
            input: inner.input.clone(),
            history: inner.history.clone(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().submission.clone()
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn readiness(&self) -> Readiness {
        self.lock().readiness.clone()
    }

    pub fn history(&self) -> HistoryState {
        self.lock().history.clone()
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowInner> {
        lock(&self.inner)
    }
}

fn lock(inner: &Mutex<WorkflowInner>) -> MutexGuard<'_, WorkflowInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks one submission as in flight. Records the outcome when settled and
/// returns the workflow to `Idle` if dropped unsettled (the submitting future
/// was cancelled or panicked).
struct InFlight<'a> {
    inner: &'a Mutex<WorkflowInner>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(
        mut self,
        outcome: Result<AnalysisResult, MoodError>,
    ) -> Result<AnalysisResult, MoodError> {
        let mut inner = lock(self.inner);
        match &outcome {
            Ok(result) => {
                tracing::info!("Analysis succeeded (sentiment: {})", result.sentiment);
                inner.input.clear();
                inner.submission = SubmissionState::Succeeded(result.clone());
            }
            Err(e) => {
                inner.submission = SubmissionState::Failed {
                    kind: e.kind(),
                    detail: e.to_string(),
                };
            }
        }
        self.settled = true;
        outcome
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = lock(self.inner);
        if inner.submission.is_submitting() {
            tracing::debug!("Submission abandoned before completion");
            inner.submission = SubmissionState::Idle;
        }
    }
}

/// Holds the history slot while the background load runs. Publishes the
/// result when finished, or `Failed` if the task dies first.
struct PendingHistory {
    inner: Arc<Mutex<WorkflowInner>>,
    settled: Arc<Notify>,
    done: bool,
}

impl PendingHistory {
    fn finish(mut self, history: HistoryState) {
        lock(&self.inner).history = history;
        self.done = true;
        self.settled.notify_waiters();
    }
}

impl Drop for PendingHistory {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        {
            let mut inner = lock(&self.inner);
            if inner.history == HistoryState::Loading {
                tracing::warn!("History load aborted before completion");
                inner.history = HistoryState::Failed("history load aborted".to_string());
            }
        }
        self.settled.notify_waiters();
    }
}
