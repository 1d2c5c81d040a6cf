#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mood_journal::client::MoodApi;
use mood_journal::models::{HistoryEntry, MoodEntry, UserProfile};
use mood_journal::store::{
    IdentityStore, MemoryStore, SESSION_ID_KEY, USER_AGE_KEY, USER_GENDER_KEY,
};
use mood_journal::MoodError;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

/// What a scripted endpoint answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    NotJson(String),
    Offline,
}

impl Reply {
    fn into_result(self) -> Result<Value, MoodError> {
        match self {
            Reply::Json(value) => Ok(value),
            Reply::NotJson(body) => Err(MoodError::Protocol { status: 200, body }),
            Reply::Offline => Err(MoodError::Connectivity("connection reset by peer".into())),
        }
    }
}

/// Scripted in-process stand-in for the mood service that counts calls.
pub struct FakeApi {
    register_reply: Mutex<Reply>,
    analyze_replies: Mutex<VecDeque<Reply>>,
    analyze_default: Mutex<Reply>,
    entries_reply: Mutex<Result<Vec<HistoryEntry>, u16>>,
    analyze_gate: Option<Arc<Semaphore>>,
    entries_gate: Option<Arc<Semaphore>>,
    entries_panics: AtomicBool,
    pub register_calls: AtomicUsize,
    pub analyze_calls: AtomicUsize,
    pub entries_calls: AtomicUsize,
    pub last_entry: Mutex<Option<MoodEntry>>,
}

impl FakeApi {
    pub fn healthy() -> Self {
        Self {
            register_reply: Mutex::new(Reply::Json(json!({ "session_id": "sess-1" }))),
            analyze_replies: Mutex::new(VecDeque::new()),
            analyze_default: Mutex::new(Reply::Json(
                json!({ "message": "You seem stressed", "sentiment": "Negative" }),
            )),
            entries_reply: Mutex::new(Ok(stub_history())),
            analyze_gate: None,
            entries_gate: None,
            entries_panics: AtomicBool::new(false),
            register_calls: AtomicUsize::new(0),
            analyze_calls: AtomicUsize::new(0),
            entries_calls: AtomicUsize::new(0),
            last_entry: Mutex::new(None),
        }
    }

    /// Analyze calls block until a permit is added to the returned semaphore.
    pub fn with_analyze_gate(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.analyze_gate = Some(gate.clone());
        (self, gate)
    }

    /// History calls block until a permit is added to the returned semaphore.
    pub fn with_entries_gate(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.entries_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn set_register(&self, reply: Reply) {
        *self.register_reply.lock().unwrap() = reply;
    }

    pub fn push_analyze(&self, reply: Reply) {
        self.analyze_replies.lock().unwrap().push_back(reply);
    }

    pub fn set_analyze_default(&self, reply: Reply) {
        *self.analyze_default.lock().unwrap() = reply;
    }

    pub fn fail_entries(&self, status: u16) {
        *self.entries_reply.lock().unwrap() = Err(status);
    }

    /// History calls panic instead of answering.
    pub fn panic_on_entries(&self) {
        self.entries_panics.store(true, Ordering::SeqCst);
    }

    pub fn register_count(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn analyze_count(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn entries_count(&self) -> usize {
        self.entries_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MoodApi for FakeApi {
    async fn register(&self, _profile: &UserProfile) -> Result<Value, MoodError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.register_reply.lock().unwrap().clone();
        reply.into_result()
    }

    async fn analyze(&self, entry: &MoodEntry) -> Result<Value, MoodError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_entry.lock().unwrap() = Some(entry.clone());
        if let Some(gate) = &self.analyze_gate {
            gate.acquire().await.unwrap().forget();
        }
        let scripted = self.analyze_replies.lock().unwrap().pop_front();
        let reply = scripted.unwrap_or_else(|| self.analyze_default.lock().unwrap().clone());
        reply.into_result()
    }

    async fn entries(&self, _session_id: &str) -> Result<Vec<HistoryEntry>, MoodError> {
        self.entries_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.entries_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.entries_panics.load(Ordering::SeqCst) {
            panic!("history backend crashed");
        }
        self.entries_reply
            .lock()
            .unwrap()
            .clone()
            .map_err(|status| MoodError::Protocol {
                status,
                body: "Internal Server Error".into(),
            })
    }
}

/// Store that fails every write to one key.
pub struct FailingStore {
    inner: MemoryStore,
    failing_key: &'static str,
}

impl FailingStore {
    pub fn failing_on(key: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_key: key,
        }
    }
}

impl IdentityStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, MoodError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MoodError> {
        if key == self.failing_key {
            return Err(MoodError::store("disk full"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), MoodError> {
        self.inner.remove(key)
    }
}

pub fn stub_history() -> Vec<HistoryEntry> {
    [("1", "Happy"), ("2", "Sad"), ("3", "Happy")]
        .iter()
        .map(|(id, emotion)| HistoryEntry {
            id: id.to_string(),
            emotion: emotion.to_string(),
        })
        .collect()
}

pub fn registered_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.set(SESSION_ID_KEY, "sess-1").unwrap();
    store.set(USER_AGE_KEY, "20").unwrap();
    store.set(USER_GENDER_KEY, "Female").unwrap();
    store
}

/// Yield to the runtime until `condition` holds, failing after two seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}
