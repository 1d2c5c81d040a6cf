use axum::{extract::Path, response::IntoResponse, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use super::sentiment::{classify, Sentiment};
use crate::models::{HistoryEntry, MoodEntry, UserProfile};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn register(Json(profile): Json<UserProfile>) -> Json<Value> {
    let session_id = Uuid::new_v4().to_string();
    tracing::info!(
        "Registered session {} (age {}, gender {})",
        session_id,
        profile.age,
        profile.gender
    );
    Json(json!({ "session_id": session_id }))
}

/// Analysis failures are reported as `{"error": ...}` with a success status,
/// the same shape the real service uses when its model call fails.
pub async fn generate_response(Json(entry): Json<MoodEntry>) -> Json<Value> {
    let mood = entry.mood.trim();
    if mood.is_empty() {
        tracing::warn!("Empty mood for session {}", entry.session_id);
        return Json(json!({ "error": "mood is empty" }));
    }

    let sentiment = classify(mood);
    tracing::info!(
        "Session {}: detected {} sentiment",
        entry.session_id,
        sentiment.as_str()
    );

    Json(json!({
        "message": supportive_message(sentiment, &entry),
        "sentiment": sentiment.as_str(),
    }))
}

pub async fn list_entries(Path(session_id): Path<String>) -> Json<Vec<HistoryEntry>> {
    tracing::debug!("Serving stub history for session {}", session_id);
    let entry = |id: &str, emotion: &str| HistoryEntry {
        id: id.to_string(),
        emotion: emotion.to_string(),
    };
    Json(vec![
        entry("1", "Happy"),
        entry("2", "Sad"),
        entry("3", "Happy"),
    ])
}

fn supportive_message(sentiment: Sentiment, entry: &MoodEntry) -> String {
    match sentiment {
        Sentiment::Negative => format!(
            "That sounds heavy, and it makes sense to feel this way at {}. \
             Be gentle with yourself today. A short walk outside 🌳, \
             a call with a friend 📞, or an early night 🌙 might help.",
            entry.age
        ),
        Sentiment::Positive => format!(
            "Love this energy! Keep it going: share the good news with someone 🎉, \
             write down what made today great ✍️, or treat yourself to something small 🍦. \
             You've earned it, {} friend.",
            entry.gender.to_lowercase()
        ),
        Sentiment::Neutral => "Thanks for checking in. Some days are just steady, and that's okay. \
             Try five minutes of stretching 🧘 or jotting down one thing you're looking forward to 📝."
            .to_string(),
    }
}
