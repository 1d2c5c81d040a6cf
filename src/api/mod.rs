//! Stub development server for the mood service interface.
//!
//! Serves the three endpoints the client consumes with canned behavior so the
//! client can be run end to end locally. It is not the production analysis
//! service: sentiment is a word-list heuristic and history is fixed.

mod handlers;
mod sentiment;

pub use sentiment::{classify, Sentiment};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router() -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/generate-response/", post(handlers::generate_response))
        .route("/entries/{session_id}", get(handlers::list_entries))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
