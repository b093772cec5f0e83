//! Route configuration for the conversation API.

use axum::routing::{get, post};
use axum::Router;

use crate::ports::MessageStore;

use super::handlers::{
    close_conversation, create_conversation, get_conversation, health, record_review,
    send_message, AppState,
};

/// Creates the API router with all endpoints.
///
/// Routes:
/// - `POST /api/conversations` - Start a conversation
/// - `GET  /api/conversations/:id` - Care-team conversation view
/// - `POST /api/conversations/:id/messages` - Process a patient message
/// - `POST /api/conversations/:id/review` - Record an expert review
/// - `POST /api/conversations/:id/close` - Close a conversation
/// - `GET  /health` - Liveness probe
pub fn api_router<S>() -> Router<AppState<S>>
where
    S: MessageStore + 'static,
{
    Router::new()
        .route("/api/conversations", post(create_conversation::<S>))
        .route("/api/conversations/:id", get(get_conversation::<S>))
        .route("/api/conversations/:id/messages", post(send_message::<S>))
        .route("/api/conversations/:id/review", post(record_review::<S>))
        .route("/api/conversations/:id/close", post(close_conversation::<S>))
        .route("/health", get(health))
}
