//! HTTP handlers for the conversation API.
//!
//! These handlers connect axum routes to the application layer command
//! handlers and translate handler errors into HTTP status codes.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::application::handlers::{
    CloseConversationCommand, CloseConversationError, CloseConversationHandler,
    ProcessMessageCommand, ProcessMessageError, ProcessMessageHandler, RecordReviewCommand,
    RecordReviewError, RecordReviewHandler, StartConversationCommand, StartConversationError,
    StartConversationHandler,
};
use crate::domain::foundation::{ConversationId, MessageId};
use crate::domain::workflow::ConversationWorkflow;
use crate::ports::MessageStore;

use super::dto::{
    ConversationResponse, CreateConversationRequest, ErrorResponse, RecordReviewRequest,
    ReviewRecordedResponse, SendMessageRequest, SendMessageResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
pub struct AppState<S>
where
    S: MessageStore,
{
    store: Arc<S>,
    workflow: Arc<ConversationWorkflow>,
}

impl<S> Clone for AppState<S>
where
    S: MessageStore,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            workflow: self.workflow.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: MessageStore + 'static,
{
    /// Creates the state from its dependencies.
    pub fn new(store: Arc<S>, workflow: Arc<ConversationWorkflow>) -> Self {
        Self { store, workflow }
    }

    fn start_conversation_handler(&self) -> StartConversationHandler<S> {
        StartConversationHandler::new(self.store.clone())
    }

    fn process_message_handler(&self) -> ProcessMessageHandler<S> {
        ProcessMessageHandler::new(self.store.clone(), self.workflow.clone())
    }

    fn record_review_handler(&self) -> RecordReviewHandler<S> {
        RecordReviewHandler::new(self.store.clone())
    }

    fn close_conversation_handler(&self) -> CloseConversationHandler<S> {
        CloseConversationHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// API error translated to an HTTP response.
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse::bad_request(message),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorResponse::not_found(message),
        }
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            body: ErrorResponse::conflict(message),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse::internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<StartConversationError> for ApiError {
    fn from(err: StartConversationError) -> Self {
        match err {
            StartConversationError::EmptyPatientId => ApiError::bad_request(err.to_string()),
            StartConversationError::StoreError(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<ProcessMessageError> for ApiError {
    fn from(err: ProcessMessageError) -> Self {
        match err {
            ProcessMessageError::EmptyContent => ApiError::bad_request(err.to_string()),
            ProcessMessageError::ConversationNotFound(_) => ApiError::not_found(err.to_string()),
            ProcessMessageError::ConversationClosed => ApiError::conflict(err.to_string()),
            ProcessMessageError::StoreError(_) | ProcessMessageError::DomainError(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<RecordReviewError> for ApiError {
    fn from(err: RecordReviewError) -> Self {
        match err {
            RecordReviewError::EmptyReviewerId => ApiError::bad_request(err.to_string()),
            RecordReviewError::ConversationNotFound(_) | RecordReviewError::MessageNotFound => {
                ApiError::not_found(err.to_string())
            }
            RecordReviewError::NotPendingReview => ApiError::conflict(err.to_string()),
            RecordReviewError::StoreError(_) | RecordReviewError::DomainError(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<CloseConversationError> for ApiError {
    fn from(err: CloseConversationError) -> Self {
        match err {
            CloseConversationError::ConversationNotFound(_) => ApiError::not_found(err.to_string()),
            CloseConversationError::AlreadyClosed => ApiError::conflict(err.to_string()),
            CloseConversationError::StoreError(_) | CloseConversationError::DomainError(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

fn parse_conversation_id(id: &str) -> Result<ConversationId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid conversation id: {}", id)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations - Start a conversation.
pub async fn create_conversation<S: MessageStore + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation = state
        .start_conversation_handler()
        .handle(StartConversationCommand::new(request.patient_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponse::from(&conversation)),
    ))
}

/// POST /api/conversations/:id/messages - Process a patient message.
pub async fn send_message<S: MessageStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;

    let result = state
        .process_message_handler()
        .handle(ProcessMessageCommand::new(conversation_id, request.content))
        .await?;

    Ok(Json(SendMessageResponse {
        conversation_id: result.conversation_id.to_string(),
        message_id: result.ai_message_id.to_string(),
        reply: result.ai_response,
    }))
}

/// GET /api/conversations/:id - Care-team view of a conversation.
pub async fn get_conversation<S: MessageStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;

    let conversation = state
        .store
        .find_by_id(conversation_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Conversation not found: {}", conversation_id))
        })?;

    Ok(Json(ConversationResponse::from(&conversation)))
}

/// POST /api/conversations/:id/review - Record an expert review.
pub async fn record_review<S: MessageStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(request): Json<RecordReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;

    let mut command =
        RecordReviewCommand::new(conversation_id, request.reviewer_id, request.decision);
    if let Some(notes) = request.notes {
        command = command.with_notes(notes);
    }
    if let Some(raw) = request.message_id {
        let message_id: MessageId = raw
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid message id: {}", raw)))?;
        command = command.with_message_id(message_id);
    }

    let result = state.record_review_handler().handle(command).await?;

    Ok(Json(ReviewRecordedResponse {
        conversation_id: result.conversation_id.to_string(),
        message_id: result.message_id.to_string(),
        status: result.status.to_string(),
    }))
}

/// POST /api/conversations/:id/close - Close a conversation.
pub async fn close_conversation<S: MessageStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;

    state
        .close_conversation_handler()
        .handle(CloseConversationCommand::new(conversation_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
