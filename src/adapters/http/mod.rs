//! HTTP adapter - axum routes, handlers, and DTOs for the conversation API.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AssessmentResponse, ConversationResponse, CreateConversationRequest, ErrorResponse,
    MessageResponse, RecordReviewRequest, ReviewRecordedResponse, SendMessageRequest,
    SendMessageResponse,
};
pub use handlers::AppState;
pub use routes::api_router;
