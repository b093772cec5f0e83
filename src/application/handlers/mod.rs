//! Command handlers.
//!
//! One module per command, each with its command, error, result, and
//! handler types.

mod close_conversation;
mod process_message;
mod record_review;
mod start_conversation;

pub use close_conversation::{
    CloseConversationCommand, CloseConversationError, CloseConversationHandler,
};
pub use process_message::{
    ProcessMessageCommand, ProcessMessageError, ProcessMessageHandler, ProcessMessageResult,
};
pub use record_review::{
    RecordReviewCommand, RecordReviewError, RecordReviewHandler, RecordReviewResult,
};
pub use start_conversation::{
    StartConversationCommand, StartConversationError, StartConversationHandler,
};
