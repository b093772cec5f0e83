//! Conversation domain - aggregate root, messages, and lifecycle.

#[allow(clippy::module_inception)]
mod conversation;
mod message;
mod status;

pub use conversation::Conversation;
pub use message::{Message, ReviewDecision, ReviewerAnnotation, Sender};
pub use status::ConversationStatus;

pub use crate::domain::foundation::MessageId;
