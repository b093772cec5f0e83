//! CloseConversation command handler.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::ports::{MessageStore, StoreError};

/// Command to close a conversation.
#[derive(Debug, Clone)]
pub struct CloseConversationCommand {
    /// The conversation to close.
    pub conversation_id: ConversationId,
}

impl CloseConversationCommand {
    /// Creates a new close conversation command.
    pub fn new(conversation_id: ConversationId) -> Self {
        Self { conversation_id }
    }
}

/// Errors that can occur when closing a conversation.
#[derive(Debug, Error)]
pub enum CloseConversationError {
    /// Conversation was not found.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Conversation is already closed.
    #[error("Conversation is already closed")]
    AlreadyClosed,

    /// Persistence failure.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Domain error.
    #[error("Domain error: {0}")]
    DomainError(String),
}

impl From<StoreError> for CloseConversationError {
    fn from(err: StoreError) -> Self {
        CloseConversationError::StoreError(err.to_string())
    }
}

impl From<DomainError> for CloseConversationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => CloseConversationError::AlreadyClosed,
            _ => CloseConversationError::DomainError(err.to_string()),
        }
    }
}

/// Handler for CloseConversation commands.
pub struct CloseConversationHandler<S>
where
    S: MessageStore,
{
    store: Arc<S>,
}

impl<S> CloseConversationHandler<S>
where
    S: MessageStore + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles a close conversation command.
    pub async fn handle(
        &self,
        cmd: CloseConversationCommand,
    ) -> Result<(), CloseConversationError> {
        let mut conversation = self
            .store
            .find_by_id(cmd.conversation_id)
            .await?
            .ok_or(CloseConversationError::ConversationNotFound(cmd.conversation_id))?;

        conversation.close()?;
        self.store.save(&conversation).await?;

        info!(conversation_id = %conversation.id(), "Conversation closed");
        Ok(())
    }
}
