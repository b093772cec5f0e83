//! Message Store Port - Interface for conversation persistence.
//!
//! The store deals in whole conversation aggregates. Message-level
//! operations (appending, annotating) are aggregate methods; the caller
//! mutates the aggregate and saves it back, so review flags, aggregates,
//! and message history are always persisted together.

use async_trait::async_trait;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::ConversationId;

/// Port for conversation persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a newly created conversation.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a conversation with this id is already stored
    async fn create(&self, conversation: Conversation) -> Result<(), StoreError>;

    /// Loads a conversation by id, or `None` if it does not exist.
    async fn find_by_id(&self, id: ConversationId)
        -> Result<Option<Conversation>, StoreError>;

    /// Persists the current state of an existing conversation, including
    /// its messages, status, review flags, and score aggregates.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation was never created
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Returns the last `limit` messages of a conversation, oldest first.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation does not exist
    async fn recent_history(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No conversation with the given id.
    #[error("conversation not found: {id}")]
    NotFound {
        /// The missing conversation id.
        id: ConversationId,
    },

    /// A conversation with the given id already exists.
    #[error("conversation already exists: {id}")]
    AlreadyExists {
        /// The conflicting conversation id.
        id: ConversationId,
    },

    /// Backend failure (connection, serialization, etc.).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(id: ConversationId) -> Self {
        Self::NotFound { id }
    }

    /// Creates an already exists error.
    pub fn already_exists(id: ConversationId) -> Self {
        Self::AlreadyExists { id }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
