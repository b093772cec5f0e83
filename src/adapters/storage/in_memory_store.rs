//! In-memory conversation store.
//!
//! Backs the service in tests and single-node deployments. Conversations
//! live in a `HashMap` behind an async `RwLock`; saving replaces the whole
//! aggregate.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::ConversationId;
use crate::ports::{MessageStore, StoreError};

/// In-memory implementation of the message store.
#[derive(Default)]
pub struct InMemoryMessageStore {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// True when no conversations are stored.
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, conversation: Conversation) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().await;
        let id = conversation.id();
        if conversations.contains_key(&id) {
            return Err(StoreError::already_exists(id));
        }
        conversations.insert(id, conversation);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, StoreError> {
        Ok(self.conversations.read().await.get(&id).cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().await;
        let id = conversation.id();
        if !conversations.contains_key(&id) {
            return Err(StoreError::not_found(id));
        }
        conversations.insert(id, conversation.clone());
        Ok(())
    }

    async fn recent_history(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let conversations = self.conversations.read().await;
        let conversation = conversations.get(&id).ok_or(StoreError::not_found(id))?;
        Ok(conversation.recent_history(limit).to_vec())
    }
}
