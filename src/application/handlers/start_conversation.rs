//! StartConversation command handler.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::PatientId;
use crate::ports::{MessageStore, StoreError};

/// Command to start a new conversation for a patient.
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    /// The patient this conversation belongs to.
    pub patient_id: String,
}

impl StartConversationCommand {
    /// Creates a new start conversation command.
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
        }
    }
}

/// Errors that can occur when starting a conversation.
#[derive(Debug, Error)]
pub enum StartConversationError {
    /// Patient id is empty.
    #[error("Validation error: patient id cannot be empty")]
    EmptyPatientId,

    /// Persistence failure.
    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<StoreError> for StartConversationError {
    fn from(err: StoreError) -> Self {
        StartConversationError::StoreError(err.to_string())
    }
}

/// Handler for StartConversation commands.
pub struct StartConversationHandler<S>
where
    S: MessageStore,
{
    store: Arc<S>,
}

impl<S> StartConversationHandler<S>
where
    S: MessageStore + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles a start conversation command.
    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<Conversation, StartConversationError> {
        let patient_id = PatientId::new(cmd.patient_id)
            .map_err(|_| StartConversationError::EmptyPatientId)?;

        let conversation = Conversation::new(patient_id);
        self.store.create(conversation.clone()).await?;

        info!(
            conversation_id = %conversation.id(),
            patient_id = %conversation.patient_id(),
            "Conversation started"
        );
        Ok(conversation)
    }
}
