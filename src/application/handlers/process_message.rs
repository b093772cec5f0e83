//! ProcessMessage command handler.
//!
//! Runs the crisis-check / generate / evaluate cycle for one patient
//! message, persists both sides of the exchange, and routes the result
//! through review flagging. AI capability failures never surface to the
//! patient; they degrade to fallback replies and conservative assessments
//! inside the workflow.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::conversation::{ConversationStatus, Message};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId};
use crate::domain::review::ReviewRouter;
use crate::domain::workflow::ConversationWorkflow;
use crate::ports::{MessageStore, StoreError};

/// Command to process a patient message in a conversation.
#[derive(Debug, Clone)]
pub struct ProcessMessageCommand {
    /// The conversation receiving the message.
    pub conversation_id: ConversationId,
    /// The message content.
    pub content: String,
}

impl ProcessMessageCommand {
    /// Creates a new process message command.
    pub fn new(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            content: content.into(),
        }
    }
}

/// Errors that can occur when processing a message.
#[derive(Debug, Error)]
pub enum ProcessMessageError {
    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    /// Conversation was not found.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Conversation is closed and cannot accept messages.
    #[error("Conversation is closed and cannot accept new messages")]
    ConversationClosed,

    /// Persistence failure.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Domain error.
    #[error("Domain error: {0}")]
    DomainError(String),
}

impl From<StoreError> for ProcessMessageError {
    fn from(err: StoreError) -> Self {
        ProcessMessageError::StoreError(err.to_string())
    }
}

impl From<DomainError> for ProcessMessageError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConversationClosed => ProcessMessageError::ConversationClosed,
            _ => ProcessMessageError::DomainError(err.to_string()),
        }
    }
}

/// Result of processing a message.
#[derive(Debug, Clone)]
pub struct ProcessMessageResult {
    /// The conversation processed.
    pub conversation_id: ConversationId,
    /// ID of the stored patient message.
    pub patient_message_id: MessageId,
    /// ID of the stored AI reply.
    pub ai_message_id: MessageId,
    /// The reply text to show the patient.
    pub ai_response: String,
    /// Whether the crisis branch was taken.
    pub crisis_detected: bool,
    /// Conversation status after routing.
    pub status: ConversationStatus,
}

/// Handler for ProcessMessage commands.
pub struct ProcessMessageHandler<S>
where
    S: MessageStore,
{
    store: Arc<S>,
    workflow: Arc<ConversationWorkflow>,
}

impl<S> ProcessMessageHandler<S>
where
    S: MessageStore + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>, workflow: Arc<ConversationWorkflow>) -> Self {
        Self { store, workflow }
    }

    /// Handles a process message command.
    pub async fn handle(
        &self,
        cmd: ProcessMessageCommand,
    ) -> Result<ProcessMessageResult, ProcessMessageError> {
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(ProcessMessageError::EmptyContent);
        }

        let mut conversation = self
            .store
            .find_by_id(cmd.conversation_id)
            .await?
            .ok_or(ProcessMessageError::ConversationNotFound(cmd.conversation_id))?;

        if !conversation.accepts_messages() {
            return Err(ProcessMessageError::ConversationClosed);
        }

        // The cycle sees history as it was before this message, already
        // bounded to the workflow's context window.
        let history = self
            .store
            .recent_history(cmd.conversation_id, self.workflow.history_window())
            .await?;
        let result = self.workflow.run(content, &history).await;

        let patient_message = Message::patient(content)
            .map_err(|_| ProcessMessageError::EmptyContent)?;
        let patient_message_id = patient_message.id();
        conversation.append_message(patient_message)?;

        let ai_message = Message::assistant(&result.ai_response, result.assessment.clone())
            .map_err(|e| ProcessMessageError::DomainError(e.to_string()))?;
        let ai_message_id = ai_message.id();
        conversation.append_message(ai_message)?;

        ReviewRouter::apply(&mut conversation, &result)?;
        self.store.save(&conversation).await?;

        info!(
            conversation_id = %conversation.id(),
            crisis_detected = result.crisis_detected,
            overall_score = %result.assessment.overall_score(),
            needs_expert_review = result.assessment.needs_expert_review(),
            status = %conversation.status(),
            "Message processed"
        );

        Ok(ProcessMessageResult {
            conversation_id: conversation.id(),
            patient_message_id,
            ai_message_id,
            ai_response: result.ai_response,
            crisis_detected: result.crisis_detected,
            status: conversation.status(),
        })
    }
}
