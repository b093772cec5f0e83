//! RecordReview command handler.
//!
//! An expert (nurse or doctor) records their verdict on a flagged AI
//! response. The annotation attaches to the reviewed message, review flags
//! clear, and the conversation moves to reviewed.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::conversation::{ConversationStatus, ReviewDecision, ReviewerAnnotation};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId, ReviewerId};
use crate::ports::{MessageStore, StoreError};

/// Command to record an expert review decision.
#[derive(Debug, Clone)]
pub struct RecordReviewCommand {
    /// The conversation under review.
    pub conversation_id: ConversationId,
    /// The reviewing expert.
    pub reviewer_id: String,
    /// The verdict.
    pub decision: ReviewDecision,
    /// Optional notes (required reading for `Modified` and `Rejected`).
    pub notes: Option<String>,
    /// The AI message reviewed; defaults to the latest AI message.
    pub message_id: Option<MessageId>,
}

impl RecordReviewCommand {
    /// Creates a new record review command targeting the latest AI message.
    pub fn new(
        conversation_id: ConversationId,
        reviewer_id: impl Into<String>,
        decision: ReviewDecision,
    ) -> Self {
        Self {
            conversation_id,
            reviewer_id: reviewer_id.into(),
            decision,
            notes: None,
            message_id: None,
        }
    }

    /// Attaches reviewer notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Targets a specific AI message.
    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }
}

/// Errors that can occur when recording a review.
#[derive(Debug, Error)]
pub enum RecordReviewError {
    /// Reviewer id is empty.
    #[error("Validation error: reviewer id cannot be empty")]
    EmptyReviewerId,

    /// Conversation was not found.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Conversation is not awaiting review.
    #[error("Conversation is not pending review")]
    NotPendingReview,

    /// No AI message to review, or the named message was not found.
    #[error("No reviewable AI message found")]
    MessageNotFound,

    /// Persistence failure.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Domain error.
    #[error("Domain error: {0}")]
    DomainError(String),
}

impl From<StoreError> for RecordReviewError {
    fn from(err: StoreError) -> Self {
        RecordReviewError::StoreError(err.to_string())
    }
}

impl From<DomainError> for RecordReviewError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ReviewNotPending => RecordReviewError::NotPendingReview,
            ErrorCode::MessageNotFound => RecordReviewError::MessageNotFound,
            _ => RecordReviewError::DomainError(err.to_string()),
        }
    }
}

/// Result of recording a review.
#[derive(Debug, Clone)]
pub struct RecordReviewResult {
    /// The conversation reviewed.
    pub conversation_id: ConversationId,
    /// The message the annotation attached to.
    pub message_id: MessageId,
    /// Conversation status after the review.
    pub status: ConversationStatus,
}

/// Handler for RecordReview commands.
pub struct RecordReviewHandler<S>
where
    S: MessageStore,
{
    store: Arc<S>,
}

impl<S> RecordReviewHandler<S>
where
    S: MessageStore + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handles a record review command.
    pub async fn handle(
        &self,
        cmd: RecordReviewCommand,
    ) -> Result<RecordReviewResult, RecordReviewError> {
        let reviewer_id = ReviewerId::new(cmd.reviewer_id)
            .map_err(|_| RecordReviewError::EmptyReviewerId)?;

        let mut conversation = self
            .store
            .find_by_id(cmd.conversation_id)
            .await?
            .ok_or(RecordReviewError::ConversationNotFound(cmd.conversation_id))?;

        let message_id = match cmd.message_id {
            Some(id) => id,
            None => conversation
                .latest_ai_message()
                .map(|m| m.id())
                .ok_or(RecordReviewError::MessageNotFound)?,
        };

        let annotation = ReviewerAnnotation::new(reviewer_id.clone(), cmd.decision, cmd.notes);
        conversation.complete_review(message_id, annotation)?;
        self.store.save(&conversation).await?;

        info!(
            conversation_id = %conversation.id(),
            reviewer_id = %reviewer_id,
            decision = %cmd.decision,
            "Review recorded"
        );

        Ok(RecordReviewResult {
            conversation_id: conversation.id(),
            message_id,
            status: conversation.status(),
        })
    }
}
