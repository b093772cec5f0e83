//! Conversation aggregate root.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, PatientId, Percentage, StateMachine, Timestamp,
};
use crate::domain::safety::DimensionAverages;

use super::{ConversationStatus, Message, MessageId, ReviewerAnnotation};

/// A patient conversation with its full message history and review state.
///
/// Review flags are sticky: once a conversation needs nurse or doctor
/// attention, later clean responses do not clear the flag. Only a recorded
/// review decision does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    patient_id: PatientId,
    status: ConversationStatus,
    messages: Vec<Message>,
    needs_nurse_review: bool,
    needs_doctor_review: bool,
    escalated: bool,
    escalation_reason: Option<String>,
    overall_score: Percentage,
    dimension_averages: DimensionAverages,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a new active conversation for a patient.
    pub fn new(patient_id: PatientId) -> Self {
        Self {
            id: ConversationId::new(),
            patient_id,
            status: ConversationStatus::Active,
            messages: Vec::new(),
            needs_nurse_review: false,
            needs_doctor_review: false,
            escalated: false,
            escalation_reason: None,
            overall_score: Percentage::ZERO,
            dimension_averages: DimensionAverages::default(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a conversation from stored state.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ConversationId,
        patient_id: PatientId,
        status: ConversationStatus,
        messages: Vec<Message>,
        needs_nurse_review: bool,
        needs_doctor_review: bool,
        escalated: bool,
        escalation_reason: Option<String>,
        overall_score: Percentage,
        dimension_averages: DimensionAverages,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            patient_id,
            status,
            messages,
            needs_nurse_review,
            needs_doctor_review,
            escalated,
            escalation_reason,
            overall_score,
            dimension_averages,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn needs_nurse_review(&self) -> bool {
        self.needs_nurse_review
    }

    pub fn needs_doctor_review(&self) -> bool {
        self.needs_doctor_review
    }

    pub fn is_escalated(&self) -> bool {
        self.escalated
    }

    pub fn escalation_reason(&self) -> Option<&str> {
        self.escalation_reason.as_deref()
    }

    /// Rounded mean of per-response overall scores across all AI messages.
    pub fn overall_score(&self) -> Percentage {
        self.overall_score
    }

    /// Per-dimension averages across all AI messages.
    pub fn dimension_averages(&self) -> &DimensionAverages {
        &self.dimension_averages
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// True when the conversation still accepts patient messages.
    pub fn accepts_messages(&self) -> bool {
        self.status != ConversationStatus::Closed
    }

    /// Appends a message to the history.
    ///
    /// # Errors
    ///
    /// - `ConversationClosed` if the conversation is closed
    pub fn append_message(&mut self, message: Message) -> Result<(), DomainError> {
        if !self.accepts_messages() {
            return Err(DomainError::new(
                ErrorCode::ConversationClosed,
                "Cannot add messages to a closed conversation",
            )
            .with_detail("conversation_id", self.id.to_string()));
        }
        self.messages.push(message);
        self.touch();
        Ok(())
    }

    /// Finds a message by id.
    pub fn find_message(&self, message_id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == message_id)
    }

    /// AI-authored messages, oldest first.
    pub fn ai_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_assistant())
    }

    /// The most recent AI-authored message.
    pub fn latest_ai_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    /// The last `limit` messages, oldest first.
    pub fn recent_history(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    /// Recomputes conversation-level score aggregates from the full AI
    /// message history.
    ///
    /// The overall score is the rounded mean of each AI message's overall
    /// score; dimension averages are rounded means of the derived
    /// per-dimension values. A conversation with no AI messages scores zero.
    pub fn recompute_aggregates(&mut self) {
        let assessments: Vec<_> = self
            .ai_messages()
            .filter_map(|m| m.assessment())
            .collect();

        let overall: Vec<Percentage> =
            assessments.iter().map(|a| a.overall_score()).collect();
        let overall_score = Percentage::mean(&overall);

        let dimension_averages = DimensionAverages::from_fn(|dimension| {
            let scores: Vec<Percentage> = assessments
                .iter()
                .map(|a| a.metric(dimension).score())
                .collect();
            Percentage::mean(&scores)
        });
        self.overall_score = overall_score;
        self.dimension_averages = dimension_averages;
        self.touch();
    }

    /// Raises the nurse review flag (sticky until a review is recorded).
    pub fn require_nurse_review(&mut self) {
        self.needs_nurse_review = true;
        self.touch();
    }

    /// Raises the doctor review flag (sticky until a review is recorded).
    pub fn require_doctor_review(&mut self) {
        self.needs_doctor_review = true;
        self.touch();
    }

    /// Marks the conversation escalated, recording the first reason.
    pub fn mark_escalated(&mut self, reason: impl Into<String>) {
        if !self.escalated {
            self.escalated = true;
            self.escalation_reason = Some(reason.into());
        }
        self.touch();
    }

    /// Moves the conversation into the review queue.
    pub fn request_review(&mut self) -> Result<(), DomainError> {
        self.transition(ConversationStatus::PendingReview)?;
        info!(conversation_id = %self.id, "Conversation flagged for expert review");
        Ok(())
    }

    /// Records that an expert has completed review, attaching their verdict
    /// to the reviewed AI message and clearing all review flags.
    ///
    /// # Errors
    ///
    /// - `ReviewNotPending` if the conversation is not awaiting review
    /// - `MessageNotFound` if the message id does not name an AI message in
    ///   this conversation
    pub fn complete_review(
        &mut self,
        message_id: MessageId,
        annotation: ReviewerAnnotation,
    ) -> Result<(), DomainError> {
        if self.status != ConversationStatus::PendingReview {
            return Err(DomainError::new(
                ErrorCode::ReviewNotPending,
                format!("Conversation is {}, not pending review", self.status),
            )
            .with_detail("conversation_id", self.id.to_string()));
        }

        let position = self
            .messages
            .iter()
            .position(|m| m.id() == message_id && m.is_assistant())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::MessageNotFound,
                    "No AI message with that id in this conversation",
                )
                .with_detail("message_id", message_id.to_string())
            })?;

        let message = self.messages.remove(position);
        self.messages.insert(position, message.with_annotation(annotation));

        self.transition(ConversationStatus::Reviewed)?;
        self.needs_nurse_review = false;
        self.needs_doctor_review = false;
        self.escalated = false;
        self.escalation_reason = None;
        info!(conversation_id = %self.id, "Expert review recorded");
        Ok(())
    }

    /// Closes the conversation. Terminal.
    pub fn close(&mut self) -> Result<(), DomainError> {
        self.transition(ConversationStatus::Closed)
    }

    fn transition(&mut self, target: ConversationStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("conversation_id", self.id.to_string())
        })?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
