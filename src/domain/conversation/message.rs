//! Message entity and reviewer annotations.
//!
//! Messages are immutable once created. The one exception is additive: an
//! expert reviewer may attach a single annotation to an AI message after the
//! fact. The original content and assessment are never rewritten.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{MessageId, ReviewerId, Timestamp, ValidationError};
use crate::domain::safety::ConfidenceAssessment;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Patient,
    Assistant,
    Reviewer,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sender::Patient => "patient",
            Sender::Assistant => "assistant",
            Sender::Reviewer => "reviewer",
        };
        write!(f, "{}", s)
    }
}

/// Outcome an expert records when reviewing an AI response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// The AI response was appropriate as sent.
    Approved,
    /// The expert supplied a corrected version in their notes.
    Modified,
    /// The response should not have been sent.
    Rejected,
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Modified => "modified",
            ReviewDecision::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// An expert's recorded verdict on an AI message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerAnnotation {
    reviewer_id: ReviewerId,
    decision: ReviewDecision,
    notes: Option<String>,
    reviewed_at: Timestamp,
}

impl ReviewerAnnotation {
    /// Creates an annotation timestamped now.
    pub fn new(reviewer_id: ReviewerId, decision: ReviewDecision, notes: Option<String>) -> Self {
        Self {
            reviewer_id,
            decision,
            notes,
            reviewed_at: Timestamp::now(),
        }
    }

    pub fn reviewer_id(&self) -> &ReviewerId {
        &self.reviewer_id
    }

    pub fn decision(&self) -> ReviewDecision {
        self.decision
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn reviewed_at(&self) -> Timestamp {
        self.reviewed_at
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: Sender,
    content: String,
    assessment: Option<ConfidenceAssessment>,
    annotation: Option<ReviewerAnnotation>,
    created_at: Timestamp,
}

impl Message {
    /// Creates a patient message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the content is empty or whitespace-only
    pub fn patient(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::create(Sender::Patient, content, None)
    }

    /// Creates an assistant message with its confidence assessment.
    ///
    /// Every AI-authored message carries an assessment, including safety
    /// templates and fallbacks.
    pub fn assistant(
        content: impl Into<String>,
        assessment: ConfidenceAssessment,
    ) -> Result<Self, ValidationError> {
        Self::create(Sender::Assistant, content, Some(assessment))
    }

    fn create(
        sender: Sender,
        content: impl Into<String>,
        assessment: Option<ConfidenceAssessment>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            id: MessageId::new(),
            sender,
            content,
            assessment,
            annotation: None,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitutes a message from stored state.
    pub fn reconstitute(
        id: MessageId,
        sender: Sender,
        content: String,
        assessment: Option<ConfidenceAssessment>,
        annotation: Option<ReviewerAnnotation>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender,
            content,
            assessment,
            annotation,
            created_at,
        }
    }

    /// Returns a copy of this message with the annotation attached.
    pub fn with_annotation(mut self, annotation: ReviewerAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The confidence assessment, present on assistant messages only.
    pub fn assessment(&self) -> Option<&ConfidenceAssessment> {
        self.assessment.as_ref()
    }

    pub fn annotation(&self) -> Option<&ReviewerAnnotation> {
        self.annotation.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// True for AI-authored messages.
    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Percentage;
    use crate::domain::safety::{Dimension, Metric};

    fn passing_assessment() -> ConfidenceAssessment {
        let metrics = Dimension::ALL.iter().map(|d| Metric::pass(*d, "ok")).collect();
        ConfidenceAssessment::from_metrics(metrics, false, false, "Good response").unwrap()
    }

    #[test]
    fn patient_message_has_no_assessment() {
        let message = Message::patient("My incision is itchy").unwrap();
        assert_eq!(message.sender(), Sender::Patient);
        assert!(message.assessment().is_none());
        assert!(!message.is_assistant());
    }

    #[test]
    fn assistant_message_carries_assessment() {
        let message = Message::assistant("Itching is normal while healing", passing_assessment())
            .unwrap();
        assert!(message.is_assistant());
        let assessment = message.assessment().unwrap();
        assert_eq!(assessment.overall_score(), Percentage::HUNDRED);
    }

    #[test]
    fn empty_content_is_rejected() {
        assert!(Message::patient("").is_err());
        assert!(Message::patient("   ").is_err());
        assert!(Message::assistant("", passing_assessment()).is_err());
    }

    #[test]
    fn messages_get_unique_ids() {
        let a = Message::patient("first").unwrap();
        let b = Message::patient("second").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn annotation_attaches_without_changing_content() {
        let message =
            Message::assistant("Please rest and hydrate", passing_assessment()).unwrap();
        let reviewer = ReviewerId::new("nurse-12").unwrap();
        let annotated = message.clone().with_annotation(ReviewerAnnotation::new(
            reviewer,
            ReviewDecision::Approved,
            Some("Appropriate guidance".to_string()),
        ));

        assert_eq!(annotated.content(), message.content());
        assert_eq!(annotated.assessment(), message.assessment());
        let annotation = annotated.annotation().unwrap();
        assert_eq!(annotation.decision(), ReviewDecision::Approved);
        assert_eq!(annotation.notes(), Some("Appropriate guidance"));
    }

    #[test]
    fn reconstitute_preserves_all_fields() {
        let original =
            Message::assistant("Take it slow this week", passing_assessment()).unwrap();
        let rebuilt = Message::reconstitute(
            original.id(),
            original.sender(),
            original.content().to_string(),
            original.assessment().cloned(),
            None,
            original.created_at(),
        );
        assert_eq!(rebuilt, original);
    }
}
