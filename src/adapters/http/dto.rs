//! HTTP DTOs for the conversation API.
//!
//! Two audiences, two shapes: the patient-facing message response carries
//! only the reply text and ids, while the care-team conversation view
//! exposes review flags, scores, and per-dimension assessments.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{
    Conversation, Message, ReviewDecision, ReviewerAnnotation, Sender,
};
use crate::domain::safety::{ConfidenceAssessment, DimensionAverages};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationRequest {
    /// The patient this conversation is for.
    pub patient_id: String,
}

/// Request to send a patient message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    /// The message content.
    pub content: String,
}

/// Request to record an expert review.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordReviewRequest {
    /// The reviewing expert.
    pub reviewer_id: String,
    /// The verdict.
    pub decision: ReviewDecision,
    /// Optional reviewer notes.
    pub notes: Option<String>,
    /// Specific AI message to review; defaults to the latest.
    pub message_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Patient-facing response to a sent message.
///
/// Deliberately minimal: no confidence scores, review flags, or escalation
/// state are exposed to the patient.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    /// The conversation id.
    pub conversation_id: String,
    /// Id of the AI reply message.
    pub message_id: String,
    /// The reply text.
    pub reply: String,
}

/// Care-team view of a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    /// Conversation id.
    pub id: String,
    /// Owning patient.
    pub patient_id: String,
    /// Lifecycle status.
    pub status: String,
    /// Whether a nurse should review.
    pub needs_nurse_review: bool,
    /// Whether a doctor should review.
    pub needs_doctor_review: bool,
    /// Whether the conversation was escalated.
    pub escalated: bool,
    /// First escalation reason, if any.
    pub escalation_reason: Option<String>,
    /// Rounded mean score across AI messages (0-100).
    pub overall_score: u8,
    /// Per-dimension average scores.
    pub dimension_averages: DimensionAverages,
    /// Full message history, oldest first.
    pub messages: Vec<MessageResponse>,
    /// When the conversation was created (ISO 8601).
    pub created_at: String,
    /// When the conversation was last updated (ISO 8601).
    pub updated_at: String,
}

impl From<&Conversation> for ConversationResponse {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id().to_string(),
            patient_id: conversation.patient_id().to_string(),
            status: conversation.status().to_string(),
            needs_nurse_review: conversation.needs_nurse_review(),
            needs_doctor_review: conversation.needs_doctor_review(),
            escalated: conversation.is_escalated(),
            escalation_reason: conversation.escalation_reason().map(String::from),
            overall_score: conversation.overall_score().value(),
            dimension_averages: *conversation.dimension_averages(),
            messages: conversation.messages().iter().map(MessageResponse::from).collect(),
            created_at: conversation.created_at().as_datetime().to_rfc3339(),
            updated_at: conversation.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// A message within the care-team conversation view.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message id.
    pub id: String,
    /// Who authored it.
    pub sender: Sender,
    /// Message content.
    pub content: String,
    /// Assessment, present on AI messages.
    pub assessment: Option<AssessmentResponse>,
    /// Expert annotation, if reviewed.
    pub annotation: Option<AnnotationResponse>,
    /// When the message was created (ISO 8601).
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            sender: message.sender(),
            content: message.content().to_string(),
            assessment: message.assessment().map(AssessmentResponse::from),
            annotation: message.annotation().map(AnnotationResponse::from),
            created_at: message.created_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Assessment details for one AI message.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    /// Percentage of dimensions passing.
    pub overall_score: u8,
    /// Whether expert review was required.
    pub needs_expert_review: bool,
    /// Whether crisis language was detected.
    pub crisis_detected: bool,
    /// Whether escalation was required.
    pub escalation_required: bool,
    /// Evaluator summary.
    pub summary: String,
    /// Per-dimension verdicts.
    pub metrics: Vec<MetricResponse>,
}

impl From<&ConfidenceAssessment> for AssessmentResponse {
    fn from(assessment: &ConfidenceAssessment) -> Self {
        Self {
            overall_score: assessment.overall_score().value(),
            needs_expert_review: assessment.needs_expert_review(),
            crisis_detected: assessment.crisis_detected(),
            escalation_required: assessment.escalation_required(),
            summary: assessment.summary().to_string(),
            metrics: assessment
                .metrics()
                .iter()
                .map(|m| MetricResponse {
                    dimension: m.dimension().to_string(),
                    passed: m.passed(),
                    reason: m.reason().to_string(),
                })
                .collect(),
        }
    }
}

/// A single dimension verdict.
#[derive(Debug, Clone, Serialize)]
pub struct MetricResponse {
    /// Dimension display name.
    pub dimension: String,
    /// Whether the response passed.
    pub passed: bool,
    /// Evaluator rationale.
    pub reason: String,
}

/// An expert annotation on an AI message.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationResponse {
    /// The reviewing expert.
    pub reviewer_id: String,
    /// The verdict.
    pub decision: ReviewDecision,
    /// Reviewer notes.
    pub notes: Option<String>,
    /// When the review was recorded (ISO 8601).
    pub reviewed_at: String,
}

impl From<&ReviewerAnnotation> for AnnotationResponse {
    fn from(annotation: &ReviewerAnnotation) -> Self {
        Self {
            reviewer_id: annotation.reviewer_id().to_string(),
            decision: annotation.decision(),
            notes: annotation.notes().map(String::from),
            reviewed_at: annotation.reviewed_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Response after recording a review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRecordedResponse {
    /// The conversation reviewed.
    pub conversation_id: String,
    /// The annotated message.
    pub message_id: String,
    /// Conversation status after the review.
    pub status: String,
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates an error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PatientId;
    use crate::domain::safety::{Dimension, Metric};

    fn assessment() -> ConfidenceAssessment {
        let metrics = Dimension::ALL
            .iter()
            .enumerate()
            .map(|(i, d)| {
                if i == 4 {
                    Metric::fail(*d, "overstepped")
                } else {
                    Metric::pass(*d, "ok")
                }
            })
            .collect();
        ConfidenceAssessment::from_metrics(metrics, false, false, "One issue").unwrap()
    }

    #[test]
    fn send_message_response_omits_assessment_fields() {
        let response = SendMessageResponse {
            conversation_id: "c".to_string(),
            message_id: "m".to_string(),
            reply: "Hello".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        let object = json.as_object().unwrap();

        assert!(object.contains_key("reply"));
        assert!(!object.contains_key("overall_score"));
        assert!(!object.contains_key("needs_expert_review"));
        assert!(!object.contains_key("escalated"));
    }

    #[test]
    fn conversation_response_carries_review_state() {
        let mut conversation = Conversation::new(PatientId::new("patient-3").unwrap());
        conversation
            .append_message(Message::assistant("A reply", assessment()).unwrap())
            .unwrap();
        conversation.recompute_aggregates();
        conversation.require_nurse_review();

        let response = ConversationResponse::from(&conversation);
        assert!(response.needs_nurse_review);
        assert_eq!(response.overall_score, 80);
        assert_eq!(response.messages.len(), 1);

        let message = &response.messages[0];
        let assessment = message.assessment.as_ref().unwrap();
        assert_eq!(assessment.metrics.len(), 5);
        assert_eq!(assessment.metrics[4].dimension, "Professional Boundaries");
        assert!(!assessment.metrics[4].passed);
    }

    #[test]
    fn review_request_deserializes_with_defaults() {
        let json = r#"{"reviewer_id": "nurse-1", "decision": "approved"}"#;
        let request: RecordReviewRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.decision, ReviewDecision::Approved);
        assert!(request.notes.is_none());
        assert!(request.message_id.is_none());
    }
}
