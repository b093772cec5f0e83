//! Response Generator Port - Interface for the reply-drafting AI capability.
//!
//! This port abstracts the external service that drafts patient-facing
//! replies, so the conversation workflow can request a response without
//! coupling to a specific provider or wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Message, Sender};

/// Port for generating patient-facing AI responses.
///
/// Implementations connect to an external generation service and translate
/// between its API and our domain types. The caller supplies the current
/// patient message plus a bounded window of prior turns for context.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Drafts a reply to the patient's message given recent history.
    ///
    /// History is oldest-first and already truncated by the caller.
    async fn generate(
        &self,
        patient_message: &str,
        history: &[HistoryTurn],
    ) -> Result<String, GenerationError>;
}

/// One prior turn of conversation context sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Who spoke.
    pub role: TurnRole,
    /// What they said.
    pub content: String,
}

impl HistoryTurn {
    /// Creates a new history turn.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a patient turn.
    pub fn patient(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Patient, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Converts a stored message into a history turn.
    ///
    /// Reviewer messages are internal and never forwarded to the generator,
    /// so they map to `None`.
    pub fn from_message(message: &Message) -> Option<Self> {
        match message.sender() {
            Sender::Patient => Some(Self::patient(message.content())),
            Sender::Assistant => Some(Self::assistant(message.content())),
            Sender::Reviewer => None,
        }
    }
}

/// Role of a history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The patient's own words.
    Patient,
    /// A prior AI reply.
    Assistant,
}

/// Generation service errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by the service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Service is unavailable.
    #[error("generation service unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl GenerationError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{Message, ReviewDecision, ReviewerAnnotation};
    use crate::domain::foundation::ReviewerId;
    use crate::domain::safety::{ConfidenceAssessment, Dimension, Metric};

    #[test]
    fn history_turn_constructors_work() {
        let patient = HistoryTurn::patient("My back hurts");
        let assistant = HistoryTurn::assistant("How long has it hurt?");

        assert_eq!(patient.role, TurnRole::Patient);
        assert_eq!(assistant.role, TurnRole::Assistant);
        assert_eq!(patient.content, "My back hurts");
    }

    #[test]
    fn from_message_maps_patient_and_assistant() {
        let metrics = Dimension::ALL.iter().map(|d| Metric::pass(*d, "ok")).collect();
        let assessment =
            ConfidenceAssessment::from_metrics(metrics, false, false, "s").unwrap();

        let patient = Message::patient("hello").unwrap();
        let assistant = Message::assistant("hi there", assessment).unwrap();

        assert_eq!(
            HistoryTurn::from_message(&patient).unwrap().role,
            TurnRole::Patient
        );
        assert_eq!(
            HistoryTurn::from_message(&assistant).unwrap().role,
            TurnRole::Assistant
        );
    }

    #[test]
    fn from_message_skips_reviewer_messages() {
        let message = Message::reconstitute(
            crate::domain::foundation::MessageId::new(),
            Sender::Reviewer,
            "Reviewed and approved".to_string(),
            None,
            Some(ReviewerAnnotation::new(
                ReviewerId::new("nurse-1").unwrap(),
                ReviewDecision::Approved,
                None,
            )),
            crate::domain::foundation::Timestamp::now(),
        );
        assert!(HistoryTurn::from_message(&message).is_none());
    }

    #[test]
    fn turn_role_serializes_lowercase() {
        let json = serde_json::to_string(&TurnRole::Patient).unwrap();
        assert_eq!(json, "\"patient\"");
        let json = serde_json::to_string(&TurnRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn generation_error_retryable_classification() {
        assert!(GenerationError::rate_limited(30).is_retryable());
        assert!(GenerationError::unavailable("down").is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::content_filtered("unsafe").is_retryable());
        assert!(!GenerationError::parse("bad json").is_retryable());
    }

    #[test]
    fn generation_error_displays_correctly() {
        let err = GenerationError::rate_limited(30);
        assert_eq!(err.to_string(), "rate limited: retry after 30s");

        let err = GenerationError::Timeout { timeout_secs: 45 };
        assert_eq!(err.to_string(), "request timed out after 45s");
    }
}
