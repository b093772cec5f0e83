//! Response Evaluator Port - Interface for the confidence-scoring capability.
//!
//! The evaluator inspects a drafted AI reply in the context of the patient's
//! message and returns a PASS/FAIL verdict per quality dimension plus an
//! intervention flag. Translating those raw verdicts into a
//! `ConfidenceAssessment` is domain logic and happens in the workflow, not
//! here.

use async_trait::async_trait;

use crate::domain::safety::Metric;

/// Port for evaluating AI response quality and safety.
#[async_trait]
pub trait ResponseEvaluator: Send + Sync {
    /// Scores an AI response against the patient message that prompted it.
    async fn evaluate(
        &self,
        patient_message: &str,
        ai_response: &str,
    ) -> Result<EvaluationOutcome, EvaluationError>;
}

/// Raw evaluator output, before domain validation.
///
/// The metric list is whatever the service returned; the workflow validates
/// dimension coverage when building the assessment.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// Per-dimension verdicts as returned by the service.
    pub metrics: Vec<Metric>,
    /// True when the evaluator itself judges that a human must step in.
    pub needs_intervention: bool,
    /// Narrative summary of the evaluation.
    pub summary: String,
}

/// Evaluation service errors.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Rate limited by the service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Service is unavailable.
    #[error("evaluation service unavailable: {message}")]
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

impl EvaluationError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
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
            EvaluationError::RateLimited { .. }
                | EvaluationError::Unavailable { .. }
                | EvaluationError::Network(_)
                | EvaluationError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_error_retryable_classification() {
        assert!(EvaluationError::rate_limited(10).is_retryable());
        assert!(EvaluationError::unavailable("overloaded").is_retryable());
        assert!(EvaluationError::network("refused").is_retryable());
        assert!(EvaluationError::Timeout { timeout_secs: 20 }.is_retryable());

        assert!(!EvaluationError::AuthenticationFailed.is_retryable());
        assert!(!EvaluationError::parse("truncated body").is_retryable());
    }

    #[test]
    fn evaluation_error_displays_correctly() {
        let err = EvaluationError::unavailable("503 from upstream");
        assert_eq!(
            err.to_string(),
            "evaluation service unavailable: 503 from upstream"
        );
    }
}
