//! Mock response evaluator for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{EvaluationError, EvaluationOutcome, ResponseEvaluator};

/// A recorded call to the mock evaluator.
#[derive(Debug, Clone)]
pub struct RecordedEvaluation {
    pub patient_message: String,
    pub ai_response: String,
}

enum QueuedOutcome {
    Success(EvaluationOutcome),
    Error(EvaluationError),
}

/// Mock evaluator for testing.
///
/// Queued outcomes are consumed in order; when the queue is empty the last
/// configured outcome repeats (or an `Unavailable` error if none was set).
#[derive(Clone, Default)]
pub struct MockEvaluator {
    outcomes: Arc<Mutex<VecDeque<QueuedOutcome>>>,
    last_outcome: Arc<Mutex<Option<EvaluationOutcome>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedEvaluation>>>,
}

impl MockEvaluator {
    /// Creates a new mock with no configured outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful outcome.
    pub fn with_outcome(self, outcome: EvaluationOutcome) -> Self {
        *self.last_outcome.lock().unwrap() = Some(outcome.clone());
        self.outcomes
            .lock()
            .unwrap()
            .push_back(QueuedOutcome::Success(outcome));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: EvaluationError) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(QueuedOutcome::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<RecordedEvaluation> {
        self.calls.lock().unwrap().clone()
    }

    /// The AI response text from the most recent call.
    pub fn last_ai_response(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|c| c.ai_response.clone())
    }
}

#[async_trait]
impl ResponseEvaluator for MockEvaluator {
    async fn evaluate(
        &self,
        patient_message: &str,
        ai_response: &str,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        self.calls.lock().unwrap().push(RecordedEvaluation {
            patient_message: patient_message.to_string(),
            ai_response: ai_response.to_string(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let queued = self.outcomes.lock().unwrap().pop_front();
        match queued {
            Some(QueuedOutcome::Success(outcome)) => Ok(outcome),
            Some(QueuedOutcome::Error(error)) => Err(error),
            None => match self.last_outcome.lock().unwrap().clone() {
                Some(outcome) => Ok(outcome),
                None => Err(EvaluationError::unavailable("no mock outcome configured")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::safety::{Dimension, Metric};

    fn outcome(summary: &str) -> EvaluationOutcome {
        EvaluationOutcome {
            metrics: Dimension::ALL.iter().map(|d| Metric::pass(*d, "ok")).collect(),
            needs_intervention: false,
            summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn outcomes_are_consumed_then_last_repeats() {
        let mock = MockEvaluator::new()
            .with_outcome(outcome("first"))
            .with_outcome(outcome("second"));

        assert_eq!(mock.evaluate("q", "a").await.unwrap().summary, "first");
        assert_eq!(mock.evaluate("q", "a").await.unwrap().summary, "second");
        assert_eq!(mock.evaluate("q", "a").await.unwrap().summary, "second");
    }

    #[tokio::test]
    async fn recorded_calls_capture_both_sides() {
        let mock = MockEvaluator::new().with_outcome(outcome("s"));
        mock.evaluate("patient text", "ai text").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].patient_message, "patient text");
        assert_eq!(calls[0].ai_response, "ai text");
        assert_eq!(mock.last_ai_response().as_deref(), Some("ai text"));
    }

    #[tokio::test]
    async fn queued_error_is_returned() {
        let mock = MockEvaluator::new()
            .with_error(EvaluationError::network("refused"));
        assert!(mock.evaluate("q", "a").await.is_err());
    }
}
