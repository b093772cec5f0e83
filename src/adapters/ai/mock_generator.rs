//! Mock response generator for testing.
//!
//! Configurable to return queued replies, inject errors, or simulate
//! latency, with call tracking for verification.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GenerationError, HistoryTurn, ResponseGenerator};

/// A recorded call to the mock generator.
#[derive(Debug, Clone)]
pub struct RecordedGeneration {
    pub patient_message: String,
    pub history: Vec<HistoryTurn>,
}

enum QueuedReply {
    Success(String),
    Error(GenerationError),
}

/// Mock generator for testing.
///
/// Queued replies are consumed in order; when the queue is empty the last
/// configured reply repeats (or an `Unavailable` error if none was set).
#[derive(Clone, Default)]
pub struct MockGenerator {
    replies: Arc<Mutex<VecDeque<QueuedReply>>>,
    last_reply: Arc<Mutex<Option<String>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedGeneration>>>,
}

impl MockGenerator {
    /// Creates a new mock with no configured replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        let content = content.into();
        *self.last_reply.lock().unwrap() = Some(content.clone());
        self.replies
            .lock()
            .unwrap()
            .push_back(QueuedReply::Success(content));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(QueuedReply::Error(error));
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
    pub fn calls(&self) -> Vec<RecordedGeneration> {
        self.calls.lock().unwrap().clone()
    }

    /// History sent with the most recent call.
    pub fn last_history(&self) -> Option<Vec<HistoryTurn>> {
        self.calls.lock().unwrap().last().map(|c| c.history.clone())
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(
        &self,
        patient_message: &str,
        history: &[HistoryTurn],
    ) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(RecordedGeneration {
            patient_message: patient_message.to_string(),
            history: history.to_vec(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(QueuedReply::Success(content)) => Ok(content),
            Some(QueuedReply::Error(error)) => Err(error),
            None => match self.last_reply.lock().unwrap().clone() {
                Some(content) => Ok(content),
                None => Err(GenerationError::unavailable("no mock reply configured")),
            },
        }
    }
}
