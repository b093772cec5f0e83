//! Ports - trait boundaries between the domain and the outside world.
//!
//! Adapters implement these traits; the workflow and application handlers
//! depend only on the traits.

mod message_store;
mod response_evaluator;
mod response_generator;

pub use message_store::{MessageStore, StoreError};
pub use response_evaluator::{EvaluationError, EvaluationOutcome, ResponseEvaluator};
pub use response_generator::{GenerationError, HistoryTurn, ResponseGenerator, TurnRole};
