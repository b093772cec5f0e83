//! Workflow domain - the per-message processing cycle.

mod cycle;

pub use cycle::{
    ConversationWorkflow, CycleResult, CycleState, DEFAULT_FALLBACK_MESSAGE,
    DEFAULT_SAFETY_MESSAGE, HISTORY_WINDOW,
};
