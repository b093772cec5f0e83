//! Domain layer - core business logic.
//!
//! Pure domain types and rules with no I/O. External capabilities
//! (generation, evaluation, storage) are reached through the ports layer.

pub mod conversation;
pub mod foundation;
pub mod review;
pub mod safety;
pub mod workflow;
