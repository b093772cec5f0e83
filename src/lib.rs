//! CareBridge - Patient-Facing AI Conversation Backend
//!
//! This crate implements a clinical conversation pipeline with mandatory
//! safety gating: every AI reply is scored against five quality/safety
//! dimensions before it is accepted, and low-confidence or crisis
//! conversations are escalated to human reviewers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
