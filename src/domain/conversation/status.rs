//! Conversation lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a conversation.
///
/// Escalation is tracked separately on the conversation as an orthogonal
/// flag; it does not have its own state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Patient and AI are exchanging messages.
    Active,
    /// Flagged for expert review; still accepting patient messages.
    PendingReview,
    /// An expert has recorded a review decision.
    Reviewed,
    /// Terminal state; no further messages accepted.
    Closed,
}

impl StateMachine for ConversationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            // A later message can re-flag a reviewed conversation.
            ConversationStatus::Active => {
                vec![ConversationStatus::PendingReview, ConversationStatus::Closed]
            }
            ConversationStatus::PendingReview => {
                vec![ConversationStatus::Reviewed, ConversationStatus::Closed]
            }
            ConversationStatus::Reviewed => {
                vec![ConversationStatus::PendingReview, ConversationStatus::Closed]
            }
            ConversationStatus::Closed => vec![],
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationStatus::Active => "active",
            ConversationStatus::PendingReview => "pending_review",
            ConversationStatus::Reviewed => "reviewed",
            ConversationStatus::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
