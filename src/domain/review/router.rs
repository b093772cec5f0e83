//! Routes cycle results into the conversation's review state.
//!
//! Two review tiers: nurses handle quality concerns (any failed dimension or
//! a below-threshold score), doctors handle escalations (crisis language or
//! evaluator intervention). A single cycle can raise both.

use tracing::info;

use crate::domain::conversation::{Conversation, ConversationStatus};
use crate::domain::foundation::DomainError;
use crate::domain::workflow::CycleResult;

/// Applies a cycle's assessment to the owning conversation.
pub struct ReviewRouter;

impl ReviewRouter {
    /// Updates aggregates, review flags, and status from one cycle result.
    ///
    /// Call after the AI message has been appended to the conversation, so
    /// aggregates cover the new assessment. Flags are sticky; the status
    /// moves to pending review the first time any flag goes up.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the conversation cannot enter review
    ///   (it is closed, which the caller should have rejected earlier)
    pub fn apply(
        conversation: &mut Conversation,
        result: &CycleResult,
    ) -> Result<(), DomainError> {
        conversation.recompute_aggregates();

        let assessment = &result.assessment;
        let mut flagged = false;

        if assessment.needs_expert_review() {
            conversation.require_nurse_review();
            flagged = true;
        }

        if assessment.escalation_required() {
            conversation.require_doctor_review();
            let reason = if result.crisis_detected {
                "Crisis language detected in patient message".to_string()
            } else {
                assessment.summary().to_string()
            };
            conversation.mark_escalated(reason);
            flagged = true;
        }

        if flagged && conversation.status() != ConversationStatus::PendingReview {
            conversation.request_review()?;
            info!(
                conversation_id = %conversation.id(),
                needs_nurse_review = conversation.needs_nurse_review(),
                needs_doctor_review = conversation.needs_doctor_review(),
                escalated = conversation.is_escalated(),
                overall_score = %conversation.overall_score(),
                "Conversation routed to review queue"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;
    use crate::domain::foundation::PatientId;
    use crate::domain::safety::{ConfidenceAssessment, Dimension, Metric};

    fn conversation() -> Conversation {
        Conversation::new(PatientId::new("patient-9").unwrap())
    }

    fn assessment(passing: usize, crisis: bool, intervention: bool) -> ConfidenceAssessment {
        let metrics = Dimension::ALL
            .iter()
            .enumerate()
            .map(|(i, d)| {
                if i < passing {
                    Metric::pass(*d, "ok")
                } else {
                    Metric::fail(*d, "weak")
                }
            })
            .collect();
        ConfidenceAssessment::from_metrics(metrics, crisis, intervention, "summary").unwrap()
    }

    fn cycle_result(assessment: ConfidenceAssessment, crisis: bool) -> CycleResult {
        CycleResult {
            ai_response: "a reply".to_string(),
            assessment,
            crisis_detected: crisis,
        }
    }

    fn append_assistant(conversation: &mut Conversation, assessment: &ConfidenceAssessment) {
        conversation
            .append_message(Message::assistant("a reply", assessment.clone()).unwrap())
            .unwrap();
    }

    #[test]
    fn clean_result_leaves_conversation_active() {
        let mut conv = conversation();
        let a = assessment(5, false, false);
        append_assistant(&mut conv, &a);

        ReviewRouter::apply(&mut conv, &cycle_result(a, false)).unwrap();

        assert_eq!(conv.status(), ConversationStatus::Active);
        assert!(!conv.needs_nurse_review());
        assert!(!conv.needs_doctor_review());
        assert_eq!(conv.overall_score().value(), 100);
    }

    #[test]
    fn failed_dimension_routes_to_nurse_queue() {
        let mut conv = conversation();
        let a = assessment(4, false, false);
        append_assistant(&mut conv, &a);

        ReviewRouter::apply(&mut conv, &cycle_result(a, false)).unwrap();

        assert_eq!(conv.status(), ConversationStatus::PendingReview);
        assert!(conv.needs_nurse_review());
        assert!(!conv.needs_doctor_review());
        assert!(!conv.is_escalated());
        assert_eq!(conv.overall_score().value(), 80);
    }

    #[test]
    fn crisis_routes_to_doctor_queue_with_reason() {
        let mut conv = conversation();
        let a = assessment(5, true, false);
        append_assistant(&mut conv, &a);

        ReviewRouter::apply(&mut conv, &cycle_result(a, true)).unwrap();

        assert_eq!(conv.status(), ConversationStatus::PendingReview);
        // Clean template scores do not raise the nurse flag.
        assert!(!conv.needs_nurse_review());
        assert!(conv.needs_doctor_review());
        assert!(conv.is_escalated());
        assert_eq!(
            conv.escalation_reason(),
            Some("Crisis language detected in patient message")
        );
    }

    #[test]
    fn intervention_escalates_with_evaluator_summary() {
        let mut conv = conversation();
        let a = assessment(5, false, true);
        append_assistant(&mut conv, &a);

        ReviewRouter::apply(&mut conv, &cycle_result(a, false)).unwrap();

        assert!(conv.is_escalated());
        assert_eq!(conv.escalation_reason(), Some("summary"));
    }

    #[test]
    fn flags_accumulate_across_cycles() {
        let mut conv = conversation();
        let first = assessment(4, false, false);
        append_assistant(&mut conv, &first);
        ReviewRouter::apply(&mut conv, &cycle_result(first, false)).unwrap();
        assert!(conv.needs_nurse_review());
        assert!(!conv.needs_doctor_review());

        let second = assessment(5, true, false);
        append_assistant(&mut conv, &second);
        ReviewRouter::apply(&mut conv, &cycle_result(second, true)).unwrap();

        // Nurse flag is sticky even though the second response was clean.
        assert!(conv.needs_nurse_review());
        assert!(conv.needs_doctor_review());
        assert_eq!(conv.status(), ConversationStatus::PendingReview);
    }

    #[test]
    fn aggregates_recompute_over_full_history() {
        let mut conv = conversation();
        let first = assessment(5, false, false); // 100
        append_assistant(&mut conv, &first);
        ReviewRouter::apply(&mut conv, &cycle_result(first, false)).unwrap();
        assert_eq!(conv.overall_score().value(), 100);

        let second = assessment(3, false, false); // 60
        append_assistant(&mut conv, &second);
        ReviewRouter::apply(&mut conv, &cycle_result(second, false)).unwrap();
        assert_eq!(conv.overall_score().value(), 80);
    }

    #[test]
    fn already_pending_conversation_does_not_retransition() {
        let mut conv = conversation();
        let first = assessment(4, false, false);
        append_assistant(&mut conv, &first);
        ReviewRouter::apply(&mut conv, &cycle_result(first, false)).unwrap();
        assert_eq!(conv.status(), ConversationStatus::PendingReview);

        let second = assessment(4, false, false);
        append_assistant(&mut conv, &second);
        // Would be an invalid self-transition if attempted.
        ReviewRouter::apply(&mut conv, &cycle_result(second, false)).unwrap();
        assert_eq!(conv.status(), ConversationStatus::PendingReview);
    }
}
