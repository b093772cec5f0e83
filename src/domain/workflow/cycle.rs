//! The message processing cycle.
//!
//! Every patient message runs through the same explicit state machine:
//!
//! ```text
//! Start -> CrisisCheck -> CrisisResponse ---\
//!                     \-> GenerateResponse --+-> EvaluateResponse -> End
//! ```
//!
//! The crisis branch never calls the generation capability; it emits a
//! vetted safety template instead. Both branches reach evaluation, even
//! when generation failed and the reply is the fallback text; on the
//! crisis branch the recorded assessment always carries
//! `escalation_required = true`. The cycle itself is infallible:
//! capability failures degrade to conservative results rather than
//! surfacing as errors.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::conversation::Message;
use crate::domain::foundation::StateMachine;
use crate::domain::safety::{ConfidenceAssessment, CrisisDetector};
use crate::ports::{HistoryTurn, ResponseEvaluator, ResponseGenerator};

/// Default number of prior messages sent to the generator as context.
pub const HISTORY_WINDOW: usize = 10;

/// Vetted template returned when crisis language is detected.
pub const DEFAULT_SAFETY_MESSAGE: &str = "I'm really concerned about what you're going through \
right now, and I want to make sure you get support from someone who can truly help. Please reach \
out to one of these resources right away:\n\n\
- Call or text 988 (Suicide & Crisis Lifeline), available 24/7\n\
- Text HOME to 741741 (Crisis Text Line)\n\
- If you are in immediate danger, call 911\n\n\
Your care team has been notified and someone will follow up with you as soon as possible. You \
don't have to face this alone.";

/// Reply used when the generation service fails.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "I'm sorry, I'm having trouble responding right now. \
Your message has been saved and a member of your care team will review it. If this is urgent, \
please contact your care team directly or call 911.";

/// States of the per-message processing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Cycle accepted a patient message.
    Start,
    /// Scanning the message for crisis language.
    CrisisCheck,
    /// Crisis detected; returning the safety template.
    CrisisResponse,
    /// Drafting a reply via the generation service.
    GenerateResponse,
    /// Scoring the drafted reply.
    EvaluateResponse,
    /// Cycle complete.
    End,
}

impl StateMachine for CycleState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            CycleState::Start => vec![CycleState::CrisisCheck],
            CycleState::CrisisCheck => {
                vec![CycleState::CrisisResponse, CycleState::GenerateResponse]
            }
            CycleState::CrisisResponse => vec![CycleState::EvaluateResponse],
            CycleState::GenerateResponse => vec![CycleState::EvaluateResponse],
            CycleState::EvaluateResponse => vec![CycleState::End],
            CycleState::End => vec![],
        }
    }
}

/// Outcome of one processing cycle.
#[derive(Debug, Clone)]
pub struct CycleResult {
    /// The reply to send to the patient.
    pub ai_response: String,
    /// Assessment attached to the reply.
    pub assessment: ConfidenceAssessment,
    /// Whether the crisis branch was taken.
    pub crisis_detected: bool,
}

/// Runs the crisis-check / generate / evaluate cycle for one message.
///
/// Dependencies are injected; the workflow owns no I/O of its own.
pub struct ConversationWorkflow {
    detector: CrisisDetector,
    generator: Arc<dyn ResponseGenerator>,
    evaluator: Arc<dyn ResponseEvaluator>,
    safety_message: String,
    fallback_message: String,
    history_window: usize,
}

impl ConversationWorkflow {
    /// Creates a workflow with default safety and fallback templates.
    pub fn new(
        detector: CrisisDetector,
        generator: Arc<dyn ResponseGenerator>,
        evaluator: Arc<dyn ResponseEvaluator>,
    ) -> Self {
        Self {
            detector,
            generator,
            evaluator,
            safety_message: DEFAULT_SAFETY_MESSAGE.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            history_window: HISTORY_WINDOW,
        }
    }

    /// Overrides the crisis safety template.
    pub fn with_safety_message(mut self, message: impl Into<String>) -> Self {
        self.safety_message = message.into();
        self
    }

    /// Overrides the generation-failure fallback text.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Overrides how many prior messages are forwarded to the generator.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Number of prior messages forwarded to the generator as context.
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Processes one patient message against the recent history.
    ///
    /// `history` is the stored message history (any length); only the last
    /// [`history_window`](Self::history_window) entries are forwarded to
    /// the generator. This
    /// method never fails; every branch produces a reply and an assessment.
    pub async fn run(&self, patient_message: &str, history: &[Message]) -> CycleResult {
        let mut state = CycleState::Start;
        let mut crisis_detected = false;
        let mut ai_response = String::new();

        loop {
            match state {
                CycleState::Start => {
                    state = advance(state, CycleState::CrisisCheck);
                }
                CycleState::CrisisCheck => {
                    crisis_detected = self.detector.detect(patient_message);
                    state = if crisis_detected {
                        advance(state, CycleState::CrisisResponse)
                    } else {
                        advance(state, CycleState::GenerateResponse)
                    };
                }
                CycleState::CrisisResponse => {
                    info!("Crisis language detected, returning safety template");
                    ai_response = self.safety_message.clone();
                    state = advance(state, CycleState::EvaluateResponse);
                }
                CycleState::GenerateResponse => {
                    ai_response = match self.generate(patient_message, history).await {
                        Ok(reply) => reply,
                        Err(fallback) => fallback,
                    };
                    state = advance(state, CycleState::EvaluateResponse);
                }
                CycleState::EvaluateResponse => {
                    let assessment = self
                        .evaluate(patient_message, &ai_response, crisis_detected)
                        .await;
                    return CycleResult {
                        ai_response,
                        assessment,
                        crisis_detected,
                    };
                }
                CycleState::End => unreachable!("cycle returns before reaching End"),
            }
        }
    }

    async fn generate(
        &self,
        patient_message: &str,
        history: &[Message],
    ) -> Result<String, String> {
        let start = history.len().saturating_sub(self.history_window);
        let turns: Vec<HistoryTurn> = history[start..]
            .iter()
            .filter_map(HistoryTurn::from_message)
            .collect();

        match self.generator.generate(patient_message, &turns).await {
            Ok(reply) if !reply.trim().is_empty() => Ok(reply),
            Ok(_) => {
                warn!("Generator returned empty reply, using fallback");
                Err(self.fallback_message.clone())
            }
            Err(error) => {
                warn!(%error, retryable = error.is_retryable(), "Generation failed, using fallback");
                Err(self.fallback_message.clone())
            }
        }
    }

    /// Scores the reply. The crisis flag is folded into the assessment so
    /// escalation is recorded consistently whichever branch produced it.
    async fn evaluate(
        &self,
        patient_message: &str,
        ai_response: &str,
        crisis_detected: bool,
    ) -> ConfidenceAssessment {
        match self.evaluator.evaluate(patient_message, ai_response).await {
            Ok(outcome) => {
                match ConfidenceAssessment::from_metrics(
                    outcome.metrics,
                    crisis_detected,
                    outcome.needs_intervention,
                    outcome.summary,
                ) {
                    Ok(assessment) => assessment,
                    Err(error) => {
                        warn!(%error, "Evaluator returned incomplete verdicts");
                        ConfidenceAssessment::evaluation_failed(crisis_detected)
                    }
                }
            }
            Err(error) => {
                warn!(%error, retryable = error.is_retryable(), "Evaluation failed");
                ConfidenceAssessment::evaluation_failed(crisis_detected)
            }
        }
    }
}

fn advance(from: CycleState, to: CycleState) -> CycleState {
    debug_assert!(from.can_transition_to(&to));
    to
}
