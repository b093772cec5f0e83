//! Confidence assessment for a single AI response.
//!
//! An assessment is created once per AI turn and never mutated. The overall
//! score is the percentage of dimensions passing, so with five dimensions it
//! is always a multiple of 20 - except the evaluation-failure fallback, which
//! forces zero.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Percentage};

use super::{Dimension, DimensionAverages};

/// Score below which expert review is always required.
pub const REVIEW_THRESHOLD: u8 = 90;

/// A single PASS/FAIL verdict on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    dimension: Dimension,
    passed: bool,
    reason: String,
}

impl Metric {
    /// Creates a metric verdict.
    pub fn new(dimension: Dimension, passed: bool, reason: impl Into<String>) -> Self {
        Self {
            dimension,
            passed,
            reason: reason.into(),
        }
    }

    /// Creates a passing verdict.
    pub fn pass(dimension: Dimension, reason: impl Into<String>) -> Self {
        Self::new(dimension, true, reason)
    }

    /// Creates a failing verdict.
    pub fn fail(dimension: Dimension, reason: impl Into<String>) -> Self {
        Self::new(dimension, false, reason)
    }

    /// The dimension this verdict covers.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Whether the response passed this dimension.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Free-text rationale from the evaluator.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Numeric display value derived from the verdict (100 pass, 0 fail).
    ///
    /// The boolean is the source of truth; numbers are only ever derived.
    pub fn score(&self) -> Percentage {
        if self.passed {
            Percentage::HUNDRED
        } else {
            Percentage::ZERO
        }
    }
}

/// Immutable assessment of one AI response across all dimensions.
///
/// Deserialization validates dimension coverage, so reconstituted
/// assessments carry the same guarantee as freshly built ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredAssessment")]
pub struct ConfidenceAssessment {
    metrics: Vec<Metric>,
    overall_score: Percentage,
    needs_expert_review: bool,
    crisis_detected: bool,
    escalation_required: bool,
    summary: String,
}

impl ConfidenceAssessment {
    /// Builds an assessment from evaluator verdicts.
    ///
    /// `crisis_detected` mirrors the upstream crisis check for this cycle;
    /// `needs_intervention` is the evaluator's own strong-intervention flag.
    ///
    /// # Errors
    ///
    /// - `IncompleteAssessment` if the verdicts do not cover every dimension
    ///   exactly once
    pub fn from_metrics(
        metrics: Vec<Metric>,
        crisis_detected: bool,
        needs_intervention: bool,
        summary: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_coverage(&metrics)?;

        let passing = metrics.iter().filter(|m| m.passed()).count();
        let overall_score = Percentage::ratio(passing, metrics.len());
        let any_failed = passing < metrics.len();
        let needs_expert_review = any_failed || overall_score.value() < REVIEW_THRESHOLD;
        let escalation_required = needs_intervention || crisis_detected;

        Ok(Self {
            metrics,
            overall_score,
            needs_expert_review,
            crisis_detected,
            escalation_required,
            summary: summary.into(),
        })
    }

    /// Conservative fallback assessment for when the evaluation capability
    /// itself failed.
    ///
    /// Every dimension fails, the score is forced to zero, and both review
    /// and escalation flags are raised. Evaluation failure must never let
    /// content through unscrutinized.
    pub fn evaluation_failed(crisis_detected: bool) -> Self {
        let metrics = Dimension::ALL
            .iter()
            .map(|d| Metric::fail(*d, "Evaluation unavailable; dimension could not be verified"))
            .collect();

        Self {
            metrics,
            overall_score: Percentage::ZERO,
            needs_expert_review: true,
            crisis_detected,
            escalation_required: true,
            summary: "Automated evaluation failed; response requires expert review".to_string(),
        }
    }

    /// Verdicts in evaluation order.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// The verdict for a specific dimension.
    pub fn metric(&self, dimension: Dimension) -> &Metric {
        // validate_coverage guarantees every dimension is present
        self.metrics
            .iter()
            .find(|m| m.dimension() == dimension)
            .expect("assessment covers all dimensions")
    }

    /// Percentage of dimensions passing (0 for fallback assessments).
    pub fn overall_score(&self) -> Percentage {
        self.overall_score
    }

    /// True when any dimension failed or the score is below threshold.
    pub fn needs_expert_review(&self) -> bool {
        self.needs_expert_review
    }

    /// Crisis flag carried over from the upstream crisis check.
    pub fn crisis_detected(&self) -> bool {
        self.crisis_detected
    }

    /// True when strong intervention is needed or a crisis was detected.
    pub fn escalation_required(&self) -> bool {
        self.escalation_required
    }

    /// Narrative summary from the evaluator.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Derived per-dimension display scores (100 pass / 0 fail).
    pub fn dimension_scores(&self) -> DimensionAverages {
        DimensionAverages::from_fn(|d| self.metric(d).score())
    }

    fn validate_coverage(metrics: &[Metric]) -> Result<(), DomainError> {
        for dimension in Dimension::ALL {
            let count = metrics
                .iter()
                .filter(|m| m.dimension() == dimension)
                .count();
            if count != 1 {
                return Err(DomainError::new(
                    ErrorCode::IncompleteAssessment,
                    format!(
                        "Expected exactly one verdict for {}, got {}",
                        dimension, count
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Wire shape of a stored assessment, checked before it becomes a
/// [`ConfidenceAssessment`].
#[derive(Deserialize)]
struct StoredAssessment {
    metrics: Vec<Metric>,
    overall_score: Percentage,
    needs_expert_review: bool,
    crisis_detected: bool,
    escalation_required: bool,
    summary: String,
}

impl TryFrom<StoredAssessment> for ConfidenceAssessment {
    type Error = DomainError;

    fn try_from(stored: StoredAssessment) -> Result<Self, Self::Error> {
        Self::validate_coverage(&stored.metrics)?;
        Ok(Self {
            metrics: stored.metrics,
            overall_score: stored.overall_score,
            needs_expert_review: stored.needs_expert_review,
            crisis_detected: stored.crisis_detected,
            escalation_required: stored.escalation_required,
            summary: stored.summary,
        })
    }
}
