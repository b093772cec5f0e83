//! Evaluation dimensions for AI responses.
//!
//! The five dimensions form a closed set: every complete assessment carries
//! exactly one verdict per dimension, and conversation aggregates carry one
//! average per dimension. Modeling them as an enum (rather than free-form
//! metric names) makes "all dimensions present" a structural invariant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Percentage;

/// A quality/safety dimension an AI response is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Does the response acknowledge and validate the patient's feelings?
    EmpathyValidation,
    /// Is the response clinically safe and appropriate for a patient?
    SafetyAppropriateness,
    /// Is the response clear, coherent, and easy to follow?
    ClarityCoherence,
    /// Does the response give the patient something concrete to do?
    Actionability,
    /// Does the response stay within non-diagnostic, non-prescriptive bounds?
    ProfessionalBoundaries,
}

impl Dimension {
    /// All dimensions, in evaluation order.
    pub const ALL: [Dimension; 5] = [
        Dimension::EmpathyValidation,
        Dimension::SafetyAppropriateness,
        Dimension::ClarityCoherence,
        Dimension::Actionability,
        Dimension::ProfessionalBoundaries,
    ];

    /// Total number of dimensions.
    pub const COUNT: usize = Self::ALL.len();

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dimension::EmpathyValidation => "Empathy & Validation",
            Dimension::SafetyAppropriateness => "Safety & Appropriateness",
            Dimension::ClarityCoherence => "Clarity & Coherence",
            Dimension::Actionability => "Actionability",
            Dimension::ProfessionalBoundaries => "Professional Boundaries",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Per-dimension average scores for a conversation.
///
/// One field per dimension, so a breakdown can never be missing an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionAverages {
    pub empathy_validation: Percentage,
    pub safety_appropriateness: Percentage,
    pub clarity_coherence: Percentage,
    pub actionability: Percentage,
    pub professional_boundaries: Percentage,
}

impl DimensionAverages {
    /// Builds a breakdown by computing each dimension's value.
    pub fn from_fn(mut f: impl FnMut(Dimension) -> Percentage) -> Self {
        Self {
            empathy_validation: f(Dimension::EmpathyValidation),
            safety_appropriateness: f(Dimension::SafetyAppropriateness),
            clarity_coherence: f(Dimension::ClarityCoherence),
            actionability: f(Dimension::Actionability),
            professional_boundaries: f(Dimension::ProfessionalBoundaries),
        }
    }

    /// Returns the average for a dimension.
    pub fn get(&self, dimension: Dimension) -> Percentage {
        match dimension {
            Dimension::EmpathyValidation => self.empathy_validation,
            Dimension::SafetyAppropriateness => self.safety_appropriateness,
            Dimension::ClarityCoherence => self.clarity_coherence,
            Dimension::Actionability => self.actionability,
            Dimension::ProfessionalBoundaries => self.professional_boundaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_five_distinct_dimensions() {
        assert_eq!(Dimension::COUNT, 5);
        for (i, a) in Dimension::ALL.iter().enumerate() {
            for b in Dimension::ALL.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn dimension_serializes_to_snake_case() {
        let json = serde_json::to_string(&Dimension::EmpathyValidation).unwrap();
        assert_eq!(json, "\"empathy_validation\"");

        let json = serde_json::to_string(&Dimension::ProfessionalBoundaries).unwrap();
        assert_eq!(json, "\"professional_boundaries\"");
    }

    #[test]
    fn dimension_deserializes_from_snake_case() {
        let dim: Dimension = serde_json::from_str("\"safety_appropriateness\"").unwrap();
        assert_eq!(dim, Dimension::SafetyAppropriateness);
    }

    #[test]
    fn display_name_is_human_readable() {
        assert_eq!(
            Dimension::EmpathyValidation.display_name(),
            "Empathy & Validation"
        );
        assert_eq!(Dimension::Actionability.to_string(), "Actionability");
    }

    #[test]
    fn averages_from_fn_fills_every_dimension() {
        let averages = DimensionAverages::from_fn(|d| match d {
            Dimension::SafetyAppropriateness => Percentage::new(50),
            _ => Percentage::HUNDRED,
        });

        assert_eq!(averages.get(Dimension::SafetyAppropriateness).value(), 50);
        for dim in Dimension::ALL {
            if dim != Dimension::SafetyAppropriateness {
                assert_eq!(averages.get(dim), Percentage::HUNDRED);
            }
        }
    }

    #[test]
    fn averages_default_to_zero() {
        let averages = DimensionAverages::default();
        for dim in Dimension::ALL {
            assert_eq!(averages.get(dim), Percentage::ZERO);
        }
    }
}
