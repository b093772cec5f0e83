//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                100,
                value as i32,
            ));
        }
        Ok(Self(value))
    }

    /// Computes the rounded ratio `numerator / denominator` as a percentage.
    ///
    /// Returns zero when the denominator is zero.
    pub fn ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        let pct = (numerator as f64 / denominator as f64) * 100.0;
        Self::new(pct.round() as u8)
    }

    /// Computes the rounded arithmetic mean of the given values.
    ///
    /// Returns zero for an empty slice.
    pub fn mean(values: &[Percentage]) -> Self {
        if values.is_empty() {
            return Self::ZERO;
        }
        let sum: u32 = values.iter().map(|p| u32::from(p.0)).sum();
        let mean = sum as f64 / values.len() as f64;
        Self::new(mean.round() as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
        assert_eq!(Percentage::new(60).value(), 60);
    }

    #[test]
    fn percentage_try_new_rejects_over_100() {
        let result = Percentage::try_new(120);
        match result {
            Err(ValidationError::OutOfRange { field, min, max, actual }) => {
                assert_eq!(field, "percentage");
                assert_eq!(min, 0);
                assert_eq!(max, 100);
                assert_eq!(actual, 120);
            }
            _ => panic!("Expected OutOfRange error"),
        }
    }

    #[test]
    fn ratio_computes_passing_fraction() {
        assert_eq!(Percentage::ratio(4, 5).value(), 80);
        assert_eq!(Percentage::ratio(5, 5).value(), 100);
        assert_eq!(Percentage::ratio(0, 5).value(), 0);
        assert_eq!(Percentage::ratio(1, 3).value(), 33);
        assert_eq!(Percentage::ratio(2, 3).value(), 67);
    }

    #[test]
    fn ratio_with_zero_denominator_is_zero() {
        assert_eq!(Percentage::ratio(3, 0), Percentage::ZERO);
    }

    #[test]
    fn mean_rounds_to_nearest() {
        let values = [Percentage::new(100), Percentage::new(60)];
        assert_eq!(Percentage::mean(&values).value(), 80);

        let values = [Percentage::new(100), Percentage::new(100), Percentage::new(0)];
        assert_eq!(Percentage::mean(&values).value(), 67);
    }

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(Percentage::mean(&[]), Percentage::ZERO);
    }

    #[test]
    fn percentage_displays_correctly() {
        assert_eq!(format!("{}", Percentage::new(80)), "80%");
        assert_eq!(format!("{}", Percentage::ZERO), "0%");
    }

    #[test]
    fn percentage_serializes_as_bare_number() {
        let pct = Percentage::new(42);
        let json = serde_json::to_string(&pct).unwrap();
        assert_eq!(json, "42");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ratio_is_always_in_range(numerator in 0usize..1000, denominator in 0usize..1000) {
                let pct = Percentage::ratio(numerator, denominator);
                prop_assert!(pct.value() <= 100);
            }

            #[test]
            fn ratio_of_full_fraction_is_hundred(denominator in 1usize..1000) {
                prop_assert_eq!(Percentage::ratio(denominator, denominator), Percentage::HUNDRED);
            }

            #[test]
            fn mean_is_bounded_by_extremes(values in proptest::collection::vec(0u8..=100, 1..20)) {
                let values: Vec<Percentage> = values.into_iter().map(Percentage::new).collect();
                let mean = Percentage::mean(&values);
                let min = values.iter().min().unwrap();
                let max = values.iter().max().unwrap();
                prop_assert!(mean >= *min && mean <= *max);
            }

            #[test]
            fn try_new_accepts_exactly_the_valid_range(value in 0u8..=255) {
                prop_assert_eq!(Percentage::try_new(value).is_ok(), value <= 100);
            }
        }
    }
}
