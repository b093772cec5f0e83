//! Safety domain - crisis detection and response quality assessment.

mod assessment;
mod crisis;
mod dimension;

pub use assessment::{ConfidenceAssessment, Metric, REVIEW_THRESHOLD};
pub use crisis::CrisisDetector;
pub use dimension::{Dimension, DimensionAverages};
