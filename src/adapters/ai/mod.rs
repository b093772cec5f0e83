//! AI service adapters - HTTP clients for the generation and evaluation
//! capabilities, plus configurable mocks for testing.

mod http_evaluator;
mod http_generator;
mod mock_evaluator;
mod mock_generator;

pub use http_evaluator::{HttpEvaluator, HttpEvaluatorConfig};
pub use http_generator::{HttpGenerator, HttpGeneratorConfig};
pub use mock_evaluator::MockEvaluator;
pub use mock_generator::MockGenerator;
