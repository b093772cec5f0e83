//! AI capability configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the generation and evaluation services.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key shared by both capability services, redacted in Debug output
    pub api_key: Secret<String>,

    /// Base URL of the generation service
    pub generation_url: String,

    /// Base URL of the evaluation service
    pub evaluation_url: String,

    /// Generation model identifier
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Evaluation model identifier
    #[serde(default = "default_evaluation_model")]
    pub evaluation_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if !is_http_url(&self.generation_url) {
            return Err(ValidationError::InvalidServiceUrl("generation_url"));
        }
        if !is_http_url(&self.evaluation_url) {
            return Err(ValidationError::InvalidServiceUrl("evaluation_url"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_generation_model() -> String {
    "carebridge-responder-1".to_string()
}

fn default_evaluation_model() -> String {
    "carebridge-evaluator-1".to_string()
}

fn default_timeout() -> u64 {
    30
}
