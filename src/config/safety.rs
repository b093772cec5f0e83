//! Safety pipeline configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::workflow::HISTORY_WINDOW;

/// Configuration for crisis detection and the processing cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct SafetyConfig {
    /// Override for the crisis keyword list (comma-separated).
    ///
    /// When unset, the built-in default list is used.
    pub crisis_keywords: Option<String>,

    /// Number of prior messages sent to the generator as context
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Override for the crisis safety template
    pub safety_message: Option<String>,

    /// Override for the generation-failure fallback text
    pub fallback_message: Option<String>,
}

impl SafetyConfig {
    /// Crisis keywords as a vector, if overridden.
    pub fn crisis_keywords_list(&self) -> Option<Vec<String>> {
        self.crisis_keywords.as_ref().map(|s| {
            s.split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        })
    }

    /// Validate safety configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_window == 0 || self.history_window > 100 {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        if let Some(keywords) = self.crisis_keywords_list() {
            if keywords.is_empty() {
                return Err(ValidationError::EmptyKeywordList);
            }
        }
        Ok(())
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            crisis_keywords: None,
            history_window: default_history_window(),
            safety_message: None,
            fallback_message: None,
        }
    }
}

fn default_history_window() -> usize {
    HISTORY_WINDOW
}
