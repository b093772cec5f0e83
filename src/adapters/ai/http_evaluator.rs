//! HTTP client for the response evaluation service.
//!
//! `POST {base_url}/v1/evaluate` with the patient message and drafted reply;
//! the service returns one verdict per dimension plus an intervention flag
//! and a narrative summary.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::safety::{Dimension, Metric, REVIEW_THRESHOLD};
use crate::ports::{EvaluationError, EvaluationOutcome, ResponseEvaluator};

/// Configuration for the evaluation service client.
#[derive(Debug, Clone)]
pub struct HttpEvaluatorConfig {
    api_key: Secret<String>,
    /// Base URL of the evaluation service.
    pub base_url: String,
    /// Model identifier passed through to the service.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpEvaluatorConfig {
    /// Creates a configuration with the given API key and base URL.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: base_url.into(),
            model: "carebridge-evaluator-1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Evaluation service client.
pub struct HttpEvaluator {
    config: HttpEvaluatorConfig,
    client: Client,
}

impl HttpEvaluator {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpEvaluatorConfig) -> Result<Self, EvaluationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EvaluationError::network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn evaluate_url(&self) -> String {
        format!("{}/v1/evaluate", self.config.base_url)
    }

    async fn handle_status(&self, response: Response) -> Result<Response, EvaluationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(EvaluationError::AuthenticationFailed)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Err(EvaluationError::rate_limited(retry_after.unwrap_or(30)))
            }
            s if s.is_server_error() => Err(EvaluationError::unavailable(format!(
                "{}: {}",
                status, body
            ))),
            _ => Err(EvaluationError::network(format!("{}: {}", status, body))),
        }
    }

    fn map_transport_error(&self, error: reqwest::Error) -> EvaluationError {
        if error.is_timeout() {
            EvaluationError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if error.is_connect() {
            EvaluationError::network(format!("Connection failed: {}", error))
        } else {
            EvaluationError::network(error.to_string())
        }
    }
}

#[async_trait]
impl ResponseEvaluator for HttpEvaluator {
    async fn evaluate(
        &self,
        patient_message: &str,
        ai_response: &str,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let request = EvaluateRequest {
            model: self.config.model.clone(),
            patient_message: patient_message.to_string(),
            ai_response: ai_response.to_string(),
            threshold: REVIEW_THRESHOLD,
        };

        let response = self
            .client
            .post(self.evaluate_url())
            .header("x-api-key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = self.handle_status(response).await?;
        let body: EvaluateResponse = response
            .json()
            .await
            .map_err(|e| EvaluationError::parse(e.to_string()))?;

        Ok(body.into_outcome())
    }
}

#[derive(Debug, Serialize)]
struct EvaluateRequest {
    model: String,
    patient_message: String,
    ai_response: String,
    threshold: u8,
}

#[derive(Debug, Deserialize)]
struct EvaluateResponse {
    dimensions: Vec<WireVerdict>,
    needs_intervention: bool,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct WireVerdict {
    dimension: Dimension,
    passed: bool,
    reason: String,
}

impl EvaluateResponse {
    fn into_outcome(self) -> EvaluationOutcome {
        let metrics = self
            .dimensions
            .into_iter()
            .map(|v| Metric::new(v.dimension, v.passed, v.reason))
            .collect();
        EvaluationOutcome {
            metrics,
            needs_intervention: self.needs_intervention,
            summary: self.summary,
        }
    }
}
