//! HTTP client for the response generation service.
//!
//! Speaks a small JSON API: `POST {base_url}/v1/generate` with the model
//! name and the conversation turns, returning the drafted reply.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{GenerationError, HistoryTurn, ResponseGenerator, TurnRole};

/// Configuration for the generation service client.
#[derive(Debug, Clone)]
pub struct HttpGeneratorConfig {
    api_key: Secret<String>,
    /// Base URL of the generation service.
    pub base_url: String,
    /// Model identifier passed through to the service.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpGeneratorConfig {
    /// Creates a configuration with the given API key and base URL.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: base_url.into(),
            model: "carebridge-responder-1".to_string(),
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

/// Generation service client.
pub struct HttpGenerator {
    config: HttpGeneratorConfig,
    client: Client,
}

impl HttpGenerator {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpGeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!("{}/v1/generate", self.config.base_url)
    }

    fn to_wire_request(&self, patient_message: &str, history: &[HistoryTurn]) -> GenerateRequest {
        let mut messages: Vec<WireMessage> = history.iter().map(WireMessage::from_turn).collect();
        messages.push(WireMessage {
            role: "user".to_string(),
            content: patient_message.to_string(),
        });

        GenerateRequest {
            model: self.config.model.clone(),
            messages,
        }
    }

    async fn handle_status(&self, response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(&response);
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(GenerationError::AuthenticationFailed)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Err(GenerationError::rate_limited(retry_after.unwrap_or(30)))
            }
            StatusCode::UNPROCESSABLE_ENTITY => Err(GenerationError::content_filtered(body)),
            s if s.is_server_error() => Err(GenerationError::unavailable(format!(
                "{}: {}",
                status, body
            ))),
            _ => Err(GenerationError::network(format!("{}: {}", status, body))),
        }
    }

    fn map_transport_error(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if error.is_connect() {
            GenerationError::network(format!("Connection failed: {}", error))
        } else {
            GenerationError::network(error.to_string())
        }
    }
}

#[async_trait]
impl ResponseGenerator for HttpGenerator {
    async fn generate(
        &self,
        patient_message: &str,
        history: &[HistoryTurn],
    ) -> Result<String, GenerationError> {
        let request = self.to_wire_request(patient_message, history);

        let response = self
            .client
            .post(self.generate_url())
            .header("x-api-key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = self.handle_status(response).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(e.to_string()))?;

        Ok(body.reply)
    }
}

fn parse_retry_after(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl WireMessage {
    fn from_turn(turn: &HistoryTurn) -> Self {
        let role = match turn.role {
            TurnRole::Patient => "user",
            TurnRole::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: turn.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> HttpGenerator {
        HttpGenerator::new(HttpGeneratorConfig::new("test-key", "http://localhost:9999"))
            .unwrap()
    }

    #[test]
    fn wire_request_appends_current_message_as_user() {
        let history = vec![
            HistoryTurn::patient("My knee hurts"),
            HistoryTurn::assistant("How long has it hurt?"),
        ];
        let request = generator().to_wire_request("About a week", &history);

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.messages[1].role, "assistant");
        assert_eq!(request.messages[2].role, "user");
        assert_eq!(request.messages[2].content, "About a week");
    }

    #[test]
    fn wire_request_serializes_expected_shape() {
        let request = generator().to_wire_request("hello", &[]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "carebridge-responder-1");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn generate_url_joins_base() {
        assert_eq!(
            generator().generate_url(),
            "http://localhost:9999/v1/generate"
        );
    }

    #[test]
    fn config_builder_overrides() {
        let config = HttpGeneratorConfig::new("k", "http://svc")
            .with_model("custom-model")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn reply_parses_from_json() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"reply": "Rest and hydrate"}"#).unwrap();
        assert_eq!(body.reply, "Rest and hydrate");
    }
}
