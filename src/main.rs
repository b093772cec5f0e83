//! CareBridge backend entry point.
//!
//! Loads configuration from the environment, wires the crisis detector,
//! AI capability clients, and message store into the conversation
//! workflow, and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use carebridge::adapters::ai::{
    HttpEvaluator, HttpEvaluatorConfig, HttpGenerator, HttpGeneratorConfig,
};
use carebridge::adapters::http::{api_router, AppState};
use carebridge::adapters::storage::InMemoryMessageStore;
use carebridge::config::{AppConfig, ServerConfig};
use carebridge::domain::safety::CrisisDetector;
use carebridge::domain::workflow::ConversationWorkflow;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration, refusing to start");
        std::process::exit(1);
    }

    let workflow = match build_workflow(&config) {
        Ok(workflow) => Arc::new(workflow),
        Err(e) => {
            error!(error = %e, "Failed to build conversation workflow");
            std::process::exit(1);
        }
    };

    let store = Arc::new(InMemoryMessageStore::new());
    let state = AppState::new(store, workflow);

    let app = api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    info!(%addr, environment = ?config.server.environment, "CareBridge backend starting");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_workflow(config: &AppConfig) -> Result<ConversationWorkflow, Box<dyn std::error::Error>> {
    let detector = match config.safety.crisis_keywords_list() {
        Some(keywords) => CrisisDetector::new(keywords),
        None => CrisisDetector::default(),
    };

    let generator = HttpGenerator::new(
        HttpGeneratorConfig::new(
            config.ai.api_key.expose_secret().clone(),
            config.ai.generation_url.clone(),
        )
            .with_model(config.ai.generation_model.clone())
            .with_timeout(config.ai.timeout()),
    )?;

    let evaluator = HttpEvaluator::new(
        HttpEvaluatorConfig::new(
            config.ai.api_key.expose_secret().clone(),
            config.ai.evaluation_url.clone(),
        )
            .with_model(config.ai.evaluation_model.clone())
            .with_timeout(config.ai.timeout()),
    )?;

    let mut workflow =
        ConversationWorkflow::new(detector, Arc::new(generator), Arc::new(evaluator))
            .with_history_window(config.safety.history_window);
    if let Some(message) = &config.safety.safety_message {
        workflow = workflow.with_safety_message(message.clone());
    }
    if let Some(message) = &config.safety.fallback_message {
        workflow = workflow.with_fallback_message(message.clone());
    }
    Ok(workflow)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
