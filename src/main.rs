//! formcast — LLM analysis gateway
//!
//! A single parameterized service in place of a pile of near-identical
//! ones: it fetches market candles, football statistics, or bookmaker odds,
//! builds an analysis prompt, forwards it to a generative-language model,
//! and relays the model's JSON verdict to the client.

mod analysis;
mod api;
mod core;
mod llm;
mod models;
mod prompt;
mod upstream;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::llm::provider::{LlmProvider, ProviderKind};
use crate::llm::providers::{GeminiProvider, OpenAiProvider};
use crate::llm::router::ModelRouter;
use crate::upstream::{DerivClient, FootballClient, OddsClient};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    // Print startup banner
    print_startup_banner(&config);

    // Validate API key
    if !config.validate_api_key() {
        error!(
            "Invalid API key configuration for provider: {:?}",
            config.provider
        );
        std::process::exit(1);
    }

    // Create model router
    let model_router = Arc::new(ModelRouter::new((*config).clone()));

    // Create LLM provider based on configuration
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            config.llm_api_key.clone(),
            config.llm_base_url.clone(),
            config.request_timeout,
        )),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            config.llm_api_key.clone(),
            config.llm_base_url.clone(),
            config.request_timeout,
        )),
    };

    info!("Using provider: {}", provider.provider_name());

    // Upstream clients; football and odds stay None when unconfigured
    let deriv = Arc::new(DerivClient::new(
        config.deriv_endpoint.clone(),
        config.deriv_app_id.clone(),
        config.request_timeout,
    ));
    let football = config.football.as_ref().map(|section| {
        Arc::new(FootballClient::new(
            section.api_key.clone(),
            section
                .base_url
                .clone()
                .unwrap_or_else(|| "https://v3.football.api-sports.io".to_string()),
            config.request_timeout,
        ))
    });
    let odds = config.odds.as_ref().map(|section| {
        Arc::new(OddsClient::new(
            section.api_key.clone(),
            section
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.the-odds-api.com/v4".to_string()),
            config.request_timeout,
        ))
    });

    // Create application state
    let app_state = AppState {
        config: config.clone(),
        model_router,
        provider,
        deriv,
        football,
        odds,
    };

    // Create router
    let app = create_router(app_state);

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🚀 formcast analysis gateway v0.1.0");
    println!("✅ Configuration loaded successfully");
    println!("   Provider: {:?}", config.provider);
    println!("   Base URL: {}", config.llm_base_url);
    println!("   Deep Model: {}", config.deep_model);
    println!("   Standard Model: {}", config.standard_model);
    println!("   Quick Model: {}", config.quick_model);
    println!("   Deriv Endpoint: {}", config.deriv_endpoint);
    println!(
        "   Football API: {}",
        if config.football.is_some() {
            "Configured"
        } else {
            "Disabled"
        }
    );
    println!(
        "   Odds API: {}",
        if config.odds.is_some() {
            "Configured"
        } else {
            "Disabled"
        }
    );
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!(
        "   Client API Key Validation: {}",
        if config.client_api_key.is_some() {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!();
}

/// Print help message
fn print_help() {
    println!("formcast analysis gateway v0.1.0");
    println!();
    println!("Usage: formcast [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration is read from config.toml (override with CONFIG_PATH):");
    println!();
    println!("  provider            - LLM provider: gemini, openai (required)");
    println!("  client_api_key      - Expected client API key (optional)");
    println!();
    println!("  [gemini] / [openai] - api_key (required), base_url (optional)");
    println!();
    println!("  [models]            - deep_model, standard_model, quick_model");
    println!();
    println!("  [deriv]             - app_id (default: 1089), endpoint");
    println!("  [football]          - api_key, base_url (section optional)");
    println!("  [odds]              - api_key, base_url (section optional)");
    println!();
    println!("  [server]            - host (default: 0.0.0.0), port (default: 8090),");
    println!("                        log_level (default: info)");
    println!();
    println!("  [request]           - request_timeout, max_output_tokens, temperature,");
    println!("                        default_candle_count, max_candles");
    println!();
    println!("Model mapping:");
    println!("  depth=quick    -> quick_model");
    println!("  depth=standard -> standard_model");
    println!("  depth=deep     -> deep_model");
}
