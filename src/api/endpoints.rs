//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the analysis service: market,
//! fixture, and odds analysis, plus health checks and an LLM connectivity
//! probe.

use crate::analysis::report;
use crate::core::config::Config;
use crate::core::constants::granularity;
use crate::llm::provider::{GenerationRequest, LlmError, LlmProvider};
use crate::llm::response::extract_json;
use crate::llm::router::ModelRouter;
use crate::models::api::{
    FixtureAnalysisRequest, FixtureAnalysisResponse, MarketAnalysisRequest,
    MarketAnalysisResponse, OddsAnalysisRequest, OddsAnalysisResponse, TokenUsage,
};
use crate::prompt;
use crate::upstream::{DerivClient, FootballClient, OddsClient, UpstreamError};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Minimum candles worth asking the upstream for
const MIN_CANDLE_COUNT: usize = 10;

/// Head-to-head meetings embedded by default
const DEFAULT_LAST_H2H: usize = 5;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model_router: Arc<ModelRouter>,
    pub provider: Arc<dyn LlmProvider>,
    pub deriv: Arc<DerivClient>,
    pub football: Option<Arc<FootballClient>>,
    pub odds: Option<Arc<OddsClient>>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/v1/analysis/market", post(analyze_market))
        .route("/v1/analysis/fixture", post(analyze_fixture))
        .route("/v1/analysis/odds", post(analyze_odds))
        .route("/health", get(health_check))
        .route("/test-connection", get(test_connection))
        .with_state(state)
}

/// Validate API key from request headers
fn validate_api_key(headers: &HeaderMap, config: &Config) -> Result<(), StatusCode> {
    // Extract API key from headers
    let presented_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        });

    // Skip validation if no client key is configured
    if config.client_api_key.is_none() {
        return Ok(());
    }

    match presented_key {
        Some(key) if config.validate_client_api_key(key) => Ok(()),
        _ => {
            warn!("Invalid API key provided by client");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Uniform error body: {"type": "error", "error": {"type", "message"}}
fn error_response(status: StatusCode, error_type: &str, message: String) -> Response {
    let body = json!({
        "type": "error",
        "error": {
            "type": error_type,
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

fn upstream_error_response(e: &UpstreamError) -> Response {
    error!("Upstream error: {}", e);
    let status = match e {
        UpstreamError::Auth(_) => StatusCode::BAD_GATEWAY,
        UpstreamError::Empty => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, "upstream_error", e.to_string())
}

fn llm_error_response(e: &LlmError) -> Response {
    error!("Provider API error: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "api_error", e.to_string())
}

/// Clamp the requested candle count to [MIN_CANDLE_COUNT, max_candles],
/// falling back to the configured default when the client sends none
fn clamp_count(requested: Option<usize>, config: &Config) -> usize {
    requested
        .unwrap_or(config.default_candle_count)
        .min(config.max_candles)
        .max(MIN_CANDLE_COUNT)
}

/// Parse the model reply into JSON, relaying the raw text when it is not
/// valid JSON so the client still gets the analysis
fn parse_or_relay(request_id: &str, text: &str) -> serde_json::Value {
    match extract_json(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("[{}] {}; relaying raw text", request_id, e);
            serde_json::Value::String(text.to_string())
        }
    }
}

/// POST /v1/analysis/market - Candle fetch, indicators, LLM signal
async fn analyze_market(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<MarketAnalysisRequest>,
) -> Result<Response, StatusCode> {
    validate_api_key(&headers, &state.config)?;

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "📥 Market analysis request [{}]: symbol={}, granularity={}, depth={:?}",
        request_id,
        request.symbol,
        request.granularity,
        request.depth
    );

    let Some(granularity_secs) = granularity::seconds(&request.granularity) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            format!(
                "Unknown granularity '{}'. Supported: {}",
                request.granularity,
                granularity::labels().join(", ")
            ),
        ));
    };

    let count = clamp_count(request.count, &state.config);

    let candles = match state
        .deriv
        .fetch_candles(&request.symbol, granularity_secs, count)
        .await
    {
        Ok(candles) => candles,
        Err(e) => return Ok(upstream_error_response(&e)),
    };

    let snapshot = report::snapshot(&candles);
    let model = state
        .model_router
        .resolve(request.depth, request.model.as_deref());
    let prompt_text =
        prompt::market::build(&request.symbol, &request.granularity, &candles, &snapshot);
    debug!("[{}] prompt length: {} chars", request_id, prompt_text.len());

    let generation = GenerationRequest {
        model,
        prompt: prompt_text,
        temperature: state.config.temperature,
        max_output_tokens: state.config.max_output_tokens,
    };

    match state.provider.generate(&generation).await {
        Ok(reply) => {
            let analysis = parse_or_relay(&request_id, &reply.text);
            let response = MarketAnalysisResponse {
                id: request_id,
                symbol: request.symbol,
                granularity: request.granularity,
                model: reply.model,
                generated_at: chrono::Utc::now(),
                candle_count: candles.len(),
                latest_candle: candles.last().copied(),
                indicators: snapshot,
                usage: TokenUsage {
                    prompt_tokens: reply.prompt_tokens,
                    completion_tokens: reply.completion_tokens,
                },
                analysis,
            };
            Ok(Json(response).into_response())
        }
        Err(e) => Ok(llm_error_response(&e)),
    }
}

/// POST /v1/analysis/fixture - Standings + H2H + lineups, LLM preview
async fn analyze_fixture(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<FixtureAnalysisRequest>,
) -> Result<Response, StatusCode> {
    validate_api_key(&headers, &state.config)?;

    let Some(football) = state.football.clone() else {
        return Ok(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "not_configured",
            "Football statistics API is not configured".to_string(),
        ));
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "📥 Fixture analysis request [{}]: fixture={}, league={}, season={}",
        request_id,
        request.fixture_id,
        request.league_id,
        request.season
    );

    let context = match football
        .fixture_context(
            request.fixture_id,
            request.league_id,
            request.season,
            request.last_h2h.unwrap_or(DEFAULT_LAST_H2H),
        )
        .await
    {
        Ok(context) => context,
        Err(e) => return Ok(upstream_error_response(&e)),
    };

    let model = state
        .model_router
        .resolve(request.depth, request.model.as_deref());
    let prompt_text = prompt::fixture::build(&context);
    debug!("[{}] prompt length: {} chars", request_id, prompt_text.len());

    let generation = GenerationRequest {
        model,
        prompt: prompt_text,
        temperature: state.config.temperature,
        max_output_tokens: state.config.max_output_tokens,
    };

    match state.provider.generate(&generation).await {
        Ok(reply) => {
            let analysis = parse_or_relay(&request_id, &reply.text);
            let response = FixtureAnalysisResponse {
                id: request_id,
                fixture_id: request.fixture_id,
                model: reply.model,
                generated_at: chrono::Utc::now(),
                context,
                usage: TokenUsage {
                    prompt_tokens: reply.prompt_tokens,
                    completion_tokens: reply.completion_tokens,
                },
                analysis,
            };
            Ok(Json(response).into_response())
        }
        Err(e) => Ok(llm_error_response(&e)),
    }
}

/// POST /v1/analysis/odds - Bookmaker snapshot, LLM value assessment
async fn analyze_odds(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<OddsAnalysisRequest>,
) -> Result<Response, StatusCode> {
    validate_api_key(&headers, &state.config)?;

    let Some(odds) = state.odds.clone() else {
        return Ok(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "not_configured",
            "Odds API is not configured".to_string(),
        ));
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "📥 Odds analysis request [{}]: sport={}, event={}",
        request_id,
        request.sport_key,
        request.event_id
    );

    let regions = request
        .regions
        .as_deref()
        .unwrap_or(crate::upstream::odds::DEFAULT_REGIONS);
    let markets = request
        .markets
        .as_deref()
        .unwrap_or(crate::upstream::odds::DEFAULT_MARKETS);

    let event = match odds
        .event_odds(&request.sport_key, &request.event_id, regions, markets)
        .await
    {
        Ok(event) => event,
        Err(e) => return Ok(upstream_error_response(&e)),
    };

    let model = state
        .model_router
        .resolve(request.depth, request.model.as_deref());
    let prompt_text = prompt::odds::build(&event);
    debug!("[{}] prompt length: {} chars", request_id, prompt_text.len());

    let generation = GenerationRequest {
        model,
        prompt: prompt_text,
        temperature: state.config.temperature,
        max_output_tokens: state.config.max_output_tokens,
    };

    match state.provider.generate(&generation).await {
        Ok(reply) => {
            let analysis = parse_or_relay(&request_id, &reply.text);
            let response = OddsAnalysisResponse {
                id: request_id,
                sport_key: request.sport_key,
                event_id: request.event_id,
                model: reply.model,
                generated_at: chrono::Utc::now(),
                event,
                usage: TokenUsage {
                    prompt_tokens: reply.prompt_tokens,
                    completion_tokens: reply.completion_tokens,
                },
                analysis,
            };
            Ok(Json(response).into_response())
        }
        Err(e) => Ok(llm_error_response(&e)),
    }
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "formcast analysis gateway v0.1.0",
        "status": "running",
        "config": {
            "provider": state.provider.provider_name(),
            "deep_model": state.config.deep_model,
            "standard_model": state.config.standard_model,
            "quick_model": state.config.quick_model,
            "client_api_key_validation": state.config.client_api_key.is_some(),
            "football_configured": state.football.is_some(),
            "odds_configured": state.odds.is_some(),
        },
        "endpoints": {
            "market": "/v1/analysis/market",
            "fixture": "/v1/analysis/fixture",
            "odds": "/v1/analysis/odds",
            "health": "/health",
            "test_connection": "/test-connection",
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "llm_api_configured": !state.config.llm_api_key.is_empty(),
        "api_key_valid": state.config.validate_api_key(),
        "client_api_key_validation": state.config.client_api_key.is_some(),
        "football_configured": state.football.is_some(),
        "odds_configured": state.odds.is_some(),
    }))
}

/// GET /test-connection - Test LLM API connectivity
async fn test_connection(State(state): State<AppState>) -> impl IntoResponse {
    let probe = GenerationRequest {
        model: state.config.quick_model.clone(),
        prompt: "Reply with the single word OK.".to_string(),
        temperature: 0.0,
        max_output_tokens: 5,
    };

    match state.provider.generate(&probe).await {
        Ok(reply) => Json(json!({
            "status": "success",
            "message": format!(
                "Successfully connected to {} API",
                state.provider.provider_name()
            ),
            "provider": state.provider.provider_name(),
            "model_used": state.config.quick_model,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "reply": reply.text,
        })),
        Err(e) => {
            error!("API connectivity test failed: {}", e);
            Json(json!({
                "status": "failed",
                "error_type": "API Error",
                "message": e.to_string(),
                "provider": state.provider.provider_name(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "suggestions": [
                    "Check your API key is valid",
                    "Verify your API key has the necessary permissions",
                    "Check if you have reached rate limits",
                ],
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ProviderKind;

    fn create_test_config() -> Config {
        Config {
            provider: ProviderKind::Gemini,
            llm_api_key: "AIza-test".to_string(),
            llm_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client_api_key: None,
            deriv_app_id: "1089".to_string(),
            deriv_endpoint: "wss://ws.derivws.com/websockets/v3".to_string(),
            football: None,
            odds: None,
            host: "0.0.0.0".to_string(),
            port: 8090,
            log_level: "info".to_string(),
            request_timeout: 90,
            max_output_tokens: 2048,
            temperature: 0.4,
            default_candle_count: 120,
            max_candles: 500,
            deep_model: "gemini-1.5-pro".to_string(),
            standard_model: "gemini-1.5-flash".to_string(),
            quick_model: "gemini-1.5-flash-8b".to_string(),
        }
    }

    #[test]
    fn test_clamp_count_uses_default_when_unset() {
        let config = create_test_config();
        assert_eq!(clamp_count(None, &config), 120);
    }

    #[test]
    fn test_clamp_count_raises_tiny_requests() {
        let config = create_test_config();
        assert_eq!(clamp_count(Some(3), &config), MIN_CANDLE_COUNT);
    }

    #[test]
    fn test_clamp_count_caps_huge_requests() {
        let config = create_test_config();
        assert_eq!(clamp_count(Some(10_000), &config), 500);
    }

    #[test]
    fn test_parse_or_relay_valid_json() {
        let value = parse_or_relay("req-1", r#"{"signal": "BUY"}"#);
        assert_eq!(value["signal"], "BUY");
    }

    #[test]
    fn test_parse_or_relay_falls_back_to_raw_text() {
        let value = parse_or_relay("req-2", "no json here");
        assert_eq!(value, serde_json::Value::String("no json here".to_string()));
    }
}
