//! Request and response models for the service's own HTTP API

use crate::analysis::report::IndicatorSnapshot;
use crate::models::football::FixtureContext;
use crate::models::market::Candle;
use crate::models::odds::OddsEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much model to spend on a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

/// POST /v1/analysis/market request body
#[derive(Debug, Clone, Deserialize)]
pub struct MarketAnalysisRequest {
    /// Deriv symbol, e.g. "R_100" or "frxEURUSD"
    pub symbol: String,
    /// Candle granularity label, e.g. "1m", "5m", "1h"
    #[serde(default = "default_granularity")]
    pub granularity: String,
    /// Candles to fetch (server default and cap apply)
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub depth: AnalysisDepth,
    /// Explicit model override; known model names pass through unchanged
    #[serde(default)]
    pub model: Option<String>,
}

fn default_granularity() -> String {
    "1m".to_string()
}

/// Token accounting relayed from the provider
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// POST /v1/analysis/market response body
#[derive(Debug, Clone, Serialize)]
pub struct MarketAnalysisResponse {
    pub id: String,
    pub symbol: String,
    pub granularity: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub candle_count: usize,
    pub latest_candle: Option<Candle>,
    pub indicators: IndicatorSnapshot,
    pub usage: TokenUsage,
    /// Parsed JSON object from the model reply, or the raw text when the
    /// reply was not valid JSON
    pub analysis: serde_json::Value,
}

/// POST /v1/analysis/fixture request body
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureAnalysisRequest {
    pub fixture_id: u64,
    pub league_id: u32,
    pub season: u16,
    /// Head-to-head meetings to include (default 5)
    #[serde(default)]
    pub last_h2h: Option<usize>,
    #[serde(default)]
    pub depth: AnalysisDepth,
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /v1/analysis/fixture response body
#[derive(Debug, Clone, Serialize)]
pub struct FixtureAnalysisResponse {
    pub id: String,
    pub fixture_id: u64,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub context: FixtureContext,
    pub usage: TokenUsage,
    pub analysis: serde_json::Value,
}

/// POST /v1/analysis/odds request body
#[derive(Debug, Clone, Deserialize)]
pub struct OddsAnalysisRequest {
    /// Sport key, e.g. "soccer_epl"
    pub sport_key: String,
    pub event_id: String,
    /// Bookmaker regions filter (default "eu")
    #[serde(default)]
    pub regions: Option<String>,
    /// Markets filter (default "h2h")
    #[serde(default)]
    pub markets: Option<String>,
    #[serde(default)]
    pub depth: AnalysisDepth,
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /v1/analysis/odds response body
#[derive(Debug, Clone, Serialize)]
pub struct OddsAnalysisResponse {
    pub id: String,
    pub sport_key: String,
    pub event_id: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub event: OddsEvent,
    pub usage: TokenUsage,
    pub analysis: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_request_defaults() {
        let request: MarketAnalysisRequest =
            serde_json::from_str(r#"{"symbol": "R_100"}"#).unwrap();
        assert_eq!(request.symbol, "R_100");
        assert_eq!(request.granularity, "1m");
        assert_eq!(request.count, None);
        assert_eq!(request.depth, AnalysisDepth::Standard);
        assert!(request.model.is_none());
    }

    #[test]
    fn test_token_usage_serializes() {
        let usage = TokenUsage {
            prompt_tokens: 12,
            completion_tokens: 8,
        };
        let json = serde_json::to_value(usage).unwrap();
        assert_eq!(json["prompt_tokens"], 12);
        assert_eq!(json["completion_tokens"], 8);
    }

    #[test]
    fn test_depth_parses_lowercase() {
        let request: MarketAnalysisRequest =
            serde_json::from_str(r#"{"symbol": "R_50", "depth": "deep"}"#).unwrap();
        assert_eq!(request.depth, AnalysisDepth::Deep);
    }
}
