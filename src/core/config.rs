//! Application configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! All configuration is validated at startup so the service fails fast when
//! misconfigured.

use crate::llm::provider::ProviderKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Default maximum output tokens requested from the model
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Default sampling temperature
const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default number of candles fetched per market request
const DEFAULT_CANDLE_COUNT: usize = 120;

/// Upper bound on candles a client may request
const DEFAULT_MAX_CANDLES: usize = 500;

/// Default server port
const DEFAULT_PORT: u16 = 8090;

/// Default Deriv WebSocket endpoint
const DEFAULT_DERIV_ENDPOINT: &str = "wss://ws.derivws.com/websockets/v3";

/// Default Deriv application id (public demo id)
const DEFAULT_DERIV_APP_ID: &str = "1089";

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSection {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSection {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsSection {
    pub deep_model: String,
    pub standard_model: String,
    pub quick_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DerivSection {
    #[serde(default = "default_deriv_app_id")]
    pub app_id: String,
    #[serde(default = "default_deriv_endpoint")]
    pub endpoint: String,
}

impl Default for DerivSection {
    fn default() -> Self {
        Self {
            app_id: default_deriv_app_id(),
            endpoint: default_deriv_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FootballSection {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsSection {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSection {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_candle_count")]
    pub default_candle_count: usize,
    #[serde(default = "default_max_candles")]
    pub max_candles: usize,
}

impl Default for RequestSection {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            default_candle_count: default_candle_count(),
            max_candles: default_max_candles(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_candle_count() -> usize {
    DEFAULT_CANDLE_COUNT
}

fn default_max_candles() -> usize {
    DEFAULT_MAX_CANDLES
}

fn default_deriv_app_id() -> String {
    DEFAULT_DERIV_APP_ID.to_string()
}

fn default_deriv_endpoint() -> String {
    DEFAULT_DERIV_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub provider: String,
    #[serde(default)]
    pub client_api_key: Option<String>,
    #[serde(default)]
    pub gemini: Option<GeminiSection>,
    #[serde(default)]
    pub openai: Option<OpenAiSection>,
    pub models: ModelsSection,
    #[serde(default)]
    pub deriv: DerivSection,
    #[serde(default)]
    pub football: Option<FootballSection>,
    #[serde(default)]
    pub odds: Option<OddsSection>,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub request: RequestSection,
}

/// Application configuration loaded from TOML files
///
/// All values are resolved and validated at startup. Upstream sections for
/// football statistics and odds are optional; the corresponding endpoints
/// report 503 when their section is absent.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider kind (Gemini or an OpenAI-compatible endpoint)
    pub provider: ProviderKind,

    /// API key for the configured LLM provider
    pub llm_api_key: String,

    /// Base URL of the configured LLM provider
    pub llm_base_url: String,

    /// Optional API key expected from browser clients
    pub client_api_key: Option<String>,

    /// Deriv WebSocket application id
    pub deriv_app_id: String,

    /// Deriv WebSocket endpoint
    pub deriv_endpoint: String,

    /// Football-statistics API settings (endpoint disabled when None)
    pub football: Option<FootballSection>,

    /// Odds-comparison API settings (endpoint disabled when None)
    pub odds: Option<OddsSection>,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Upstream/LLM request timeout in seconds
    pub request_timeout: u64,

    /// Maximum output tokens requested from the model
    pub max_output_tokens: u32,

    /// Sampling temperature passed to the model
    pub temperature: f32,

    /// Candle count used when the client does not specify one
    pub default_candle_count: usize,

    /// Upper bound on candles a client may request
    pub max_candles: usize,

    /// Model used for deep analysis requests
    pub deep_model: String,

    /// Model used for standard analysis requests
    pub standard_model: String,

    /// Model used for quick analysis requests
    pub quick_model: String,
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Required configuration values are missing
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        let provider = ProviderKind::from_str(&config.provider)
            .context("Invalid provider value. Must be one of: gemini, openai")?;

        let (llm_api_key, llm_base_url) = match provider {
            ProviderKind::Gemini => {
                let gemini = config
                    .gemini
                    .context("Gemini configuration missing for Gemini provider")?;
                (
                    gemini.api_key,
                    gemini.base_url.unwrap_or_else(|| {
                        "https://generativelanguage.googleapis.com/v1beta".to_string()
                    }),
                )
            }
            ProviderKind::OpenAi => {
                let openai = config
                    .openai
                    .context("OpenAI configuration missing for OpenAI provider")?;
                (
                    openai.api_key,
                    openai
                        .base_url
                        .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                )
            }
        };

        Ok(Config {
            provider,
            llm_api_key,
            llm_base_url,
            client_api_key: config.client_api_key,
            deriv_app_id: config.deriv.app_id,
            deriv_endpoint: config.deriv.endpoint,
            football: config.football,
            odds: config.odds,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: config.request.request_timeout,
            max_output_tokens: config.request.max_output_tokens,
            temperature: config.request.temperature,
            default_candle_count: config.request.default_candle_count,
            max_candles: config.request.max_candles,
            deep_model: config.models.deep_model,
            standard_model: config.models.standard_model,
            quick_model: config.models.quick_model,
        })
    }

    /// Load configuration from environment and config file
    ///
    /// Looks for config.toml in current directory by default
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_file(config_path)
    }

    /// Validate API key format based on provider
    ///
    /// For OpenAI: checks that the API key starts with 'sk-' prefix
    /// For Gemini: checks that the key is non-empty
    pub fn validate_api_key(&self) -> bool {
        match self.provider {
            ProviderKind::Gemini => !self.llm_api_key.is_empty(),
            ProviderKind::OpenAi => {
                !self.llm_api_key.is_empty() && self.llm_api_key.starts_with("sk-")
            }
        }
    }

    /// Validate a browser client's API key
    ///
    /// If client_api_key is set, validates that the presented key matches.
    /// If not set, validation is skipped and returns true.
    pub fn validate_client_api_key(&self, presented_key: &str) -> bool {
        match &self.client_api_key {
            Some(expected_key) => presented_key == expected_key,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            provider = "gemini"
            client_api_key = "test-key"

            [gemini]
            api_key = "AIza-test123"

            [models]
            deep_model = "gemini-1.5-pro"
            standard_model = "gemini-1.5-flash"
            quick_model = "gemini-1.5-flash-8b"

            [football]
            api_key = "football-key"

            [server]
            host = "0.0.0.0"
            port = 8090
            log_level = "info"

            [request]
            request_timeout = 90
            max_output_tokens = 2048
            temperature = 0.4
            default_candle_count = 120
            max_candles = 500
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.llm_api_key, "AIza-test123");
        assert_eq!(
            config.llm_base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.client_api_key, Some("test-key".to_string()));
        assert_eq!(config.deriv_app_id, "1089");
        assert!(config.football.is_some());
        assert!(config.odds.is_none());
    }

    #[test]
    fn test_validate_api_key() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert!(config.validate_api_key());
    }

    #[test]
    fn test_validate_client_api_key() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert!(config.validate_client_api_key("test-key"));
        assert!(!config.validate_client_api_key("wrong-key"));
    }

    #[test]
    fn test_missing_provider_section() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            provider = "openai"

            [models]
            deep_model = "gpt-4o"
            standard_model = "gpt-4o"
            quick_model = "gpt-4o-mini"
        "#
        )
        .unwrap();
        file.flush().unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }
}
