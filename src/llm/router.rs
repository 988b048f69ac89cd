//! Model selection per analysis depth
//!
//! Maps the requested analysis depth (quick, standard, deep) to the models
//! named in configuration. Explicit model overrides with a recognized prefix
//! pass through unchanged.

use crate::core::config::Config;
use crate::models::api::AnalysisDepth;

/// Prefixes that mark an override as an already-valid model name
const PASSTHROUGH_PREFIXES: &[&str] = &["gemini-", "gpt-", "o1-", "models/"];

/// Resolves the model to use for a request
pub struct ModelRouter {
    config: Config,
}

impl ModelRouter {
    /// Create a new ModelRouter with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolve the model for a request
    ///
    /// An explicit override with a recognized prefix wins; anything else
    /// falls back to the depth mapping so a typo cannot route to an
    /// unconfigured model.
    pub fn resolve(&self, depth: AnalysisDepth, model_override: Option<&str>) -> String {
        if let Some(name) = model_override {
            if PASSTHROUGH_PREFIXES
                .iter()
                .any(|prefix| name.starts_with(prefix))
            {
                return name.to_string();
            }
        }

        match depth {
            AnalysisDepth::Quick => self.config.quick_model.clone(),
            AnalysisDepth::Standard => self.config.standard_model.clone(),
            AnalysisDepth::Deep => self.config.deep_model.clone(),
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
    fn test_depth_mapping() {
        let router = ModelRouter::new(create_test_config());
        assert_eq!(
            router.resolve(AnalysisDepth::Quick, None),
            "gemini-1.5-flash-8b"
        );
        assert_eq!(
            router.resolve(AnalysisDepth::Standard, None),
            "gemini-1.5-flash"
        );
        assert_eq!(router.resolve(AnalysisDepth::Deep, None), "gemini-1.5-pro");
    }

    #[test]
    fn test_passthrough_override() {
        let router = ModelRouter::new(create_test_config());
        assert_eq!(
            router.resolve(AnalysisDepth::Quick, Some("gpt-4o-mini")),
            "gpt-4o-mini"
        );
        assert_eq!(
            router.resolve(AnalysisDepth::Deep, Some("gemini-2.0-flash")),
            "gemini-2.0-flash"
        );
    }

    #[test]
    fn test_unrecognized_override_falls_back_to_depth() {
        let router = ModelRouter::new(create_test_config());
        assert_eq!(
            router.resolve(AnalysisDepth::Standard, Some("my-favourite-model")),
            "gemini-1.5-flash"
        );
    }
}
