//! Odds-comparison client
//!
//! REST client for a the-odds-api style service: one call per request for a
//! single event's bookmaker odds.

use crate::models::odds::OddsEvent;
use crate::upstream::UpstreamError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default bookmaker regions filter
pub const DEFAULT_REGIONS: &str = "eu";

/// Default markets filter
pub const DEFAULT_MARKETS: &str = "h2h";

/// Odds-comparison REST client
pub struct OddsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OddsClient {
    /// Create a new odds client
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key sent as the apiKey query parameter
    /// * `base_url` - API base URL, e.g. "https://api.the-odds-api.com/v4"
    /// * `timeout` - Request timeout in seconds
    pub fn new(api_key: String, base_url: String, timeout: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Bookmaker odds for a single event, decimal format
    pub async fn event_odds(
        &self,
        sport_key: &str,
        event_id: &str,
        regions: &str,
        markets: &str,
    ) -> Result<OddsEvent, UpstreamError> {
        let url = format!(
            "{}/sports/{}/events/{}/odds",
            self.base_url, sport_key, event_id
        );
        debug!("Fetching odds from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", regions),
                ("markets", markets),
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Connect(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::Auth(
                "odds API rejected the key".to_string(),
            ));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::Api(format!(
                "event {event_id} not found for sport {sport_key}"
            )));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::Api(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let event: OddsEvent = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        if event.bookmakers.is_empty() {
            return Err(UpstreamError::Empty);
        }

        Ok(event)
    }
}
