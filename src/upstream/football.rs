//! Football-statistics client
//!
//! REST client for an api-football style service. The fixture-context fetch
//! issues the standings, head-to-head, and lineup requests concurrently.

use crate::models::football::{
    FixtureContext, FixtureRow, FootballEnvelope, StandingRow, StandingsEntry, TeamLineup,
};
use crate::upstream::UpstreamError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-apisports-key";

/// Football-statistics REST client
pub struct FootballClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FootballClient {
    /// Create a new football client
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key sent in the x-apisports-key header
    /// * `base_url` - API base URL, e.g. "https://v3.football.api-sports.io"
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

    /// Issue a GET and unwrap the response envelope
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Connect(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(UpstreamError::Auth(format!(
                "football API rejected the key (status {})",
                status.as_u16()
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

        let envelope: FootballEnvelope<T> = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        if envelope.has_errors() {
            return Err(UpstreamError::Api(envelope.error_text()));
        }

        Ok(envelope.response)
    }

    /// League table for a season, flattened across groups
    pub async fn standings(
        &self,
        league: u32,
        season: u16,
    ) -> Result<Vec<StandingRow>, UpstreamError> {
        let entries: Vec<StandingsEntry> = self
            .get(
                "/standings",
                &[
                    ("league", league.to_string()),
                    ("season", season.to_string()),
                ],
            )
            .await?;

        Ok(entries
            .into_iter()
            .flat_map(|entry| entry.league.standings)
            .flatten()
            .collect())
    }

    /// Recent meetings between two teams, newest first
    pub async fn head_to_head(
        &self,
        home: u32,
        away: u32,
        last: usize,
    ) -> Result<Vec<FixtureRow>, UpstreamError> {
        self.get(
            "/fixtures/headtohead",
            &[
                ("h2h", format!("{home}-{away}")),
                ("last", last.to_string()),
            ],
        )
        .await
    }

    /// Announced lineups for a fixture (may be empty before team news)
    pub async fn lineups(&self, fixture: u64) -> Result<Vec<TeamLineup>, UpstreamError> {
        self.get("/fixtures/lineups", &[("fixture", fixture.to_string())])
            .await
    }

    /// Look up one fixture by id
    pub async fn fixture(&self, id: u64) -> Result<FixtureRow, UpstreamError> {
        let rows: Vec<FixtureRow> = self.get("/fixtures", &[("id", id.to_string())]).await?;
        rows.into_iter().next().ok_or(UpstreamError::Empty)
    }

    /// Fetch everything a fixture-analysis prompt needs
    ///
    /// Resolves the fixture first (for the team ids), then fetches standings,
    /// head-to-head, and lineups concurrently.
    pub async fn fixture_context(
        &self,
        fixture_id: u64,
        league: u32,
        season: u16,
        last_h2h: usize,
    ) -> Result<FixtureContext, UpstreamError> {
        let fixture = self.fixture(fixture_id).await?;
        let home = fixture.teams.home.id;
        let away = fixture.teams.away.id;

        let (standings, head_to_head, lineups) = tokio::try_join!(
            self.standings(league, season),
            self.head_to_head(home, away, last_h2h),
            self.lineups(fixture_id),
        )?;

        Ok(FixtureContext {
            fixture,
            standings,
            head_to_head,
            lineups,
        })
    }
}
