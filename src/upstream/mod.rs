//! Upstream data fetchers
//!
//! One client per third-party surface: the Deriv candle API (WebSocket),
//! a football-statistics REST API, and an odds-comparison REST API. All
//! three share the same error taxonomy.

pub mod deriv;
pub mod football;
pub mod odds;

pub use deriv::DerivClient;
pub use football::FootballClient;
pub use odds::OddsClient;

use thiserror::Error;

/// Error types for upstream data fetches
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to connect to upstream: {0}")]
    Connect(String),

    #[error("Upstream protocol error: {0}")]
    Protocol(String),

    #[error("Upstream authentication failed: {0}")]
    Auth(String),

    #[error("Upstream API error: {0}")]
    Api(String),

    #[error("Failed to decode upstream payload: {0}")]
    Decode(String),

    #[error("Upstream returned no data for the request")]
    Empty,
}
