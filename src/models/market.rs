//! Market data models
//!
//! OHLC candles and the Deriv tick-history wire frames used to fetch them.

use serde::{Deserialize, Serialize};

/// Open-high-low-close price aggregate over one time bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    /// Bucket open time, seconds since epoch
    pub epoch: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Deriv `ticks_history` request frame
#[derive(Debug, Clone, Serialize)]
pub struct TicksHistoryRequest {
    /// Symbol, e.g. "R_100" or "frxEURUSD"
    pub ticks_history: String,
    /// Always "candles" for OHLC output
    pub style: String,
    /// Bucket size in seconds
    pub granularity: u32,
    /// Number of candles requested
    pub count: usize,
    /// Always "latest"
    pub end: String,
    pub adjust_start_time: u8,
    pub req_id: u32,
}

impl TicksHistoryRequest {
    pub fn candles(symbol: &str, granularity: u32, count: usize, req_id: u32) -> Self {
        Self {
            ticks_history: symbol.to_string(),
            style: "candles".to_string(),
            granularity,
            count,
            end: "latest".to_string(),
            adjust_start_time: 1,
            req_id,
        }
    }
}

/// Error object embedded in a Deriv reply frame
#[derive(Debug, Clone, Deserialize)]
pub struct DerivApiError {
    pub code: String,
    pub message: String,
}

/// A candle row as Deriv serializes it
#[derive(Debug, Clone, Deserialize)]
pub struct DerivCandle {
    pub epoch: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<DerivCandle> for Candle {
    fn from(c: DerivCandle) -> Self {
        Candle {
            epoch: c.epoch,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
        }
    }
}

/// Deriv reply frame (only the fields this service reads)
#[derive(Debug, Clone, Deserialize)]
pub struct DerivReply {
    #[serde(default)]
    pub msg_type: Option<String>,
    #[serde(default)]
    pub error: Option<DerivApiError>,
    #[serde(default)]
    pub candles: Option<Vec<DerivCandle>>,
    #[serde(default)]
    pub req_id: Option<u32>,
}
