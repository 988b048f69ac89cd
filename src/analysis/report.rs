//! Indicator snapshot assembly
//!
//! Reduces a candle series to the latest value of each configured indicator
//! plus the qualitative tags the prompt builders embed.

use crate::analysis::indicators;
use crate::models::market::Candle;
use serde::Serialize;

/// Default lookback periods, matching common charting defaults
const SMA_PERIOD: usize = 20;
const EMA_FAST: usize = 12;
const EMA_SLOW: usize = 26;
const RSI_PERIOD: usize = 14;
const MACD_SIGNAL: usize = 9;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD_MULT: f64 = 2.0;
const STOCHASTIC_K: usize = 14;
const STOCHASTIC_D: usize = 3;
const ATR_PERIOD: usize = 14;
const ADX_PERIOD: usize = 14;

/// Latest indicator values over a candle series
///
/// Indicators whose warm-up exceeds the series length come out as None and
/// are omitted from the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub sma_20: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub stochastic_k: Option<f64>,
    pub stochastic_d: Option<f64>,
    pub atr_14: Option<f64>,
    pub adx_14: Option<f64>,
    /// "overbought" / "oversold" / "neutral" from RSI
    pub rsi_zone: String,
    /// "above" / "below" / "unknown": close relative to SMA-20
    pub trend_bias: String,
    /// "bullish" / "bearish" / "flat" from the MACD histogram sign
    pub macd_direction: String,
}

/// Last finite value of a series
fn latest(series: &[f64]) -> Option<f64> {
    series.iter().rev().find(|v| v.is_finite()).copied()
}

/// Compute the snapshot for a candle series
///
/// The caller guarantees at least one candle.
pub fn snapshot(candles: &[Candle]) -> IndicatorSnapshot {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let close = *closes.last().unwrap_or(&f64::NAN);

    let sma_20 = latest(&indicators::sma(&closes, SMA_PERIOD));
    let ema_12 = latest(&indicators::ema(&closes, EMA_FAST));
    let ema_26 = latest(&indicators::ema(&closes, EMA_SLOW));
    let rsi_14 = latest(&indicators::rsi(&closes, RSI_PERIOD));

    let (macd_line, signal_line, histogram) =
        indicators::macd(&closes, EMA_FAST, EMA_SLOW, MACD_SIGNAL);
    let macd = latest(&macd_line);
    let macd_signal = latest(&signal_line);
    let macd_histogram = latest(&histogram);

    let (upper, middle, lower) =
        indicators::bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_MULT);
    let (k, d) = indicators::stochastic(&highs, &lows, &closes, STOCHASTIC_K, STOCHASTIC_D);

    let rsi_zone = match rsi_14 {
        Some(v) if v >= 70.0 => "overbought",
        Some(v) if v <= 30.0 => "oversold",
        Some(_) => "neutral",
        None => "neutral",
    }
    .to_string();

    let trend_bias = match sma_20 {
        Some(v) if close > v => "above",
        Some(v) if close < v => "below",
        Some(_) => "at",
        None => "unknown",
    }
    .to_string();

    let macd_direction = match macd_histogram {
        Some(v) if v > 0.0 => "bullish",
        Some(v) if v < 0.0 => "bearish",
        Some(_) => "flat",
        None => "flat",
    }
    .to_string();

    IndicatorSnapshot {
        close,
        sma_20,
        ema_12,
        ema_26,
        rsi_14,
        macd,
        macd_signal,
        macd_histogram,
        bollinger_upper: latest(&upper),
        bollinger_middle: latest(&middle),
        bollinger_lower: latest(&lower),
        stochastic_k: latest(&k),
        stochastic_d: latest(&d),
        atr_14: latest(&indicators::atr(&highs, &lows, &closes, ATR_PERIOD)),
        adx_14: latest(&indicators::adx(&highs, &lows, &closes, ADX_PERIOD)),
        rsi_zone,
        trend_bias,
        macd_direction,
    }
}
