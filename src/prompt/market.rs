//! Market analysis prompt builder
//!
//! Embeds the recent close series and the indicator snapshot, and pins the
//! reply to a fixed JSON shape so the handler can relay it.

use crate::analysis::report::IndicatorSnapshot;
use crate::models::market::Candle;
use std::fmt::Write;

/// Closes embedded in the prompt, most recent last
const MAX_EMBEDDED_CLOSES: usize = 30;

fn push_indicator(out: &mut String, label: &str, value: Option<f64>) {
    if let Some(v) = value {
        let _ = writeln!(out, "- {label}: {v:.4}");
    }
}

/// Build the market analysis prompt
pub fn build(
    symbol: &str,
    granularity: &str,
    candles: &[Candle],
    snapshot: &IndicatorSnapshot,
) -> String {
    let closes: Vec<String> = candles
        .iter()
        .rev()
        .take(MAX_EMBEDDED_CLOSES)
        .map(|c| format!("{:.4}", c.close))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a technical analyst. Analyse the instrument {symbol} on {granularity} candles."
    );
    let _ = writeln!(
        prompt,
        "Recent closes (oldest to newest): {}",
        closes.join(", ")
    );
    let _ = writeln!(prompt, "\nLatest indicator readings:");
    let _ = writeln!(prompt, "- last close: {:.4}", snapshot.close);
    push_indicator(&mut prompt, "SMA(20)", snapshot.sma_20);
    push_indicator(&mut prompt, "EMA(12)", snapshot.ema_12);
    push_indicator(&mut prompt, "EMA(26)", snapshot.ema_26);
    push_indicator(&mut prompt, "RSI(14)", snapshot.rsi_14);
    push_indicator(&mut prompt, "MACD", snapshot.macd);
    push_indicator(&mut prompt, "MACD signal", snapshot.macd_signal);
    push_indicator(&mut prompt, "MACD histogram", snapshot.macd_histogram);
    push_indicator(&mut prompt, "Bollinger upper", snapshot.bollinger_upper);
    push_indicator(&mut prompt, "Bollinger middle", snapshot.bollinger_middle);
    push_indicator(&mut prompt, "Bollinger lower", snapshot.bollinger_lower);
    push_indicator(&mut prompt, "Stochastic %K", snapshot.stochastic_k);
    push_indicator(&mut prompt, "Stochastic %D", snapshot.stochastic_d);
    push_indicator(&mut prompt, "ATR(14)", snapshot.atr_14);
    push_indicator(&mut prompt, "ADX(14)", snapshot.adx_14);
    let _ = writeln!(
        prompt,
        "- RSI zone: {}, price vs SMA(20): {}, MACD direction: {}",
        snapshot.rsi_zone, snapshot.trend_bias, snapshot.macd_direction
    );
    let _ = writeln!(
        prompt,
        "\nReply with a single JSON object, no markdown, no commentary outside it:"
    );
    let _ = writeln!(
        prompt,
        r#"{{"signal": "BUY" | "SELL" | "HOLD", "confidence": <0-100>, "rationale": "<two sentences>", "key_levels": {{"support": <number>, "resistance": <number>}}}}"#
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report;

    fn rising_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle {
                epoch: 1_700_000_000 + i as i64 * 60,
                open: 99.5 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.0 + i as f64,
            })
            .collect()
    }

    #[test]
    fn test_prompt_embeds_symbol_and_data() {
        let candles = rising_candles(60);
        let snapshot = report::snapshot(&candles);
        let prompt = build("R_100", "5m", &candles, &snapshot);
        assert!(prompt.contains("R_100"));
        assert!(prompt.contains("5m candles"));
        // newest close present
        assert!(prompt.contains("159.0000"));
        assert!(prompt.contains("RSI(14)"));
        assert!(prompt.contains(r#""signal""#));
    }

    #[test]
    fn test_prompt_caps_embedded_closes() {
        let candles = rising_candles(200);
        let snapshot = report::snapshot(&candles);
        let prompt = build("R_50", "1m", &candles, &snapshot);
        // oldest closes are dropped, newest kept
        assert!(!prompt.contains("100.0000,"));
        assert!(prompt.contains("299.0000"));
    }

    #[test]
    fn test_prompt_omits_unavailable_indicators() {
        let candles = rising_candles(5);
        let snapshot = report::snapshot(&candles);
        let prompt = build("R_10", "1m", &candles, &snapshot);
        assert!(!prompt.contains("ADX(14)"));
        assert!(prompt.contains("last close"));
    }
}
