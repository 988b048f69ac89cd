//! Technical indicators over a numeric price series
//!
//! Pure slice-in/Vec-out functions. Every output vector has the same length
//! as its input, with NaN in the warm-up positions where the indicator is
//! undefined. A period of 0, or a period longer than the series, yields an
//! all-NaN vector of the input length.

/// Simple moving average
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || period > n {
        return out;
    }
    let mut window_sum: f64 = values[..period].iter().sum();
    out[period - 1] = window_sum / period as f64;
    for i in period..n {
        window_sum += values[i] - values[i - period];
        out[i] = window_sum / period as f64;
    }
    out
}

/// Exponential moving average, seeded with the SMA of the first period
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || period > n {
        return out;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = seed;
    let mut prev = seed;
    for i in period..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

/// Relative strength index with Wilder smoothing
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..n {
        let change = values[i] - values[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// MACD line, signal line, and histogram
///
/// The MACD line is `ema(fast) - ema(slow)`; the signal line is an EMA of
/// the MACD line over the valid region.
pub fn macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = values.len();
    let fast = ema(values, fast_period);
    let slow = ema(values, slow_period);

    let mut line = vec![f64::NAN; n];
    for i in 0..n {
        if fast[i].is_finite() && slow[i].is_finite() {
            line[i] = fast[i] - slow[i];
        }
    }

    // Signal: EMA over the contiguous valid tail of the MACD line
    let mut signal = vec![f64::NAN; n];
    let first_valid = line.iter().position(|v| v.is_finite());
    if let Some(offset) = first_valid {
        let valid: Vec<f64> = line[offset..].to_vec();
        let smoothed = ema(&valid, signal_period);
        for (i, v) in smoothed.into_iter().enumerate() {
            signal[offset + i] = v;
        }
    }

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if line[i].is_finite() && signal[i].is_finite() {
            histogram[i] = line[i] - signal[i];
        }
    }

    (line, signal, histogram)
}

/// Bollinger Bands: (upper, middle, lower)
///
/// Middle band is the SMA; upper/lower are `std_mult` population standard
/// deviations away.
pub fn bollinger(values: &[f64], period: usize, std_mult: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = values.len();
    let middle = sma(values, period);
    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];
    if period == 0 || period > n {
        return (upper, middle, lower);
    }
    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean = middle[i];
        let variance =
            window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();
        upper[i] = mean + std_mult * std_dev;
        lower[i] = mean - std_mult * std_dev;
    }
    (upper, middle, lower)
}

/// Stochastic oscillator: (%K, %D)
///
/// %K positions the close within the high/low range of the last `k_period`
/// buckets; %D is an SMA of %K over `d_period`. A zero range yields 50.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut k = vec![f64::NAN; n];
    if k_period == 0 || k_period > n {
        return (k, vec![f64::NAN; n]);
    }
    for i in (k_period - 1)..n {
        let window = i + 1 - k_period..=i;
        let highest = highs[window.clone()]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let lowest = lows[window].iter().cloned().fold(f64::INFINITY, f64::min);
        let range = highest - lowest;
        k[i] = if range == 0.0 {
            50.0
        } else {
            100.0 * (closes[i] - lowest) / range
        };
    }

    // %D: SMA over the valid tail of %K
    let mut d = vec![f64::NAN; n];
    let offset = k_period - 1;
    let valid: Vec<f64> = k[offset..].to_vec();
    let smoothed = sma(&valid, d_period);
    for (i, v) in smoothed.into_iter().enumerate() {
        d[offset + i] = v;
    }
    (k, d)
}

/// Average true range with Wilder smoothing
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut out = vec![f64::NAN; n];
    if period == 0 || period > n {
        return out;
    }
    let tr = true_ranges(highs, lows, closes, n);
    let mut value: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = value;
    for i in period..n {
        value = (value * (period as f64 - 1.0) + tr[i]) / period as f64;
        out[i] = value;
    }
    out
}

fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64], n: usize) -> Vec<f64> {
    let mut tr = Vec::with_capacity(n);
    for i in 0..n {
        if i == 0 {
            tr.push(highs[0] - lows[0]);
        } else {
            let hl = highs[i] - lows[i];
            let hc = (highs[i] - closes[i - 1]).abs();
            let lc = (lows[i] - closes[i - 1]).abs();
            tr.push(hl.max(hc).max(lc));
        }
    }
    tr
}

/// Average directional index
///
/// Wilder's construction: smoothed +DM/-DM against ATR give the directional
/// indices; ADX is a Wilder average of the DX series. First defined value is
/// at index `2 * period - 1`.
pub fn adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < 2 * period {
        return out;
    }

    let tr = true_ranges(highs, lows, closes, n);
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    for i in 1..n {
        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    // Wilder-smoothed sums, seeded over the first `period` deltas
    let mut tr_sum: f64 = tr[1..=period].iter().sum();
    let mut plus_sum: f64 = plus_dm[1..=period].iter().sum();
    let mut minus_sum: f64 = minus_dm[1..=period].iter().sum();

    let mut dx = vec![f64::NAN; n];
    dx[period] = dx_value(plus_sum, minus_sum, tr_sum);
    for i in (period + 1)..n {
        tr_sum = tr_sum - tr_sum / period as f64 + tr[i];
        plus_sum = plus_sum - plus_sum / period as f64 + plus_dm[i];
        minus_sum = minus_sum - minus_sum / period as f64 + minus_dm[i];
        dx[i] = dx_value(plus_sum, minus_sum, tr_sum);
    }

    // ADX: Wilder average over DX
    let first = period;
    let seed_end = first + period;
    let mut adx_value: f64 = dx[first..seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end - 1] = adx_value;
    for i in seed_end..n {
        adx_value = (adx_value * (period as f64 - 1.0) + dx[i]) / period as f64;
        out[i] = adx_value;
    }
    out
}

fn dx_value(plus_sum: f64, minus_sum: f64, tr_sum: f64) -> f64 {
    if tr_sum == 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * plus_sum / tr_sum;
    let minus_di = 100.0 * minus_sum / tr_sum;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / di_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_sma_basic() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_close(out[2], 2.0);
        assert_close(out[3], 3.0);
        assert_close(out[4], 4.0);
    }

    #[test]
    fn test_sma_degenerate_periods() {
        assert!(sma(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(sma(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        // alpha = 0.5: seed 4.0 at index 2, then 6.0, 8.0
        let out = ema(&[2.0, 4.0, 6.0, 8.0, 10.0], 3);
        assert!(out[1].is_nan());
        assert_close(out[2], 4.0);
        assert_close(out[3], 6.0);
        assert_close(out[4], 8.0);
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let out = rsi(&values, 14);
        assert!(out[13].is_nan());
        assert_close(out[14], 100.0);
        assert_close(out[19], 100.0);
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let values = vec![5.0; 20];
        let out = rsi(&values, 14);
        assert_close(out[14], 50.0);
    }

    #[test]
    fn test_macd_constant_series_is_zero() {
        let values = vec![10.0; 60];
        let (line, signal, histogram) = macd(&values, 12, 26, 9);
        assert!(line[24].is_nan());
        assert_close(line[25], 0.0);
        assert_close(*signal.last().unwrap(), 0.0);
        assert_close(*histogram.last().unwrap(), 0.0);
    }

    #[test]
    fn test_macd_warmup_positions() {
        let values: Vec<f64> = (0..60).map(|v| (v as f64).sin() + 10.0).collect();
        let (line, signal, _) = macd(&values, 12, 26, 9);
        assert_eq!(line.len(), 60);
        assert!(line[..25].iter().all(|v| v.is_nan()));
        assert!(line[25].is_finite());
        // signal needs `signal_period` valid MACD values
        assert!(signal[..33].iter().all(|v| v.is_nan()));
        assert!(signal[33].is_finite());
    }

    #[test]
    fn test_bollinger_constant_series() {
        let values = vec![7.0; 25];
        let (upper, middle, lower) = bollinger(&values, 20, 2.0);
        assert_close(upper[24], 7.0);
        assert_close(middle[24], 7.0);
        assert_close(lower[24], 7.0);
    }

    #[test]
    fn test_bollinger_bands_bracket_middle() {
        let values: Vec<f64> = (0..30).map(|v| 100.0 + ((v * 7) % 13) as f64).collect();
        let (upper, middle, lower) = bollinger(&values, 20, 2.0);
        for i in 19..30 {
            assert!(upper[i] >= middle[i]);
            assert!(lower[i] <= middle[i]);
        }
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let highs = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        let lows = vec![8.0, 9.0, 10.0, 11.0, 12.0];
        let closes = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        let (k, d) = stochastic(&highs, &lows, &closes, 3, 2);
        assert!(k[1].is_nan());
        assert_close(k[4], 100.0);
        assert_close(d[4], 100.0);
    }

    #[test]
    fn test_stochastic_zero_range() {
        let flat = vec![5.0; 10];
        let (k, _) = stochastic(&flat, &flat, &flat, 3, 2);
        assert_close(k[9], 50.0);
    }

    #[test]
    fn test_atr_constant_range() {
        let highs = vec![12.0; 20];
        let lows = vec![10.0; 20];
        let closes = vec![11.0; 20];
        let out = atr(&highs, &lows, &closes, 14);
        assert!(out[12].is_nan());
        assert_close(out[13], 2.0);
        assert_close(out[19], 2.0);
    }

    #[test]
    fn test_adx_strong_uptrend_is_100() {
        // Strictly rising highs/lows: -DM stays 0, so DX and ADX pin at 100
        let highs: Vec<f64> = (0..40).map(|v| 10.0 + v as f64).collect();
        let lows: Vec<f64> = (0..40).map(|v| 9.0 + v as f64).collect();
        let closes: Vec<f64> = (0..40).map(|v| 9.5 + v as f64).collect();
        let out = adx(&highs, &lows, &closes, 14);
        assert!(out[26].is_nan());
        assert_close(out[27], 100.0);
        assert_close(out[39], 100.0);
    }

    #[test]
    fn test_adx_too_short_series() {
        let values = vec![1.0; 20];
        assert!(adx(&values, &values, &values, 14).iter().all(|v| v.is_nan()));
    }
}
