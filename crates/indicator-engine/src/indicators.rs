//! Rolling indicator primitives over close prices.
//!
//! Every function returns output aligned index-for-index with its input:
//! positions where a window has not yet filled hold `None`. Undefined is not
//! zero; consumers decide what an absent value means.

const RSI_EPSILON: f64 = 1e-9;

/// Simple Moving Average
pub fn sma(data: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if window == 0 || data.len() < window {
        return result;
    }

    for i in window - 1..data.len() {
        let sum: f64 = data[i + 1 - window..=i].iter().sum();
        result[i] = Some(sum / window as f64);
    }
    result
}

/// Rolling sample standard deviation (divisor n-1)
pub fn rolling_std(data: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if window < 2 || data.len() < window {
        return result;
    }

    for i in window - 1..data.len() {
        let slice = &data[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        result[i] = Some(variance.sqrt());
    }
    result
}

/// Exponential Moving Average, seeded with the first value.
/// alpha = 2 / (span + 1); defined from index 0 for non-empty input.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);
    for i in 1..data.len() {
        result.push(alpha * data[i] + (1.0 - alpha) * result[i - 1]);
    }
    result
}

/// Bollinger bands around a rolling mean
pub struct BollingerSeries {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Middle band SMA with upper/lower bands at +/- `width` sample deviations
pub fn bollinger(data: &[f64], window: usize, width: f64) -> BollingerSeries {
    let middle = sma(data, window);
    let std = rolling_std(data, window);

    let upper = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + width * s),
            _ => None,
        })
        .collect();
    let lower = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - width * s),
            _ => None,
        })
        .collect();

    BollingerSeries {
        middle,
        upper,
        lower,
    }
}

/// MACD line, signal line, and histogram
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD from fast/slow EMAs with an EMA signal line over the MACD itself
pub fn macd(data: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let ema_fast = ema(data, fast);
    let ema_slow = ema(data, slow);
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&line, signal_span);
    let histogram: Vec<f64> = line.iter().zip(signal.iter()).map(|(l, s)| l - s).collect();

    MacdSeries {
        line: line.into_iter().map(Some).collect(),
        signal: signal.into_iter().map(Some).collect(),
        histogram: histogram.into_iter().map(Some).collect(),
    }
}

/// Relative Strength Index over plain rolling means of gains and losses.
/// A window with zero average loss substitutes a small epsilon, so an
/// all-gain window reads asymptotically 100 instead of dividing by zero.
pub fn rsi(data: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if window == 0 || data.len() <= window {
        return result;
    }

    let deltas: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    for i in window..data.len() {
        // deltas for bars (i - window + 1)..=i
        let recent = &deltas[i - window..i];
        let gain = recent.iter().filter(|d| **d > 0.0).sum::<f64>() / window as f64;
        let loss = recent.iter().filter(|d| **d < 0.0).map(|d| -d).sum::<f64>() / window as f64;

        let denom = if loss == 0.0 { RSI_EPSILON } else { loss };
        let rs = gain / denom;
        result[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }
    result
}
