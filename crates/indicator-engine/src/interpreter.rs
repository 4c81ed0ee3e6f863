use report_core::{Signal, SignalKind};

use crate::engine::IndicatorSeries;

/// Commentary placeholder when there is no price history to interpret
pub const NO_DATA_TEXT: &str = "Technical data not available.";

pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Read the latest indicator row into labeled signals.
    ///
    /// Each reading is independently skipped when its inputs are undefined,
    /// so a short history produces fewer signals rather than wrong ones. An
    /// empty series produces a single placeholder signal.
    pub fn interpret(&self, series: &IndicatorSeries) -> Vec<Signal> {
        let Some(latest) = series.latest() else {
            return vec![Signal::new(
                SignalKind::Unavailable,
                "Unavailable",
                NO_DATA_TEXT,
            )];
        };

        let mut signals = Vec::new();

        // Trend: fast SMA against slow SMA
        if let (Some(fast), Some(slow)) = (latest.sma_50, latest.sma_200) {
            if fast > slow {
                signals.push(Signal::new(
                    SignalKind::Trend,
                    "Bullish",
                    "Trend (SMA): Bullish (Golden Cross)",
                ));
            } else {
                signals.push(Signal::new(
                    SignalKind::Trend,
                    "Bearish",
                    "Trend (SMA): Bearish (Death Cross)",
                ));
            }
        }

        // Volatility: close pressing through the upper band
        if let Some(upper) = latest.bb_upper {
            if latest.close > upper {
                signals.push(Signal::new(
                    SignalKind::Volatility,
                    "High",
                    "Volatility (Bollinger): High (Price above upper band)",
                ));
            } else {
                signals.push(Signal::new(
                    SignalKind::Volatility,
                    "Normal",
                    "Volatility (Bollinger): Normal",
                ));
            }
        }

        // Momentum: MACD line against its signal line
        if let (Some(line), Some(signal)) = (latest.macd_line, latest.macd_signal) {
            if line > signal {
                signals.push(Signal::new(
                    SignalKind::Momentum,
                    "Positive",
                    "Momentum (MACD): Positive (MACD above signal)",
                ));
            } else {
                signals.push(Signal::new(
                    SignalKind::Momentum,
                    "Negative",
                    "Momentum (MACD): Negative (MACD below signal)",
                ));
            }
        }

        // Strength: RSI bands at 70/30
        if let Some(rsi) = latest.rsi {
            let label = if rsi > 70.0 {
                "Overbought"
            } else if rsi < 30.0 {
                "Oversold"
            } else {
                "Neutral"
            };
            signals.push(Signal::new(
                SignalKind::Strength,
                label,
                format!("Strength (RSI): {} at {:.2}", label, rsi),
            ));
        }

        signals
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndicatorEngine;
    use chrono::NaiveDate;
    use report_core::PriceBar;

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_yields_single_placeholder() {
        let series = IndicatorEngine::new().compute(&[]);
        let signals = Interpreter::new().interpret(&series);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Unavailable);
        assert_eq!(signals[0].text, NO_DATA_TEXT);
    }

    #[test]
    fn test_long_uptrend_reads_bullish_and_overbought() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let series = IndicatorEngine::new().compute(&bars_from_closes(&closes));
        let signals = Interpreter::new().interpret(&series);

        assert_eq!(signals.len(), 4);
        assert_eq!(signals[0].text, "Trend (SMA): Bullish (Golden Cross)");
        assert_eq!(signals[0].kind, SignalKind::Trend);
        // A relentless uptrend has zero average loss, so RSI saturates at 100
        assert_eq!(signals[3].text, "Strength (RSI): Overbought at 100.00");
    }

    #[test]
    fn test_long_downtrend_reads_bearish_and_oversold() {
        let closes: Vec<f64> = (0..250).map(|i| 1000.0 - i as f64).collect();
        let series = IndicatorEngine::new().compute(&bars_from_closes(&closes));
        let signals = Interpreter::new().interpret(&series);

        assert_eq!(signals[0].text, "Trend (SMA): Bearish (Death Cross)");
        assert!(signals
            .iter()
            .any(|s| s.text == "Strength (RSI): Oversold at 0.00"));
    }

    #[test]
    fn test_short_history_skips_undefined_readings() {
        // 30 bars: enough for bands, MACD, and RSI, not for the 50/200 SMAs
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let series = IndicatorEngine::new().compute(&bars_from_closes(&closes));
        let signals = Interpreter::new().interpret(&series);

        assert_eq!(signals.len(), 3);
        assert!(signals.iter().all(|s| s.kind != SignalKind::Trend));
        assert!(signals.iter().any(|s| s.kind == SignalKind::Volatility));
        assert!(signals.iter().any(|s| s.kind == SignalKind::Momentum));
        assert!(signals.iter().any(|s| s.kind == SignalKind::Strength));
    }

    #[test]
    fn test_flat_series_is_neutral() {
        let closes = vec![100.0; 250];
        let series = IndicatorEngine::new().compute(&bars_from_closes(&closes));
        let signals = Interpreter::new().interpret(&series);

        // Flat fast SMA does not exceed the slow one, so the trend reads bearish
        assert_eq!(signals[0].label, "Bearish");
        assert!(signals
            .iter()
            .any(|s| s.text == "Volatility (Bollinger): Normal"));
        // Zero gain over zero-epsilon loss gives RSI 0, which reads oversold
        assert!(signals.iter().any(|s| s.label == "Oversold"));
    }
}
