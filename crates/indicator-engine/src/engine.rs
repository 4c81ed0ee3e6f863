use chrono::NaiveDate;
use report_core::PriceBar;
use serde::{Deserialize, Serialize};

use crate::indicators::{bollinger, ema, macd, rsi, sma};

pub const SMA_FAST_WINDOW: usize = 50;
pub const SMA_SLOW_WINDOW: usize = 200;
pub const BOLLINGER_WINDOW: usize = 20;
/// Band half-width in sample standard deviations
pub const BOLLINGER_WIDTH: f64 = 2.0;
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;
pub const RSI_WINDOW: usize = 14;

/// All indicator columns, aligned index-for-index with the input bars.
/// A position where a window has not filled yet holds `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma_50: Vec<Option<f64>>,
    pub sma_200: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub ema_12: Vec<Option<f64>>,
    pub ema_26: Vec<Option<f64>>,
    pub macd_line: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Values at the most recent bar
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        if self.is_empty() {
            return None;
        }
        let i = self.len() - 1;
        Some(IndicatorSnapshot {
            date: self.dates[i],
            close: self.close[i],
            sma_50: self.sma_50[i],
            sma_200: self.sma_200[i],
            bb_upper: self.bb_upper[i],
            macd_line: self.macd_line[i],
            macd_signal: self.macd_signal[i],
            rsi: self.rsi[i],
        })
    }
}

/// The latest row of the series, the inputs signal interpretation reads
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub rsi: Option<f64>,
}

pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute every indicator column over the given daily bars
    pub fn compute(&self, bars: &[PriceBar]) -> IndicatorSeries {
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let bands = bollinger(&close, BOLLINGER_WINDOW, BOLLINGER_WIDTH);
        let macd_series = macd(&close, MACD_FAST_SPAN, MACD_SLOW_SPAN, MACD_SIGNAL_SPAN);
        let ema_12: Vec<Option<f64>> = ema(&close, MACD_FAST_SPAN).into_iter().map(Some).collect();
        let ema_26: Vec<Option<f64>> = ema(&close, MACD_SLOW_SPAN).into_iter().map(Some).collect();

        IndicatorSeries {
            sma_50: sma(&close, SMA_FAST_WINDOW),
            sma_200: sma(&close, SMA_SLOW_WINDOW),
            bb_middle: bands.middle,
            bb_upper: bands.upper,
            bb_lower: bands.lower,
            ema_12,
            ema_26,
            macd_line: macd_series.line,
            macd_signal: macd_series.signal,
            macd_histogram: macd_series.histogram,
            rsi: rsi(&close, RSI_WINDOW),
            dates,
            close,
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
