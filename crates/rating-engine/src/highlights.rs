use report_core::{Fundamentals, Highlight, Signal};

use crate::scorer::{Scorer, ROE_THRESHOLD};

/// P/E band narrated as a fair valuation (inclusive)
const FAIR_PE_LOW: f64 = 15.0;
const FAIR_PE_HIGH: f64 = 30.0;

pub struct HighlightGenerator {
    scorer: Scorer,
}

impl HighlightGenerator {
    pub fn new() -> Self {
        Self {
            scorer: Scorer::new(),
        }
    }

    /// Narrative bullets for the highlights section.
    ///
    /// The recommendation bullet is always present and comes from the same
    /// scorer as the summary header, so the two cannot disagree. The rest
    /// appear only when their inputs exist.
    pub fn generate(&self, fundamentals: &Fundamentals, signals: &[Signal]) -> Vec<Highlight> {
        let mut highlights = Vec::new();

        let (_, recommendation) = self.scorer.recommend(fundamentals, signals);
        highlights.push(Highlight::new(
            "Overall Recommendation",
            format!(
                "Based on a composite analysis, the current recommendation is to {}.",
                recommendation
            ),
        ));

        if let Some(pe) = fundamentals.trailing_pe {
            let judgement = if (FAIR_PE_LOW..=FAIR_PE_HIGH).contains(&pe) {
                "fair"
            } else if pe > FAIR_PE_HIGH {
                "potentially high"
            } else {
                "potentially low"
            };
            highlights.push(Highlight::new(
                "Valuation",
                format!(
                    "The stock's P/E ratio of {:.2} suggests a {} valuation.",
                    pe, judgement
                ),
            ));
        }

        if signals.iter().any(|s| s.text.contains("Bullish")) {
            highlights.push(Highlight::new(
                "Technical Trend",
                "The stock is showing bullish long-term trend signals.",
            ));
        } else if signals.iter().any(|s| s.text.contains("Bearish")) {
            highlights.push(Highlight::new(
                "Technical Trend",
                "The stock is showing bearish long-term trend signals.",
            ));
        }

        if let Some(roe) = fundamentals.roe {
            let judgement = if roe > ROE_THRESHOLD {
                "strong"
            } else {
                "moderate"
            };
            highlights.push(Highlight::new(
                "Company Performance",
                format!(
                    "With a Return on Equity of {:.2}%, the company shows {} profitability.",
                    roe * 100.0,
                    judgement
                ),
            ));
        }

        highlights
    }
}

impl Default for HighlightGenerator {
    fn default() -> Self {
        Self::new()
    }
}
