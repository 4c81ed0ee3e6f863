use report_core::{Fundamentals, Recommendation, Signal};

/// ROE above this fraction earns a point
pub const ROE_THRESHOLD: f64 = 0.15;
/// Trailing P/E below this earns a point
pub const PE_THRESHOLD: f64 = 30.0;
/// Debt-to-equity (percent form) below this earns a point
pub const DEBT_TO_EQUITY_THRESHOLD: f64 = 150.0;

pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Self
    }

    /// Additive composite score over fundamentals and interpreted signals.
    ///
    /// Thresholds are strict inequalities and absent inputs contribute
    /// nothing, so sparse data drifts the score toward SELL rather than
    /// inventing conviction. The reachable range is -1..=4.
    pub fn score(&self, fundamentals: &Fundamentals, signals: &[Signal]) -> i32 {
        let mut score = 0;

        // Fundamental thresholds
        if fundamentals.roe.map_or(false, |roe| roe > ROE_THRESHOLD) {
            score += 1;
        }
        if fundamentals.trailing_pe.map_or(false, |pe| pe < PE_THRESHOLD) {
            score += 1;
        }
        if fundamentals
            .debt_to_equity
            .map_or(false, |de| de < DEBT_TO_EQUITY_THRESHOLD)
        {
            score += 1;
        }

        // Technical reads, scanned from the rendered commentary
        if signals.iter().any(|s| s.text.contains("Bullish")) {
            score += 1;
        }
        if signals.iter().any(|s| s.text.contains("Overbought")) {
            score -= 1;
        }

        score
    }

    /// Score plus its recommendation tier
    pub fn recommend(
        &self,
        fundamentals: &Fundamentals,
        signals: &[Signal],
    ) -> (i32, Recommendation) {
        let score = self.score(fundamentals, signals);
        (score, Recommendation::from_score(score))
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}
