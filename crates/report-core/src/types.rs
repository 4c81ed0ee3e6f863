use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Price history span requested from the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRange {
    OneYear,
    ThreeYears,
    FiveYears,
}

impl HistoryRange {
    pub fn as_query(&self) -> &'static str {
        match self {
            HistoryRange::OneYear => "1y",
            HistoryRange::ThreeYears => "3y",
            HistoryRange::FiveYears => "5y",
        }
    }
}

/// One reported fiscal period with the line items the report tables use.
/// Statements are ordered most-recent-first as delivered by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub period_ending: NaiveDate,
    pub total_revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
}

/// Company officer as reported by the data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyOfficer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Company snapshot: identity, headline ratios, and reported statements.
/// Every ratio is optional; sources routinely omit them per symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: String,
    pub company_name: String,
    pub description: Option<String>,
    pub market_cap: Option<f64>,
    pub current_price: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub officers: Vec<CompanyOfficer>,
    #[serde(default)]
    pub annual_statements: Vec<StatementPeriod>,
    #[serde(default)]
    pub quarterly_statements: Vec<StatementPeriod>,
}

/// News headline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
}

/// One row of the peer comparison table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerRow {
    pub name: String,
    pub trailing_pe: Option<f64>,
    pub roe: Option<f64>,
}

/// Category of an interpreted technical reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Trend,
    Volatility,
    Momentum,
    Strength,
    Unavailable,
}

/// One interpreted technical reading: a short label for scoring plus the
/// full sentence rendered in the report commentary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub label: String,
    pub text: String,
}

impl Signal {
    pub fn new(kind: SignalKind, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    /// Map a composite score onto a tier. Brackets are evaluated top-down;
    /// the reachable score range is -1..=4.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 3 => Recommendation::Buy,
            s if s >= 1 => Recommendation::Hold,
            _ => Recommendation::Sell,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
        }
    }

    /// Fixed render color per tier
    pub fn color(&self) -> &'static str {
        match self {
            Recommendation::Buy => "green",
            Recommendation::Hold => "orange",
            Recommendation::Sell => "red",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One narrative bullet in the key highlights section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub heading: String,
    pub text: String,
}

impl Highlight {
    pub fn new(heading: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_brackets() {
        assert_eq!(Recommendation::from_score(4), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(3), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(2), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(1), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(0), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(-1), Recommendation::Sell);
    }

    #[test]
    fn test_recommendation_colors() {
        assert_eq!(Recommendation::Buy.color(), "green");
        assert_eq!(Recommendation::Hold.color(), "orange");
        assert_eq!(Recommendation::Sell.color(), "red");
    }

    #[test]
    fn test_recommendation_serializes_uppercase() {
        let json = serde_json::to_string(&Recommendation::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");
    }

    #[test]
    fn test_history_range_query_strings() {
        assert_eq!(HistoryRange::OneYear.as_query(), "1y");
        assert_eq!(HistoryRange::ThreeYears.as_query(), "3y");
        assert_eq!(HistoryRange::FiveYears.as_query(), "5y");
    }
}
