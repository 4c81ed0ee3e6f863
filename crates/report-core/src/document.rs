//! Render-agnostic report document model.
//!
//! A report is a fixed sequence of pages, each a fixed sequence of typed
//! sections. Renderers (PDF, HTML, terminal) walk the structure; nothing in
//! here knows about layout engines. Data-dependent blocks are wrapped in
//! [`Content`] so a missing input surfaces as an explicit notice instead of
//! silently dropping the section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Highlight, NewsItem, Recommendation};

/// A section payload that either rendered or degraded to a notice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Content<T> {
    Ready(T),
    Missing { notice: String },
}

impl<T> Content<T> {
    pub fn missing(notice: impl Into<String>) -> Self {
        Content::Missing {
            notice: notice.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Content::Ready(_))
    }
}

/// Cover page block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverSection {
    pub banner: String,
    pub tagline: String,
    pub company_name: String,
    /// Base64-encoded logo image bytes, when a logo could be fetched
    pub logo_base64: Option<String>,
    pub generated_on: String,
}

/// Price, market cap, and the headline recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySection {
    pub live_price: String,
    pub market_cap: String,
    pub recommendation: Recommendation,
    pub recommendation_color: String,
}

/// Narrative highlight bullets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightsSection {
    pub title: String,
    pub items: Vec<Highlight>,
}

/// Company overview paragraph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSection {
    pub title: String,
    pub body: Content<String>,
}

/// One resolved officer line (name and title both known)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerLine {
    pub name: String,
    pub title: String,
}

/// Key managerial personnel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagementSection {
    pub title: String,
    pub officers: Content<Vec<OfficerLine>>,
}

/// Pre-formatted display table: header row plus data rows of strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBlock {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Financial statement table (annual or quarterly)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialTableSection {
    pub title: String,
    pub table: Content<TableBlock>,
}

/// Inline SVG chart image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBlock {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

/// Technical chart panels plus the interpreted commentary lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSection {
    pub title: String,
    pub commentary: Vec<String>,
    pub chart: Content<ChartBlock>,
}

/// Peer valuation comparison table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerSection {
    pub title: String,
    pub table: Content<TableBlock>,
}

/// Recent news headlines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSection {
    pub title: String,
    pub items: Content<Vec<NewsItem>>,
}

/// Fixed boilerplate, always present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclaimerSection {
    pub title: String,
    pub body: String,
}

/// One typed section of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Cover(CoverSection),
    Summary(SummarySection),
    Highlights(HighlightsSection),
    Overview(OverviewSection),
    Management(ManagementSection),
    AnnualFinancials(FinancialTableSection),
    QuarterlyFinancials(FinancialTableSection),
    Chart(ChartSection),
    PeerComparison(PeerSection),
    News(NewsSection),
    Disclaimer(DisclaimerSection),
}

impl Section {
    /// Stable section identifier, matching the serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Cover(_) => "cover",
            Section::Summary(_) => "summary",
            Section::Highlights(_) => "highlights",
            Section::Overview(_) => "overview",
            Section::Management(_) => "management",
            Section::AnnualFinancials(_) => "annual_financials",
            Section::QuarterlyFinancials(_) => "quarterly_financials",
            Section::Chart(_) => "chart",
            Section::PeerComparison(_) => "peer_comparison",
            Section::News(_) => "news",
            Section::Disclaimer(_) => "disclaimer",
        }
    }
}

/// One page of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub sections: Vec<Section>,
}

/// The assembled report for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub symbol: String,
    pub company_name: String,
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All sections in page order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.pages.iter().flat_map(|p| p.sections.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tagging() {
        let ready: Content<String> = Content::Ready("hello".to_string());
        let json = serde_json::to_value(&ready).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["value"], "hello");

        let missing: Content<String> = Content::missing("no data");
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["state"], "missing");
        assert_eq!(json["value"]["notice"], "no data");
        assert!(!missing.is_ready());
    }

    #[test]
    fn test_section_kind_matches_serialized_tag() {
        let section = Section::Disclaimer(DisclaimerSection {
            title: "Disclaimer".to_string(),
            body: "text".to_string(),
        });
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["kind"], section.kind());
    }

    #[test]
    fn test_sections_iterates_in_page_order() {
        let doc = ReportDocument {
            symbol: "X".to_string(),
            company_name: "X Ltd".to_string(),
            generated_at: Utc::now(),
            pages: vec![
                Page {
                    sections: vec![Section::Cover(CoverSection {
                        banner: "B".to_string(),
                        tagline: "T".to_string(),
                        company_name: "X Ltd".to_string(),
                        logo_base64: None,
                        generated_on: "January 01, 2025".to_string(),
                    })],
                },
                Page {
                    sections: vec![Section::Disclaimer(DisclaimerSection {
                        title: "Disclaimer".to_string(),
                        body: "text".to_string(),
                    })],
                },
            ],
        };
        let kinds: Vec<&str> = doc.sections().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec!["cover", "disclaimer"]);
        assert_eq!(doc.page_count(), 2);
    }
}
