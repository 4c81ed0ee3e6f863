//! Assembles the fixed five-page report document from resolved inputs.
//!
//! The page layout never varies: cover; summary, highlights, overview and
//! management; annual and quarterly financials; chart and peer comparison;
//! news and disclaimer. Inputs that failed to resolve degrade to notices
//! inside their section instead of changing the shape of the document.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};

use indicator_engine::IndicatorSeries;
use report_core::{
    fmt, ChartSection, Content, CoverSection, DisclaimerSection, FinancialTableSection,
    Fundamentals, Highlight, HighlightsSection, ManagementSection, NewsItem, NewsSection,
    OfficerLine, OverviewSection, Page, PeerRow, PeerSection, Recommendation, ReportDocument,
    ReportError, Section, Signal, StatementPeriod, SummarySection, TableBlock,
};

use crate::chart;

/// Research desk name shown on the cover and named in the disclaimer
pub const REPORT_BANNER: &str = "EquityDesk Research";

const COVER_TAGLINE: &str = "Professional Equity Report For:";

const ANNUAL_PERIODS: usize = 3;
const QUARTERLY_PERIODS: usize = 4;
const OFFICER_LIMIT: usize = 5;

const DISCLAIMER_TEXT: &str = "This report is for informational and educational purposes only \
and does not constitute a recommendation to buy or sell any security. The information contained \
herein has been obtained from sources believed to be reliable, but its accuracy and completeness \
are not guaranteed. EquityDesk Research is not a registered investment advisor. All investment \
decisions should be made with the help of a qualified financial professional. Past performance \
is not indicative of future results.";

type LineItem = (&'static str, fn(&StatementPeriod) -> Option<f64>);

pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the document. The only fatal input is a fundamentals snapshot
    /// without a market cap; everything else degrades in place.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        &self,
        fundamentals: &Fundamentals,
        series: &IndicatorSeries,
        signals: &[Signal],
        recommendation: Recommendation,
        highlights: &[Highlight],
        peers: &[PeerRow],
        news: &[NewsItem],
        logo: Option<&[u8]>,
    ) -> Result<ReportDocument, ReportError> {
        if fundamentals.market_cap.is_none() {
            return Err(ReportError::DataUnavailable(fundamentals.symbol.clone()));
        }

        let generated_at = Utc::now();
        let pages = vec![
            Page {
                sections: vec![self.cover(fundamentals, logo, generated_at)],
            },
            Page {
                sections: vec![
                    self.summary(fundamentals, recommendation),
                    self.highlights(highlights),
                    self.overview(fundamentals),
                    self.management(fundamentals),
                ],
            },
            Page {
                sections: vec![
                    self.annual_financials(fundamentals),
                    self.quarterly_financials(fundamentals),
                ],
            },
            Page {
                sections: vec![self.chart(series, signals), self.peer_comparison(peers)],
            },
            Page {
                sections: vec![self.news(news), self.disclaimer()],
            },
        ];

        Ok(ReportDocument {
            symbol: fundamentals.symbol.clone(),
            company_name: fundamentals.company_name.clone(),
            generated_at,
            pages,
        })
    }

    fn cover(
        &self,
        fundamentals: &Fundamentals,
        logo: Option<&[u8]>,
        generated_at: DateTime<Utc>,
    ) -> Section {
        Section::Cover(CoverSection {
            banner: REPORT_BANNER.to_string(),
            tagline: COVER_TAGLINE.to_string(),
            company_name: fundamentals.company_name.clone(),
            logo_base64: logo.map(|bytes| BASE64.encode(bytes)),
            generated_on: generated_at.format("%B %d, %Y").to_string(),
        })
    }

    fn summary(&self, fundamentals: &Fundamentals, recommendation: Recommendation) -> Section {
        let market_cap = fundamentals
            .market_cap
            .map(fmt::market_cap)
            .unwrap_or_else(|| fmt::NOT_AVAILABLE.to_string());

        Section::Summary(SummarySection {
            live_price: fmt::price(fundamentals.current_price),
            market_cap,
            recommendation,
            recommendation_color: recommendation.color().to_string(),
        })
    }

    fn highlights(&self, highlights: &[Highlight]) -> Section {
        Section::Highlights(HighlightsSection {
            title: "Key Report Highlights".to_string(),
            items: highlights.to_vec(),
        })
    }

    fn overview(&self, fundamentals: &Fundamentals) -> Section {
        let body = match fundamentals.description.as_deref() {
            Some(text) if !text.trim().is_empty() => Content::Ready(text.to_string()),
            _ => Content::missing("No company overview available."),
        };
        Section::Overview(OverviewSection {
            title: "Company Overview".to_string(),
            body,
        })
    }

    fn management(&self, fundamentals: &Fundamentals) -> Section {
        let lines: Vec<OfficerLine> = fundamentals
            .officers
            .iter()
            .filter_map(|officer| match (&officer.name, &officer.title) {
                (Some(name), Some(title)) => Some(OfficerLine {
                    name: name.clone(),
                    title: title.clone(),
                }),
                _ => None,
            })
            .take(OFFICER_LIMIT)
            .collect();

        let officers = if lines.is_empty() {
            Content::missing("Managerial data could not be retrieved.")
        } else {
            Content::Ready(lines)
        };
        Section::Management(ManagementSection {
            title: "Key Managerial Personnel".to_string(),
            officers,
        })
    }

    fn annual_financials(&self, fundamentals: &Fundamentals) -> Section {
        let items: [LineItem; 4] = [
            ("Total Revenue", |p| p.total_revenue),
            ("Net Income", |p| p.net_income),
            ("Total Assets", |p| p.total_assets),
            ("Total Liabilities", |p| p.total_liabilities),
        ];
        Section::AnnualFinancials(FinancialTableSection {
            title: "Financial Summary (Annual, in ₹ Cr)".to_string(),
            table: statement_table(
                &fundamentals.annual_statements,
                ANNUAL_PERIODS,
                "%Y",
                &items,
                "Annual financial data not available.",
            ),
        })
    }

    fn quarterly_financials(&self, fundamentals: &Fundamentals) -> Section {
        let items: [LineItem; 2] = [
            ("Total Revenue", |p| p.total_revenue),
            ("Net Income", |p| p.net_income),
        ];
        Section::QuarterlyFinancials(FinancialTableSection {
            title: "Quarterly Performance (in ₹ Cr)".to_string(),
            table: statement_table(
                &fundamentals.quarterly_statements,
                QUARTERLY_PERIODS,
                "%b %Y",
                &items,
                "Quarterly performance data not available.",
            ),
        })
    }

    fn chart(&self, series: &IndicatorSeries, signals: &[Signal]) -> Section {
        let commentary: Vec<String> = signals.iter().map(|s| s.text.clone()).collect();
        let chart = match chart::render_technical_chart(series) {
            Ok(block) => Content::Ready(block),
            Err(e) => {
                tracing::warn!("Chart rendering failed: {}", e);
                Content::missing("Could not generate charts due to a technical error.")
            }
        };
        Section::Chart(ChartSection {
            title: "Technical Charts & Analysis".to_string(),
            commentary,
            chart,
        })
    }

    fn peer_comparison(&self, peers: &[PeerRow]) -> Section {
        let table = if peers.is_empty() {
            Content::missing("Peer comparison data could not be retrieved.")
        } else {
            let rows = peers
                .iter()
                .map(|peer| {
                    vec![
                        peer.name.clone(),
                        fmt::ratio(peer.trailing_pe),
                        fmt::percent(peer.roe),
                    ]
                })
                .collect();
            Content::Ready(TableBlock {
                headers: vec![
                    "Company".to_string(),
                    "P/E Ratio".to_string(),
                    "ROE".to_string(),
                ],
                rows,
            })
        };
        Section::PeerComparison(PeerSection {
            title: "Peer Comparison".to_string(),
            table,
        })
    }

    fn news(&self, news: &[NewsItem]) -> Section {
        let items = if news.is_empty() {
            Content::missing("Recent news could not be fetched at this time.")
        } else {
            Content::Ready(news.to_vec())
        };
        Section::News(NewsSection {
            title: "Recent News".to_string(),
            items,
        })
    }

    fn disclaimer(&self) -> Section {
        Section::Disclaimer(DisclaimerSection {
            title: "Disclaimer".to_string(),
            body: DISCLAIMER_TEXT.to_string(),
        })
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Render up to `max_periods` statement columns, most recent first. A line
/// item with no value in any shown period is omitted as a row.
fn statement_table(
    statements: &[StatementPeriod],
    max_periods: usize,
    date_format: &str,
    items: &[LineItem],
    notice: &str,
) -> Content<TableBlock> {
    let shown = &statements[..statements.len().min(max_periods)];
    if shown.is_empty() {
        return Content::missing(notice);
    }

    let mut headers = vec!["Metric".to_string()];
    headers.extend(
        shown
            .iter()
            .map(|p| p.period_ending.format(date_format).to_string()),
    );

    let mut rows = Vec::new();
    for &(label, accessor) in items {
        let values: Vec<Option<f64>> = shown.iter().map(accessor).collect();
        if values.iter().all(|v| v.is_none()) {
            continue;
        }
        let mut row = vec![label.to_string()];
        row.extend(values.into_iter().map(|v| match v {
            Some(v) => fmt::crore_cell(v),
            None => fmt::NOT_AVAILABLE.to_string(),
        }));
        rows.push(row);
    }

    Content::Ready(TableBlock { headers, rows })
}
