//! Report orchestration: resolves market data for a symbol, runs the
//! indicator and rating pipelines, and assembles the finished document.

pub mod assembler;
pub mod chart;
pub mod peers;
pub mod universe;

use std::sync::Arc;

use tracing::warn;

use indicator_engine::{IndicatorEngine, Interpreter};
use rating_engine::{HighlightGenerator, Scorer};
use report_core::{
    Fundamentals, HistoryRange, MarketDataProvider, ReportDocument, ReportError,
};

pub use assembler::{ReportAssembler, REPORT_BANNER};
pub use peers::PeerAggregator;

/// Headlines requested per report
pub const DEFAULT_NEWS_LIMIT: usize = 5;
/// History span backing the indicator pipeline
pub const PRICE_HISTORY_RANGE: HistoryRange = HistoryRange::ThreeYears;

/// End-to-end report generation for one symbol
pub struct ReportBuilder {
    provider: Arc<dyn MarketDataProvider>,
    indicators: IndicatorEngine,
    interpreter: Interpreter,
    scorer: Scorer,
    highlights: HighlightGenerator,
    peer_aggregator: PeerAggregator,
    assembler: ReportAssembler,
    news_limit: usize,
}

impl ReportBuilder {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        let news_limit = std::env::var("REPORT_NEWS_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_NEWS_LIMIT);

        Self {
            peer_aggregator: PeerAggregator::new(Arc::clone(&provider)),
            provider,
            indicators: IndicatorEngine::new(),
            interpreter: Interpreter::new(),
            scorer: Scorer::new(),
            highlights: HighlightGenerator::new(),
            assembler: ReportAssembler::new(),
            news_limit,
        }
    }

    /// Generate the full report document for `symbol`.
    ///
    /// Fundamentals must resolve or the report fails; history, news, peers
    /// and the logo degrade to their section notices when a source fails.
    pub async fn build_report(&self, symbol: &str) -> Result<ReportDocument, ReportError> {
        tracing::info!("Generating report for {}", symbol);

        let fundamentals = self.provider.fetch_fundamentals(symbol).await?;

        let peer_symbols = universe::peers_for(symbol);
        let (history, news, peer_rows, logo) = tokio::join!(
            self.provider
                .fetch_price_history(symbol, PRICE_HISTORY_RANGE),
            self.provider.fetch_news(symbol, self.news_limit),
            self.peer_aggregator.collect(&peer_symbols),
            self.fetch_logo(&fundamentals),
        );

        let bars = match history {
            Ok(bars) => bars,
            Err(e) => {
                warn!("Price history unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        };
        let news = match news {
            Ok(items) => items,
            Err(e) => {
                warn!("News unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        };

        let series = self.indicators.compute(&bars);
        let signals = self.interpreter.interpret(&series);
        let (score, recommendation) = self.scorer.recommend(&fundamentals, &signals);
        let highlights = self.highlights.generate(&fundamentals, &signals);

        tracing::info!("{} scored {} ({})", symbol, score, recommendation);

        self.assembler.assemble(
            &fundamentals,
            &series,
            &signals,
            recommendation,
            &highlights,
            &peer_rows,
            &news,
            logo.as_deref(),
        )
    }

    async fn fetch_logo(&self, fundamentals: &Fundamentals) -> Option<Vec<u8>> {
        let url = fundamentals.logo_url.as_deref()?;
        self.provider.fetch_logo(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use report_core::{
        CompanyOfficer, Content, NewsItem, PriceBar, Recommendation, Section, StatementPeriod,
    };

    struct StubProvider {
        fail_history: bool,
        fail_news: bool,
    }

    impl StubProvider {
        fn healthy() -> Self {
            Self {
                fail_history: false,
                fail_news: false,
            }
        }
    }

    fn rising_bars(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000_000.0,
                }
            })
            .collect()
    }

    fn stub_fundamentals(symbol: &str) -> Fundamentals {
        Fundamentals {
            symbol: symbol.to_string(),
            company_name: "HDFC Bank Limited".to_string(),
            description: Some("India's largest private sector bank.".to_string()),
            market_cap: Some(8.8e12),
            current_price: Some(1650.5),
            trailing_pe: Some(18.0),
            roe: Some(0.20),
            debt_to_equity: Some(80.0),
            dividend_yield: Some(0.012),
            logo_url: Some("https://logo.clearbit.com/hdfcbank.com".to_string()),
            officers: vec![CompanyOfficer {
                name: Some("A. Banker".to_string()),
                title: Some("Managing Director".to_string()),
            }],
            annual_statements: vec![StatementPeriod {
                period_ending: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                total_revenue: Some(4.5e11),
                net_income: Some(6.0e10),
                total_assets: Some(3.6e12),
                total_liabilities: Some(3.2e12),
            }],
            quarterly_statements: vec![StatementPeriod {
                period_ending: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                total_revenue: Some(1.2e11),
                net_income: Some(1.7e10),
                total_assets: None,
                total_liabilities: None,
            }],
        }
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
            if symbol == "MISSING.NS" {
                return Err(ReportError::DataUnavailable(symbol.to_string()));
            }
            Ok(stub_fundamentals(symbol))
        }

        async fn fetch_price_history(
            &self,
            _symbol: &str,
            range: HistoryRange,
        ) -> Result<Vec<PriceBar>, ReportError> {
            assert_eq!(range, PRICE_HISTORY_RANGE);
            if self.fail_history {
                return Err(ReportError::ApiError("history feed down".to_string()));
            }
            Ok(rising_bars(250))
        }

        async fn fetch_peer_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
            Ok(Fundamentals {
                company_name: format!("Peer {}", symbol),
                trailing_pe: Some(22.0),
                roe: Some(0.12),
                ..stub_fundamentals(symbol)
            })
        }

        async fn fetch_news(
            &self,
            _symbol: &str,
            limit: usize,
        ) -> Result<Vec<NewsItem>, ReportError> {
            if self.fail_news {
                return Err(ReportError::ApiError("news feed down".to_string()));
            }
            Ok((0..limit)
                .map(|i| NewsItem {
                    title: format!("Headline {}", i + 1),
                    publisher: "Newswire".to_string(),
                })
                .collect())
        }

        async fn fetch_logo(&self, _url: &str) -> Option<Vec<u8>> {
            Some(vec![1, 2, 3])
        }
    }

    #[tokio::test]
    async fn test_build_report_end_to_end() {
        let builder = ReportBuilder::new(Arc::new(StubProvider::healthy()));
        let doc = builder.build_report("HDFCBANK.NS").await.unwrap();

        assert_eq!(doc.symbol, "HDFCBANK.NS");
        assert_eq!(doc.page_count(), 5);

        // Strong fundamentals plus a bullish-but-overbought tape nets out
        // at BUY
        let summary = doc
            .sections()
            .find_map(|s| match s {
                Section::Summary(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert_eq!(summary.recommendation, Recommendation::Buy);
        assert_eq!(summary.recommendation_color, "green");

        let chart = doc
            .sections()
            .find_map(|s| match s {
                Section::Chart(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert!(chart.chart.is_ready());
        assert_eq!(chart.commentary.len(), 4);
        assert_eq!(chart.commentary[0], "Trend (SMA): Bullish (Golden Cross)");

        let peer_table = doc
            .sections()
            .find_map(|s| match s {
                Section::PeerComparison(c) => match &c.table {
                    Content::Ready(t) => Some(t),
                    Content::Missing { .. } => None,
                },
                _ => None,
            })
            .unwrap();
        assert_eq!(peer_table.rows.len(), 4);
        assert_eq!(peer_table.rows[0][0], "Peer ICICIBANK.NS");

        let news = doc
            .sections()
            .find_map(|s| match s {
                Section::News(c) => match &c.items {
                    Content::Ready(items) => Some(items),
                    Content::Missing { .. } => None,
                },
                _ => None,
            })
            .unwrap();
        assert_eq!(news.len(), DEFAULT_NEWS_LIMIT);

        let cover = doc
            .sections()
            .find_map(|s| match s {
                Section::Cover(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert!(cover.logo_base64.is_some());
    }

    #[tokio::test]
    async fn test_build_report_fails_without_fundamentals() {
        let builder = ReportBuilder::new(Arc::new(StubProvider::healthy()));
        let result = builder.build_report("MISSING.NS").await;
        assert!(matches!(result, Err(ReportError::DataUnavailable(_))));
    }

    #[tokio::test]
    async fn test_build_report_degrades_on_partial_failures() {
        let builder = ReportBuilder::new(Arc::new(StubProvider {
            fail_history: true,
            fail_news: true,
        }));
        let doc = builder.build_report("INFY.NS").await.unwrap();

        assert_eq!(doc.page_count(), 5);

        let chart = doc
            .sections()
            .find_map(|s| match s {
                Section::Chart(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert!(!chart.chart.is_ready());
        assert_eq!(chart.commentary, vec!["Technical data not available."]);

        let news_missing = doc.sections().any(|s| match s {
            Section::News(c) => !c.items.is_ready(),
            _ => false,
        });
        assert!(news_missing);

        // Without technical signals the fundamentals still carry the score
        let summary = doc
            .sections()
            .find_map(|s| match s {
                Section::Summary(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert_eq!(summary.recommendation, Recommendation::Buy);
    }

    #[tokio::test]
    async fn test_unmapped_symbol_gets_peer_notice() {
        let builder = ReportBuilder::new(Arc::new(StubProvider::healthy()));
        let doc = builder.build_report("WIPRO.NS").await.unwrap();

        let peer_missing = doc.sections().any(|s| match s {
            Section::PeerComparison(c) => !c.table.is_ready(),
            _ => false,
        });
        assert!(peer_missing);
    }
}
