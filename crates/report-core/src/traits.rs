use async_trait::async_trait;

use crate::{Fundamentals, HistoryRange, NewsItem, PriceBar, ReportError};

/// Trait for market data sources feeding report generation
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError>;

    async fn fetch_price_history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Vec<PriceBar>, ReportError>;

    /// Slim snapshot for one peer comparison row; absent ratios stay `None`
    async fn fetch_peer_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError>;

    async fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, ReportError>;

    /// Best-effort logo download; failures degrade to `None`, never an error
    async fn fetch_logo(&self, url: &str) -> Option<Vec<u8>>;
}
