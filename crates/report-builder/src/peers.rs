//! Concurrent peer lookups for the comparison table.

use std::sync::Arc;

use tokio::task::JoinSet;

use report_core::{MarketDataProvider, PeerRow};

/// Fans peer fundamentals lookups out over the provider and keeps the
/// curated ordering of the results.
pub struct PeerAggregator {
    provider: Arc<dyn MarketDataProvider>,
}

impl PeerAggregator {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch fundamentals for every peer concurrently. A peer that fails
    /// to resolve is dropped from the table rather than failing the report.
    pub async fn collect(&self, symbols: &[String]) -> Vec<PeerRow> {
        let mut join_set = JoinSet::new();

        for (position, symbol) in symbols.iter().cloned().enumerate() {
            let provider = Arc::clone(&self.provider);
            join_set.spawn(async move {
                let result = provider.fetch_peer_fundamentals(&symbol).await;
                (position, symbol, result)
            });
        }

        let mut rows: Vec<(usize, PeerRow)> = Vec::with_capacity(symbols.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((position, _, Ok(fundamentals))) => {
                    rows.push((
                        position,
                        PeerRow {
                            name: fundamentals.company_name,
                            trailing_pe: fundamentals.trailing_pe,
                            roe: fundamentals.roe,
                        },
                    ));
                }
                Ok((_, symbol, Err(e))) => {
                    tracing::warn!("Skipping peer {}: {}", symbol, e);
                }
                Err(e) => {
                    tracing::error!("Peer lookup task failed: {}", e);
                }
            }
        }

        rows.sort_by_key(|(position, _)| *position);
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use report_core::{Fundamentals, HistoryRange, NewsItem, PriceBar, ReportError};

    struct MapProvider;

    #[async_trait]
    impl MarketDataProvider for MapProvider {
        async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
            self.fetch_peer_fundamentals(symbol).await
        }

        async fn fetch_price_history(
            &self,
            _symbol: &str,
            _range: HistoryRange,
        ) -> Result<Vec<PriceBar>, ReportError> {
            Ok(Vec::new())
        }

        async fn fetch_peer_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
            // Stagger responses so earlier symbols resolve later
            let delay_ms = match symbol {
                "TCS.NS" => 30,
                "WIPRO.NS" => 15,
                _ => 0,
            };
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;

            if symbol == "BROKEN.NS" {
                return Err(ReportError::ApiError("peer feed down".to_string()));
            }
            Ok(Fundamentals {
                symbol: symbol.to_string(),
                company_name: format!("{} Ltd", symbol.trim_end_matches(".NS")),
                trailing_pe: Some(18.0),
                roe: Some(0.16),
                ..Fundamentals::default()
            })
        }

        async fn fetch_news(
            &self,
            _symbol: &str,
            _limit: usize,
        ) -> Result<Vec<NewsItem>, ReportError> {
            Ok(Vec::new())
        }

        async fn fetch_logo(&self, _url: &str) -> Option<Vec<u8>> {
            None
        }
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_collect_keeps_request_order() {
        // TCS resolves last and HCLTECH first, but rows come back in
        // request order
        let aggregator = PeerAggregator::new(Arc::new(MapProvider));
        let rows = aggregator
            .collect(&symbols(&["TCS.NS", "WIPRO.NS", "HCLTECH.NS"]))
            .await;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "TCS Ltd");
        assert_eq!(rows[1].name, "WIPRO Ltd");
        assert_eq!(rows[2].name, "HCLTECH Ltd");
    }

    #[tokio::test]
    async fn test_failed_peer_is_dropped_not_fatal() {
        let aggregator = PeerAggregator::new(Arc::new(MapProvider));
        let rows = aggregator
            .collect(&symbols(&["TCS.NS", "BROKEN.NS", "HCLTECH.NS"]))
            .await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "TCS Ltd");
        assert_eq!(rows[1].name, "HCLTECH Ltd");
    }

    #[tokio::test]
    async fn test_empty_symbol_list_yields_no_rows() {
        let aggregator = PeerAggregator::new(Arc::new(MapProvider));
        let rows = aggregator.collect(&[]).await;
        assert!(rows.is_empty());
    }
}
