use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use report_core::{
    CompanyOfficer, Fundamentals, HistoryRange, MarketDataProvider, NewsItem, PriceBar,
    ReportError, StatementPeriod,
};

const QUERY1_BASE_URL: &str = "https://query1.finance.yahoo.com";
const QUERY2_BASE_URL: &str = "https://query2.finance.yahoo.com";
const LOGO_BASE_URL: &str = "https://logo.clearbit.com";

/// Yahoo blocks the default reqwest UA, so present a browser one
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0";

const QUOTE_SUMMARY_MODULES: &str = "assetProfile,price,summaryDetail,financialData,\
incomeStatementHistory,incomeStatementHistoryQuarterly,balanceSheetHistory,\
balanceSheetHistoryQuarterly";

const CACHE_TTL_SECS: i64 = 3600;

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Need to wait until the oldest request falls out of the window
            let wait_until = ts.front().unwrap().checked_add(self.window).unwrap();
            let sleep_dur = wait_until.duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for Yahoo API slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Which reported company name a snapshot should carry. The main report
/// header uses the long legal name; peer tables use the short one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameStyle {
    Long,
    Short,
}

impl NameStyle {
    fn as_key(&self) -> &'static str {
        match self {
            NameStyle::Long => "long",
            NameStyle::Short => "short",
        }
    }
}

pub struct YahooClient {
    client: Client,
    rate_limiter: RateLimiter,
    fundamentals_cache: DashMap<String, CacheEntry<Fundamentals>>,
    history_cache: DashMap<String, CacheEntry<Vec<PriceBar>>>,
}

impl YahooClient {
    pub fn new() -> Self {
        // Yahoo tolerates roughly 60 unauthenticated requests a minute per
        // IP before answering 429. Override with YAHOO_RATE_LIMIT.
        let rate_limit: usize = std::env::var("YAHOO_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
            fundamentals_cache: DashMap::new(),
            history_cache: DashMap::new(),
        }
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ReportError> {
        let request = builder
            .build()
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| ReportError::ApiError("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| ReportError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!(
                "Yahoo 429 rate limited, waiting {}s before retry {}/3",
                wait_secs,
                attempt + 1
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(ReportError::ApiError(
            "Rate limited by Yahoo after 3 retries".to_string(),
        ))
    }

    /// Daily OHLCV history for a symbol (cached, 1-hour TTL)
    pub async fn get_price_history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Vec<PriceBar>, ReportError> {
        let cache_key = format!("{}:{}", symbol.to_uppercase(), range.as_query());
        if let Some(entry) = self.history_cache.get(&cache_key) {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < CACHE_TTL_SECS {
                return Ok(entry.data.clone());
            }
        }

        let url = format!("{}/v8/finance/chart/{}", QUERY1_BASE_URL, symbol);
        let response = self
            .send_request(self.client.get(&url).query(&[
                ("range", range.as_query()),
                ("interval", "1d"),
                ("events", "div,split"),
            ]))
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::ApiError(format!(
                "Chart HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        let bars = decode_chart(envelope);

        self.history_cache.insert(
            cache_key,
            CacheEntry {
                data: bars.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(bars)
    }

    /// Company snapshot from the quoteSummary endpoint (cached, 1-hour TTL)
    pub async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
        self.get_fundamentals_with(symbol, NameStyle::Long).await
    }

    /// Peer snapshot: identical payload, short display name
    pub async fn get_peer_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
        self.get_fundamentals_with(symbol, NameStyle::Short).await
    }

    async fn get_fundamentals_with(
        &self,
        symbol: &str,
        style: NameStyle,
    ) -> Result<Fundamentals, ReportError> {
        let cache_key = format!("{}:{}", symbol.to_uppercase(), style.as_key());
        if let Some(entry) = self.fundamentals_cache.get(&cache_key) {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < CACHE_TTL_SECS {
                return Ok(entry.data.clone());
            }
        }

        let url = format!("{}/v10/finance/quoteSummary/{}", QUERY1_BASE_URL, symbol);
        let response = self
            .send_request(
                self.client
                    .get(&url)
                    .query(&[("modules", QUOTE_SUMMARY_MODULES)]),
            )
            .await?;

        if response.status().as_u16() == 404 {
            return Err(ReportError::DataUnavailable(symbol.to_string()));
        }
        if !response.status().is_success() {
            return Err(ReportError::ApiError(format!(
                "quoteSummary HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let envelope: QuoteSummaryEnvelope = response
            .json()
            .await
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        let result = envelope
            .quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::DataUnavailable(symbol.to_string()))?;

        let fundamentals = decode_fundamentals(symbol, style, result);

        self.fundamentals_cache.insert(
            cache_key,
            CacheEntry {
                data: fundamentals.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(fundamentals)
    }

    /// Recent headlines from the search endpoint
    pub async fn get_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, ReportError> {
        let url = format!("{}/v1/finance/search", QUERY2_BASE_URL);
        let count = limit.to_string();
        let response = self
            .send_request(self.client.get(&url).query(&[
                ("q", symbol),
                ("newsCount", count.as_str()),
                ("quotesCount", "0"),
            ]))
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::ApiError(format!(
                "Search HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        Ok(decode_news(envelope, limit))
    }

    /// Fetch the company logo bytes. Any failure just drops the logo.
    pub async fn get_logo(&self, url: &str) -> Option<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.bytes().await.ok().map(|b| b.to_vec())
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
        self.get_fundamentals(symbol).await
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Vec<PriceBar>, ReportError> {
        self.get_price_history(symbol, range).await
    }

    async fn fetch_peer_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ReportError> {
        self.get_peer_fundamentals(symbol).await
    }

    async fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, ReportError> {
        self.get_news(symbol, limit).await
    }

    async fn fetch_logo(&self, url: &str) -> Option<Vec<u8>> {
        self.get_logo(url).await
    }
}

/// Flatten a chart payload into bars, preferring adjusted closes and
/// skipping slots where the exchange reported no trade.
fn decode_chart(envelope: ChartEnvelope) -> Vec<PriceBar> {
    let Some(result) = envelope.chart.result.into_iter().next() else {
        return Vec::new();
    };
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .unwrap_or_default()
        .adjclose;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let close = adjclose
            .get(i)
            .copied()
            .flatten()
            .or_else(|| quote.close.get(i).copied().flatten());
        let Some(close) = close else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        bars.push(PriceBar {
            date,
            open: quote.open.get(i).copied().flatten().unwrap_or(close),
            high: quote.high.get(i).copied().flatten().unwrap_or(close),
            low: quote.low.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
        });
    }
    bars
}

fn decode_fundamentals(symbol: &str, style: NameStyle, result: QuoteSummaryResult) -> Fundamentals {
    let price = result.price.unwrap_or_default();
    let summary_detail = result.summary_detail.unwrap_or_default();
    let financial_data = result.financial_data.unwrap_or_default();
    let profile = result.asset_profile.unwrap_or_default();

    let company_name = match style {
        NameStyle::Long => price.long_name,
        NameStyle::Short => price.short_name,
    }
    .unwrap_or_else(|| symbol.to_string());

    let logo_url = profile.website.as_deref().and_then(logo_url_for);

    let annual_statements = merge_statements(
        result
            .income_statement_history
            .unwrap_or_default()
            .income_statement_history,
        result
            .balance_sheet_history
            .unwrap_or_default()
            .balance_sheet_statements,
    );
    let quarterly_statements = merge_statements(
        result
            .income_statement_history_quarterly
            .unwrap_or_default()
            .income_statement_history,
        result
            .balance_sheet_history_quarterly
            .unwrap_or_default()
            .balance_sheet_statements,
    );

    Fundamentals {
        symbol: symbol.to_string(),
        company_name,
        description: profile.long_business_summary,
        market_cap: price.market_cap.raw,
        current_price: price.regular_market_price.raw,
        trailing_pe: summary_detail.trailing_pe.raw,
        roe: financial_data.return_on_equity.raw,
        debt_to_equity: financial_data.debt_to_equity.raw,
        dividend_yield: summary_detail.dividend_yield.raw,
        logo_url,
        officers: profile
            .company_officers
            .into_iter()
            .map(|o| CompanyOfficer {
                name: o.name,
                title: o.title,
            })
            .collect(),
        annual_statements,
        quarterly_statements,
    }
}

/// Join income and balance entries into statement periods by exact end
/// date. Income statements drive the period list; balance figures attach
/// where the dates line up.
fn merge_statements(
    income: Vec<IncomeStatementEntry>,
    balance: Vec<BalanceSheetEntry>,
) -> Vec<StatementPeriod> {
    income
        .into_iter()
        .filter_map(|entry| {
            let period_ending = raw_to_date(&entry.end_date)?;
            let matched = balance
                .iter()
                .find(|b| raw_to_date(&b.end_date) == Some(period_ending));
            Some(StatementPeriod {
                period_ending,
                total_revenue: entry.total_revenue.raw,
                net_income: entry.net_income.raw,
                total_assets: matched.and_then(|b| b.total_assets.raw),
                total_liabilities: matched.and_then(|b| b.total_liab.raw),
            })
        })
        .collect()
}

fn decode_news(envelope: SearchEnvelope, limit: usize) -> Vec<NewsItem> {
    envelope
        .news
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title?;
            Some(NewsItem {
                title,
                publisher: entry.publisher.unwrap_or_else(|| "Unknown".to_string()),
            })
        })
        .take(limit)
        .collect()
}

fn raw_to_date(value: &RawValue) -> Option<NaiveDate> {
    let ts = value.raw? as i64;
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Logo URL derived from the company website host, clearbit style
fn logo_url_for(website: &str) -> Option<String> {
    let trimmed = website
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = trimmed.split('/').next().unwrap_or(trimmed);
    let host = host.trim_start_matches("www.");
    if host.is_empty() {
        return None;
    }
    Some(format!("{}/{}", LOGO_BASE_URL, host))
}

// Chart response structures
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Vec<ChartResult>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
    #[serde(default)]
    adjclose: Vec<ChartAdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

// quoteSummary response structures
#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Vec<QuoteSummaryResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(default)]
    asset_profile: Option<AssetProfileModule>,
    #[serde(default)]
    income_statement_history: Option<IncomeHistoryModule>,
    #[serde(default)]
    income_statement_history_quarterly: Option<IncomeHistoryModule>,
    #[serde(default)]
    balance_sheet_history: Option<BalanceHistoryModule>,
    #[serde(default)]
    balance_sheet_history_quarterly: Option<BalanceHistoryModule>,
}

/// Yahoo wraps numbers in `{"raw": ..., "fmt": ...}` envelopes
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    market_cap: RawValue,
    #[serde(default)]
    regular_market_price: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(default, rename = "trailingPE")]
    trailing_pe: RawValue,
    #[serde(default)]
    dividend_yield: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    #[serde(default)]
    return_on_equity: RawValue,
    #[serde(default)]
    debt_to_equity: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfileModule {
    #[serde(default)]
    long_business_summary: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    company_officers: Vec<OfficerEntry>,
}

#[derive(Debug, Deserialize)]
struct OfficerEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeHistoryModule {
    #[serde(default)]
    income_statement_history: Vec<IncomeStatementEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementEntry {
    #[serde(default)]
    end_date: RawValue,
    #[serde(default)]
    total_revenue: RawValue,
    #[serde(default)]
    net_income: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceHistoryModule {
    #[serde(default)]
    balance_sheet_statements: Vec<BalanceSheetEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceSheetEntry {
    #[serde(default)]
    end_date: RawValue,
    #[serde(default)]
    total_assets: RawValue,
    #[serde(default)]
    total_liab: RawValue,
}

// Search response structures
#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    news: Vec<SearchNewsEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchNewsEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
}
