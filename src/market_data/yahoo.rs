// =============================================================================
// Yahoo Finance chart client — daily bars for stocks and ETFs
// =============================================================================
//
// Uses the public v8 chart endpoint (no key). The response is a column
// layout: one timestamp array plus parallel quote arrays in which any entry
// may be null. Rows with a missing or non-positive close are dropped.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::BarProvider;
use crate::types::{Bar, HistoryWindow};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Yahoo uses hyphens for share classes (BRK-B, not BRK.B).
fn normalize_symbol(ticker: &str) -> String {
    ticker.trim().to_uppercase().replace('.', "-")
}

/// Yahoo Finance daily-chart client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// GET /v8/finance/chart/{symbol} for the daily bars between `start` and
    /// `end` (inclusive).
    #[instrument(skip(self), name = "yahoo::get_daily_chart")]
    pub async fn get_daily_chart(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>> {
        let symbol = normalize_symbol(ticker);
        let period1 = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp()).unwrap_or(0);
        let period2 = end.and_hms_opt(23, 59, 59).map(|t| t.and_utc().timestamp()).unwrap_or(0);
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includePrePost=false",
            self.base_url, symbol, period1, period2
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Yahoo chart for {symbol} returned {status}");
        }

        let body: ChartResponse = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {symbol}"))?;

        let bars = parse_chart(body)?;
        debug!(symbol = %symbol, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }
}

#[async_trait]
impl BarProvider for YahooClient {
    async fn fetch_daily_bars(&self, ticker: &str, window: HistoryWindow) -> Result<Vec<Bar>> {
        let end = Utc::now().date_naive();
        self.get_daily_chart(ticker, window.start_date(end), end).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn parse_chart(body: ChartResponse) -> Result<Vec<Bar>> {
    if let Some(err) = body.chart.error {
        anyhow::bail!("Yahoo API error: {} - {}", err.code, err.description);
    }

    // An unknown or delisted symbol comes back with no result rows.
    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        if !close.is_finite() || close <= 0.0 {
            continue;
        }
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|t| t.date_naive()) else {
            warn!(timestamp = ts, "skipping bar with out-of-range timestamp");
            continue;
        };
        let volume = volumes.get(i).copied().flatten().unwrap_or(0);

        // Yahoo occasionally repeats the live session as a second row for
        // the same day; the later row wins.
        if let Some(prev) = bars.last_mut() {
            if prev.date == date {
                *prev = Bar::new(date, close, volume);
                continue;
            }
            if prev.date > date {
                warn!(%date, "skipping out-of-order bar");
                continue;
            }
        }
        bars.push(Bar::new(date, close, volume));
    }

    Ok(bars)
}
