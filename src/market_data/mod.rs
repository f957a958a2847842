pub mod yahoo;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Bar, HistoryWindow};

pub use yahoo::YahooClient;

/// Source of daily bars for a ticker.
///
/// Implementations return bars in chronological order covering `window`
/// up to today. An empty vector means the ticker has no data.
#[async_trait]
pub trait BarProvider: Send + Sync {
    async fn fetch_daily_bars(&self, ticker: &str, window: HistoryWindow) -> Result<Vec<Bar>>;
}
