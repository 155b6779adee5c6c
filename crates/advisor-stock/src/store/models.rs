//! Record types persisted by the store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder persisted for profile fields the provider did not supply
pub const NOT_AVAILABLE: &str = "N/A";

/// One daily OHLCV bar, unique per (symbol, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Company metadata, one row per symbol, fully replaced on each fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockProfile {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    /// Absent when the provider did not report it; rendered as "N/A"
    pub market_cap: Option<f64>,
    /// Trailing P/E; absent when the provider did not report it
    pub pe_ratio: Option<f64>,
}

impl StockProfile {
    /// Market cap for display, substituting the sentinel when absent
    pub fn market_cap_display(&self) -> String {
        display_or_na(self.market_cap)
    }

    /// P/E ratio for display, substituting the sentinel when absent
    pub fn pe_ratio_display(&self) -> String {
        display_or_na(self.pe_ratio)
    }
}

fn display_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// A news article headline and summary tied to a symbol.
///
/// Append-only with no uniqueness key: re-running the news collector
/// accumulates duplicate rows for the same article. Known limitation,
/// kept deliberately until requirements call for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub symbol: String,
    pub title: String,
    pub summary: String,
}

/// Point-in-time view of a symbol's persisted profile and news,
/// assembled fresh for one analysis request and then discarded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// `None` when no profile row exists for the symbol
    pub profile: Option<StockProfile>,
    /// Up to five news items, in insertion order
    pub news: Vec<NewsItem>,
}
