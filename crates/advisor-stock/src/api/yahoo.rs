//! Yahoo Finance market data client
//!
//! Supplies the historical OHLCV series for the price collector. No
//! API key required. Fields the provider omits never reach the store:
//! a failed or partial fetch surfaces as `DataUnavailable` instead.

use crate::error::{AdvisorError, Result};
use crate::store::PriceBar;
use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Fetch daily OHLCV bars for the trailing period (e.g. "1mo").
    ///
    /// Bars are keyed by calendar day; when the provider returns more
    /// than one quote for a day, the last one wins.
    pub async fn get_daily_history(&self, symbol: &str, period: &str) -> Result<Vec<PriceBar>> {
        let end = Utc::now();
        let start = period_start(period, end)?;

        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AdvisorError::unavailable(symbol, e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AdvisorError::unavailable(symbol, format!("Invalid start time: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AdvisorError::unavailable(symbol, format!("Invalid end time: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| AdvisorError::unavailable(symbol, e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| AdvisorError::unavailable(symbol, e.to_string()))?;

        let mut by_date = BTreeMap::new();
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp as i64, 0)
                .unwrap_or_else(Utc::now)
                .date_naive();
            by_date.insert(
                date,
                PriceBar {
                    symbol: symbol.to_string(),
                    date,
                    open: quote.open,
                    high: quote.high,
                    low: quote.low,
                    close: quote.close,
                    volume: quote.volume,
                },
            );
        }

        debug!(
            "Fetched {} daily bars for {symbol} over {period}",
            by_date.len()
        );
        Ok(by_date.into_values().collect())
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a trailing-period string to its start instant
fn period_start(period: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let start = match period {
        "1d" => end - chrono::Duration::days(1),
        "5d" => end - chrono::Duration::days(5),
        "1mo" => end - chrono::Duration::days(30),
        "3mo" => end - chrono::Duration::days(90),
        "6mo" => end - chrono::Duration::days(180),
        "1y" => end - chrono::Duration::days(365),
        "2y" => end - chrono::Duration::days(730),
        "5y" => end - chrono::Duration::days(1825),
        "ytd" => {
            let year = end.year();
            chrono::NaiveDate::from_ymd_opt(year, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
        }
        "max" => end - chrono::Duration::days(36500), // ~100 years
        _ => return Err(AdvisorError::InvalidPeriod(period.to_string())),
    };
    Ok(start)
}
