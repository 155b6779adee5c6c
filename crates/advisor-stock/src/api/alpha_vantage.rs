//! Alpha Vantage API client
//!
//! Serves the profile collector (`OVERVIEW`) and the news collector
//! (`NEWS_SENTIMENT`). Both endpoints return loosely-typed JSON where
//! any field may be absent, so parsing substitutes sentinels for
//! missing profile scalars and skips malformed feed entries instead
//! of failing the whole call.

use crate::error::{AdvisorError, Result};
use crate::store::{StockProfile, models::NOT_AVAILABLE};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

const BASE_URL: &str = "https://www.alphavantage.co/query";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client with API key and rate limit
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (free tier: 5)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(5).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Fetch company metadata via the OVERVIEW function.
    ///
    /// Individual missing fields become sentinels rather than errors;
    /// only an unreachable provider or an empty payload fails.
    pub async fn get_company_overview(&self, symbol: &str) -> Result<StockProfile> {
        let data = self
            .query(symbol, &[("function", "OVERVIEW"), ("symbol", symbol)])
            .await?;
        parse_overview(symbol, &data)
    }

    /// Fetch up to `max_articles` recent (title, summary) pairs via the
    /// NEWS_SENTIMENT function.
    pub async fn get_news_sentiment(
        &self,
        symbol: &str,
        max_articles: usize,
    ) -> Result<Vec<(String, String)>> {
        let data = self
            .query(symbol, &[("function", "NEWS_SENTIMENT"), ("tickers", symbol)])
            .await?;
        parse_news_feed(symbol, &data, max_articles)
    }

    async fn query(&self, symbol: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let mut params = params.to_vec();
        params.push(("apikey", self.api_key.as_str()));

        debug!("Querying Alpha Vantage for {symbol}");
        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(AdvisorError::unavailable(
                symbol,
                format!("Alpha Vantage HTTP error: {}", response.status()),
            ));
        }

        let data: serde_json::Value = response.json().await?;

        // Check for API error messages
        if let Some(error) = data.get("Error Message") {
            return Err(AdvisorError::unavailable(symbol, error.to_string()));
        }

        if data.get("Note").is_some() || data.get("Information").is_some() {
            return Err(AdvisorError::RateLimited {
                provider: "Alpha Vantage".to_string(),
            });
        }

        Ok(data)
    }
}

/// Parse an OVERVIEW payload into a profile, substituting sentinels
/// for missing fields
fn parse_overview(symbol: &str, data: &serde_json::Value) -> Result<StockProfile> {
    if data.as_object().is_none_or(serde_json::Map::is_empty) {
        return Err(AdvisorError::unavailable(
            symbol,
            "empty company overview payload",
        ));
    }

    Ok(StockProfile {
        symbol: symbol.to_string(),
        name: text_or_na(data, "Name"),
        sector: text_or_na(data, "Sector"),
        industry: text_or_na(data, "Industry"),
        market_cap: numeric_field(data, "MarketCapitalization"),
        pe_ratio: numeric_field(data, "PERatio"),
    })
}

/// Extract the first `max_articles` (title, summary) pairs from a
/// NEWS_SENTIMENT payload. Entries missing either field are skipped
/// with a warning so one malformed article cannot abort the batch.
fn parse_news_feed(
    symbol: &str,
    data: &serde_json::Value,
    max_articles: usize,
) -> Result<Vec<(String, String)>> {
    let feed = data
        .get("feed")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| AdvisorError::unavailable(symbol, "news payload has no feed array"))?;

    let mut articles = Vec::new();
    for entry in feed {
        if articles.len() >= max_articles {
            break;
        }
        match (
            entry.get("title").and_then(serde_json::Value::as_str),
            entry.get("summary").and_then(serde_json::Value::as_str),
        ) {
            (Some(title), Some(summary)) => {
                articles.push((title.to_string(), summary.to_string()));
            }
            _ => warn!("Skipping malformed news entry for {symbol}"),
        }
    }

    Ok(articles)
}

fn text_or_na(data: &serde_json::Value, field: &str) -> String {
    match data.get(field).and_then(serde_json::Value::as_str) {
        Some(s) if !s.is_empty() && s != "None" && s != "-" => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn numeric_field(data: &serde_json::Value, field: &str) -> Option<f64> {
    data.get(field)
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok())
}
