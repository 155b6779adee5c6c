//! Data collectors: fetch from external providers, write through to
//! the store
//!
//! The three collectors are mutually independent and may run in any
//! order or in parallel; none reads another's output. Each fetches a
//! complete result first and only then persists it, so a provider
//! failure never leaves a partial write behind. The analysis stage
//! later reads back from the store, not from collector return values.

use crate::api::{AlphaVantageClient, YahooFinanceClient};
use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};
use crate::store::{NewsItem, PriceBar, StockProfile, StockStore};
use tracing::{info, warn};

/// Fetches historical OHLCV bars from Yahoo Finance and upserts them
/// by (symbol, date)
pub struct PriceCollector {
    yahoo: YahooFinanceClient,
    store: StockStore,
}

impl PriceCollector {
    pub fn new(store: StockStore) -> Self {
        Self {
            yahoo: YahooFinanceClient::new(),
            store,
        }
    }

    /// Collect daily bars for the trailing period (e.g. "1mo").
    ///
    /// The store write happens only after a complete, successful
    /// fetch; provider failure surfaces as `DataUnavailable` with no
    /// partial write.
    pub async fn collect(&self, symbol: &str, period: &str) -> Result<Vec<PriceBar>> {
        let bars = self.yahoo.get_daily_history(symbol, period).await?;
        if bars.is_empty() {
            return Err(AdvisorError::unavailable(
                symbol,
                format!("no price bars returned for period {period}"),
            ));
        }

        self.store.upsert_price_bars(symbol, &bars)?;
        Ok(bars)
    }
}

/// Fetches company metadata from Alpha Vantage and replaces the
/// profile row for the symbol
pub struct ProfileCollector {
    alpha: AlphaVantageClient,
    store: StockStore,
}

impl ProfileCollector {
    pub fn new(alpha: AlphaVantageClient, store: StockStore) -> Self {
        Self { alpha, store }
    }

    /// Collect and persist the profile. Missing individual fields are
    /// stored with sentinels; partial data is acceptable.
    pub async fn collect(&self, symbol: &str) -> Result<StockProfile> {
        let profile = self.alpha.get_company_overview(symbol).await?;
        self.store.upsert_profile(&profile)?;
        Ok(profile)
    }
}

/// Fetches recent news from Alpha Vantage and appends title/summary
/// pairs to the store
pub struct NewsCollector {
    alpha: AlphaVantageClient,
    store: StockStore,
    max_articles: usize,
}

impl NewsCollector {
    pub fn new(alpha: AlphaVantageClient, store: StockStore, max_articles: usize) -> Self {
        Self {
            alpha,
            store,
            max_articles,
        }
    }

    /// Collect up to `max_articles` recent articles. Appends are not
    /// idempotent: re-running duplicates rows for the same article.
    pub async fn collect(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        let articles = self
            .alpha
            .get_news_sentiment(symbol, self.max_articles)
            .await?;
        self.store.append_news(symbol, &articles)?;

        Ok(articles
            .into_iter()
            .map(|(title, summary)| NewsItem {
                symbol: symbol.to_string(),
                title,
                summary,
            })
            .collect())
    }
}

/// Per-collector outcomes of one collection pass. Failures are carried
/// per source so the caller can degrade to a partial view instead of
/// aborting everything.
pub struct CollectionReport {
    /// Number of price bars persisted
    pub prices: Result<usize>,
    /// The persisted profile
    pub profile: Result<StockProfile>,
    /// Number of news items persisted
    pub news: Result<usize>,
}

impl CollectionReport {
    /// True when every collector succeeded
    pub fn fully_successful(&self) -> bool {
        self.prices.is_ok() && self.profile.is_ok() && self.news.is_ok()
    }
}

/// The three collectors wired to one store, run together per symbol
pub struct Collectors {
    price: PriceCollector,
    profile: ProfileCollector,
    news: NewsCollector,
    default_period: String,
}

impl Collectors {
    /// Build collectors from configuration. Requires an Alpha Vantage
    /// API key; the Yahoo price collector needs no credentials.
    pub fn from_config(config: &AdvisorConfig, store: StockStore) -> Result<Self> {
        let api_key = config.require_alpha_vantage_key()?;
        let alpha = AlphaVantageClient::new(api_key, config.alpha_vantage_rate_limit);

        Ok(Self {
            price: PriceCollector::new(store.clone()),
            profile: ProfileCollector::new(alpha.clone(), store.clone()),
            news: NewsCollector::new(alpha, store, config.max_news_articles),
            default_period: config.default_period.clone(),
        })
    }

    /// Run all three collectors concurrently for one symbol. Each
    /// outcome is reported independently; a failing collector does not
    /// abort its siblings.
    pub async fn collect_all(&self, symbol: &str, period: Option<&str>) -> CollectionReport {
        let period = period.unwrap_or(&self.default_period);

        let (prices, profile, news) = tokio::join!(
            self.price.collect(symbol, period),
            self.profile.collect(symbol),
            self.news.collect(symbol),
        );

        match &prices {
            Ok(bars) => info!("Collected {} price bars for {symbol}", bars.len()),
            Err(e) => warn!("Price collection failed for {symbol}: {e}"),
        }
        match &profile {
            Ok(p) => info!("Collected profile for {symbol} ({})", p.name),
            Err(e) => warn!("Profile collection failed for {symbol}: {e}"),
        }
        match &news {
            Ok(items) => info!("Collected {} news items for {symbol}", items.len()),
            Err(e) => warn!("News collection failed for {symbol}: {e}"),
        }

        CollectionReport {
            prices: prices.map(|bars| bars.len()),
            profile,
            news: news.map(|items| items.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdvisorConfig;
    use tempfile::tempdir;

    #[test]
    fn test_from_config_requires_api_key() {
        let dir = tempdir().unwrap();
        let store = StockStore::open(dir.path().join("stock_data.db")).unwrap();
        let config = AdvisorConfig::default();

        assert!(matches!(
            Collectors::from_config(&config, store),
            Err(AdvisorError::Config(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_collect_all_end_to_end() {
        let dir = tempdir().unwrap();
        let store = StockStore::open(dir.path().join("stock_data.db")).unwrap();
        store.ensure_schema().unwrap();

        let config = AdvisorConfig::builder().with_env_api_key().build().unwrap();
        let collectors = Collectors::from_config(&config, store.clone()).unwrap();

        let report = collectors.collect_all("AAPL", None).await;
        assert!(report.prices.unwrap() >= 1);
        assert_ne!(
            report.profile.unwrap().name,
            crate::store::models::NOT_AVAILABLE
        );

        let snapshot = store.load_snapshot("AAPL").unwrap();
        assert!(snapshot.profile.is_some());
    }
}
