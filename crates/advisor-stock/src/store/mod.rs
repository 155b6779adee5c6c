//! Embedded SQLite persistence for price bars, profiles, and news
//!
//! A single-file database local to the process, schema created lazily
//! with `CREATE TABLE IF NOT EXISTS`. Price bars and profiles are keyed
//! so repeated ingestion is idempotent; news rows are append-only and
//! accumulate duplicates across runs (documented limitation).

pub mod models;

pub use models::{NewsItem, PriceBar, Snapshot, StockProfile};

use crate::error::Result;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// News rows included in a snapshot
const SNAPSHOT_NEWS_LIMIT: usize = 5;

type Pool = r2d2::Pool<SqliteConnectionManager>;

/// Handle to the local stock database.
///
/// Cheap to clone; all clones share one connection pool. Writes are
/// transactional per call, so concurrent readers never observe a
/// half-written bar batch.
#[derive(Clone)]
pub struct StockStore {
    pool: Pool,
}

impl StockStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref())
            .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));
        let pool = r2d2::Pool::builder().build(manager)?;
        debug!("Opened stock database at {}", path.as_ref().display());
        Ok(Self { pool })
    }

    /// Create the three tables if absent. Idempotent; safe to call on
    /// every startup.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS price_bars (
                 symbol TEXT NOT NULL,
                 date   TEXT NOT NULL,
                 open   REAL NOT NULL,
                 high   REAL NOT NULL,
                 low    REAL NOT NULL,
                 close  REAL NOT NULL,
                 volume INTEGER NOT NULL,
                 PRIMARY KEY (symbol, date)
             );
             CREATE TABLE IF NOT EXISTS stock_profiles (
                 symbol     TEXT PRIMARY KEY,
                 name       TEXT NOT NULL,
                 sector     TEXT NOT NULL,
                 industry   TEXT NOT NULL,
                 market_cap REAL,
                 pe_ratio   REAL
             );
             CREATE TABLE IF NOT EXISTS news (
                 id      INTEGER PRIMARY KEY AUTOINCREMENT,
                 symbol  TEXT NOT NULL,
                 title   TEXT NOT NULL,
                 summary TEXT NOT NULL
             );",
        )?;
        Ok(())
    }

    /// Insert-or-replace a batch of bars for one symbol in a single
    /// transaction. Re-running with identical bars leaves one row per
    /// (symbol, date); changed values overwrite the same-day bar.
    pub fn upsert_price_bars(&self, symbol: &str, bars: &[PriceBar]) -> Result<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO price_bars (symbol, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for bar in bars {
                stmt.execute(params![
                    symbol,
                    bar.date,
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume,
                ])?;
            }
        }
        tx.commit()?;

        info!("Stored {} price bars for {symbol}", bars.len());
        Ok(())
    }

    /// Insert-or-replace the profile row for its symbol
    pub fn upsert_profile(&self, profile: &StockProfile) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO stock_profiles
                 (symbol, name, sector, industry, market_cap, pe_ratio)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                profile.symbol,
                profile.name,
                profile.sector,
                profile.industry,
                profile.market_cap,
                profile.pe_ratio,
            ],
        )?;

        info!("Stored profile for {}", profile.symbol);
        Ok(())
    }

    /// Append news rows for a symbol. Pure inserts, no uniqueness
    /// check: repeated fetches duplicate rows for the same article.
    pub fn append_news(&self, symbol: &str, articles: &[(String, String)]) -> Result<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO news (symbol, title, summary) VALUES (?1, ?2, ?3)")?;
            for (title, summary) in articles {
                stmt.execute(params![symbol, title, summary])?;
            }
        }
        tx.commit()?;

        info!("Stored {} news items for {symbol}", articles.len());
        Ok(())
    }

    /// Read the profile row for a symbol, if one exists
    pub fn read_profile(&self, symbol: &str) -> Result<Option<StockProfile>> {
        let conn = self.pool.get()?;
        let profile = conn
            .query_row(
                "SELECT symbol, name, sector, industry, market_cap, pe_ratio
                 FROM stock_profiles WHERE symbol = ?1",
                params![symbol],
                |row| {
                    Ok(StockProfile {
                        symbol: row.get(0)?,
                        name: row.get(1)?,
                        sector: row.get(2)?,
                        industry: row.get(3)?,
                        market_cap: row.get(4)?,
                        pe_ratio: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    /// Read the `limit` most recently inserted news rows for a symbol,
    /// returned in insertion order. Ordering uses the explicit `id`
    /// column rather than physical row order.
    pub fn read_recent_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT symbol, title, summary FROM news
             WHERE symbol = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let mut items = stmt
            .query_map(params![symbol, limit as i64], |row| {
                Ok(NewsItem {
                    symbol: row.get(0)?,
                    title: row.get(1)?,
                    summary: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        items.reverse();
        Ok(items)
    }

    /// Read the latest `limit` bars for a symbol, newest first
    pub fn read_price_bars(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT symbol, date, open, high, low, close, volume FROM price_bars
             WHERE symbol = ?1 ORDER BY date DESC LIMIT ?2",
        )?;
        let bars = stmt
            .query_map(params![symbol, limit as i64], |row| {
                Ok(PriceBar {
                    symbol: row.get(0)?,
                    date: row.get(1)?,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    volume: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bars)
    }

    /// Assemble the in-memory view the narrative pipeline consumes:
    /// the profile (absent when never collected) plus up to five
    /// recent news items. Never fails on missing data.
    pub fn load_snapshot(&self, symbol: &str) -> Result<Snapshot> {
        Ok(Snapshot {
            profile: self.read_profile(symbol)?,
            news: self.read_recent_news(symbol, SNAPSHOT_NEWS_LIMIT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn test_store(dir: &tempfile::TempDir) -> StockStore {
        let store = StockStore::open(dir.path().join("stock_data.db")).unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn bar(symbol: &str, date: &str, close: f64) -> PriceBar {
        PriceBar {
            symbol: symbol.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
    }

    #[test]
    fn test_price_bar_upsert_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let bars = vec![bar("AAPL", "2026-08-03", 210.0)];
        store.upsert_price_bars("AAPL", &bars).unwrap();
        store.upsert_price_bars("AAPL", &bars).unwrap();

        let stored = store.read_price_bars("AAPL", 10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], bars[0]);
    }

    #[test]
    fn test_price_bar_upsert_overwrites_same_day() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        store
            .upsert_price_bars("AAPL", &[bar("AAPL", "2026-08-03", 210.0)])
            .unwrap();
        store
            .upsert_price_bars("AAPL", &[bar("AAPL", "2026-08-03", 215.5)])
            .unwrap();

        let stored = store.read_price_bars("AAPL", 10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].close, 215.5);
    }

    #[test]
    fn test_news_append_duplicates_rows() {
        // Current contract: no uniqueness key on news, so re-appending
        // the same article yields two rows. Known limitation.
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let article = vec![("Apple beats".to_string(), "Strong quarter".to_string())];
        store.append_news("AAPL", &article).unwrap();
        store.append_news("AAPL", &article).unwrap();

        let stored = store.read_recent_news("AAPL", 10).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, stored[1].title);
    }

    #[test]
    fn test_snapshot_before_any_collection_is_empty() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let snapshot = store.load_snapshot("XYZ").unwrap();
        assert!(snapshot.profile.is_none());
        assert!(snapshot.news.is_empty());
    }

    #[test]
    fn test_profile_upsert_replaces_row() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let mut profile = StockProfile {
            symbol: "NVDA".to_string(),
            name: "NVIDIA Corporation".to_string(),
            sector: "Technology".to_string(),
            industry: "Semiconductors".to_string(),
            market_cap: Some(3.2e12),
            pe_ratio: Some(55.0),
        };
        store.upsert_profile(&profile).unwrap();

        profile.pe_ratio = Some(60.0);
        store.upsert_profile(&profile).unwrap();

        let stored = store.read_profile("NVDA").unwrap().unwrap();
        assert_eq!(stored.pe_ratio, Some(60.0));
    }

    #[test]
    fn test_profile_with_missing_fields_persists() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let profile = StockProfile {
            symbol: "XYZ".to_string(),
            name: "XYZ Corp".to_string(),
            sector: models::NOT_AVAILABLE.to_string(),
            industry: models::NOT_AVAILABLE.to_string(),
            market_cap: None,
            pe_ratio: None,
        };
        store.upsert_profile(&profile).unwrap();

        let stored = store.read_profile("XYZ").unwrap().unwrap();
        assert_eq!(stored.market_cap, None);
        assert_eq!(stored.market_cap_display(), models::NOT_AVAILABLE);
    }

    #[test]
    fn test_recent_news_limit_and_order() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let articles: Vec<(String, String)> = (1..=7)
            .map(|i| (format!("Title {i}"), format!("Summary {i}")))
            .collect();
        store.append_news("AAPL", &articles).unwrap();

        let recent = store.read_recent_news("AAPL", 5).unwrap();
        assert_eq!(recent.len(), 5);
        // The five most recently inserted, still in insertion order
        assert_eq!(recent[0].title, "Title 3");
        assert_eq!(recent[4].title, "Title 7");
    }

    #[test]
    fn test_concurrent_writes_stay_isolated_by_symbol() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let mut handles = Vec::new();
        for symbol in ["AAPL", "NVDA", "MSFT"] {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for day in 1..=9 {
                    let date = format!("2026-08-0{day}");
                    store
                        .upsert_price_bars(symbol, &[bar(symbol, &date, 100.0 + f64::from(day))])
                        .unwrap();
                    store
                        .append_news(symbol, &[(format!("{symbol} news {day}"), "s".to_string())])
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for symbol in ["AAPL", "NVDA", "MSFT"] {
            let bars = store.read_price_bars(symbol, 20).unwrap();
            assert_eq!(bars.len(), 9);
            assert!(bars.iter().all(|b| b.symbol == symbol));

            let news = store.read_recent_news(symbol, 20).unwrap();
            assert_eq!(news.len(), 9);
            assert!(news.iter().all(|n| n.title.starts_with(symbol)));
        }
    }
}
