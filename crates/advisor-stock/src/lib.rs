//! On-demand, LLM-backed analysis of a single stock symbol
//!
//! This crate gathers heterogeneous, partially-failing data sources
//! into a consistent local snapshot and turns it into an investment
//! narrative:
//!
//! - Data collectors fetch price history (Yahoo Finance), company
//!   metadata and recent news (Alpha Vantage) and write through to an
//!   embedded SQLite store
//! - The snapshot reader loads the persisted profile and news back
//!   into memory, decoupling the read path from collection
//! - The narrative pipeline composes a two-stage prompt chain (news
//!   summary, then full analysis) against an injected LLM provider
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_llm::OpenAiCompatProvider;
//! use advisor_stock::{AdvisorConfig, Collectors, NarrativePipeline, StockStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AdvisorConfig::builder().with_env_api_key().build()?;
//!     let store = StockStore::open(&config.db_path)?;
//!     store.ensure_schema()?;
//!
//!     let collectors = Collectors::from_config(&config, store.clone())?;
//!     collectors.collect_all("NVDA", None).await;
//!
//!     let provider = Arc::new(OpenAiCompatProvider::from_env()?);
//!     let pipeline = NarrativePipeline::new(provider, store, config.llm.clone());
//!     let analysis = pipeline.analyze_stock("NVDA").await?;
//!     println!("{}", analysis.text);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod collect;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod util;

// Re-export main types for convenience
pub use collect::{CollectionReport, Collectors, NewsCollector, PriceCollector, ProfileCollector};
pub use config::{AdvisorConfig, LlmSettings};
pub use error::{AdvisorError, Result};
pub use pipeline::{AnalysisResult, NarrativePipeline};
pub use store::{NewsItem, PriceBar, Snapshot, StockProfile, StockStore};
