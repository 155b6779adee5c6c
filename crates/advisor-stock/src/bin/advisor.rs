//! Stock advisor CLI
//!
//! Thin driver over the core crate, standing in for the UI layer:
//! ensures the schema, runs the collectors, then prints the stored
//! snapshot and the LLM analysis.
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY="..."
//! export NVIDIA_API_KEY="nvapi-..."
//!
//! cargo run --bin advisor -p advisor-stock -- analyze NVDA
//! cargo run --bin advisor -p advisor-stock -- history NVDA --limit 5
//! ```

use advisor_llm::OpenAiCompatProvider;
use advisor_stock::{AdvisorConfig, AdvisorError, Collectors, NarrativePipeline, StockStore, util};
use clap::{Parser, Subcommand};
use std::env;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "advisor", about = "AI-assisted single-stock analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect fresh data for a symbol and produce an LLM analysis
    Analyze {
        /// Ticker symbol, e.g. NVDA
        symbol: String,

        /// Trailing price-history period (1d, 5d, 1mo, 3mo, 6mo, 1y, ...)
        #[arg(long, default_value = "1mo")]
        period: String,
    },

    /// Print the latest stored price bars for a symbol
    History {
        /// Ticker symbol, e.g. NVDA
        symbol: String,

        /// Number of bars to print, newest first
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,advisor_stock=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let config = AdvisorConfig::builder().with_env_api_key().build()?;
    let store = StockStore::open(&config.db_path)?;
    store.ensure_schema()?;

    match cli.command {
        Command::Analyze { symbol, period } => {
            let symbol = symbol.to_uppercase();

            let collectors = Collectors::from_config(&config, store.clone())?;
            let report = collectors.collect_all(&symbol, Some(&period)).await;
            if !report.fully_successful() {
                eprintln!("Warning: some data sources failed; proceeding with stored data.");
            }

            let snapshot = store.load_snapshot(&symbol)?;
            if let Some(profile) = &snapshot.profile {
                println!("Name: {}", profile.name);
                println!("Sector: {}", profile.sector);
                println!("Industry: {}", profile.industry);
                println!("Market cap: {}", profile.market_cap_display());
                println!("P/E ratio: {}", profile.pe_ratio_display());
                println!();
            }

            if !snapshot.news.is_empty() {
                println!("Recent news:");
                for item in &snapshot.news {
                    println!("  {}", item.title);
                }
                println!();
            }

            let provider = Arc::new(OpenAiCompatProvider::from_env()?);
            let pipeline = NarrativePipeline::new(provider, store, config.llm.clone());

            match pipeline.analyze_stock(&symbol).await {
                Ok(analysis) => println!("{}", util::strip_markdown_links(&analysis.text)),
                Err(AdvisorError::NotFound { symbol }) => {
                    eprintln!("No information found for {symbol}.");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::History { symbol, limit } => {
            let symbol = symbol.to_uppercase();
            let bars = store.read_price_bars(&symbol, limit)?;
            if bars.is_empty() {
                eprintln!("No stored price bars for {symbol}. Run `advisor analyze {symbol}` first.");
                std::process::exit(1);
            }
            for bar in bars {
                println!(
                    "{}  open {:.2}  high {:.2}  low {:.2}  close {:.2}  volume {}",
                    bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
                );
            }
        }
    }

    Ok(())
}
