//! Narrative pipeline: snapshot in, analysis prose out
//!
//! Two LLM stages run strictly in sequence: the news summary feeds the
//! full analysis prompt. The pipeline reads its snapshot from the
//! store, never from collector outputs, so analysis can run against
//! whatever was last persisted, even from a prior session.

use crate::config::LlmSettings;
use crate::error::{AdvisorError, Result};
use crate::prompts;
use crate::store::{NewsItem, StockStore};
use advisor_llm::{CompletionRequest, LlmProvider, Message};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// Stage-2 input when the symbol has no stored news. The summarize
/// stage is skipped entirely in that case rather than sent an empty
/// prompt body, which tends to produce degenerate completions.
pub const NO_NEWS_PLACEHOLDER: &str = "No recent news available.";

/// Output of one analysis request
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub symbol: String,
    /// Stage-1 output (or the no-news placeholder)
    pub news_summary: String,
    /// Raw stage-2 completion text; structure is a prompt contract,
    /// not validated here
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// Composes prompts from a stored snapshot and drives the two LLM
/// stages. The provider is injected at construction; there is no
/// hidden process-wide client.
pub struct NarrativePipeline {
    provider: Arc<dyn LlmProvider>,
    store: StockStore,
    settings: LlmSettings,
}

impl NarrativePipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, store: StockStore, settings: LlmSettings) -> Self {
        Self {
            provider,
            store,
            settings,
        }
    }

    /// Analyze a symbol from its persisted snapshot.
    ///
    /// Returns `NotFound` without invoking the LLM when no profile row
    /// exists; callers should surface "no information found" and
    /// prompt for re-collection rather than analyze empty inputs.
    pub async fn analyze_stock(&self, symbol: &str) -> Result<AnalysisResult> {
        let snapshot = self.store.load_snapshot(symbol)?;
        let Some(profile) = snapshot.profile else {
            return Err(AdvisorError::NotFound {
                symbol: symbol.to_string(),
            });
        };

        let news_summary = self.summarize_news(symbol, &snapshot.news).await?;
        let text = self
            .invoke(
                symbol,
                "analyze",
                prompts::analysis_prompt(&profile, &news_summary),
            )
            .await?;

        info!("Generated analysis for {symbol} ({} chars)", text.len());
        Ok(AnalysisResult {
            symbol: symbol.to_string(),
            news_summary,
            text,
            generated_at: Utc::now(),
        })
    }

    /// Stage 1: summarize news and assess overall sentiment.
    ///
    /// Skipped (no LLM call) when the list is empty; the placeholder
    /// text feeds stage 2 instead.
    pub async fn summarize_news(&self, symbol: &str, news: &[NewsItem]) -> Result<String> {
        if news.is_empty() {
            debug!("No stored news for {symbol}; skipping summarize stage");
            return Ok(NO_NEWS_PLACEHOLDER.to_string());
        }

        self.invoke(symbol, "summarize", prompts::summarize_news_prompt(news))
            .await
    }

    /// One blocking LLM call under the configured timeout; expiry is
    /// data-unavailable for that stage, not a hang
    async fn invoke(&self, symbol: &str, stage: &str, prompt: String) -> Result<String> {
        debug!("Invoking LLM {stage} stage for {symbol}");

        let request = CompletionRequest::builder(self.settings.model.as_str())
            .add_message(Message::user(prompt))
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .top_p(self.settings.top_p)
            .build();

        let response = timeout(self.settings.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                AdvisorError::unavailable(
                    symbol,
                    format!(
                        "LLM {stage} stage timed out after {}s",
                        self.settings.timeout.as_secs()
                    ),
                )
            })??;

        Ok(response.message.text().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StockProfile;
    use advisor_llm::{CompletionResponse, LlmError, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Scripted provider that records every prompt it receives
    struct RecordingProvider {
        prompts: Mutex<Vec<String>>,
        reply: String,
        delay: Option<Duration>,
    }

    impl RecordingProvider {
        fn new(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
                delay: None,
            }
        }

        fn with_delay(reply: &str, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(reply)
            }
        }

        fn recorded(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> advisor_llm::Result<CompletionResponse> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let prompt = request
                .messages
                .first()
                .map(|m| m.text().to_string())
                .ok_or_else(|| LlmError::InvalidRequest("empty request".to_string()))?;
            self.prompts.lock().unwrap().push(prompt);

            Ok(CompletionResponse {
                message: Message::assistant(self.reply.clone()),
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn test_store(dir: &tempfile::TempDir) -> StockStore {
        let store = StockStore::open(dir.path().join("stock_data.db")).unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn aapl_profile() -> StockProfile {
        StockProfile {
            symbol: "AAPL".to_string(),
            name: "Apple Inc".to_string(),
            sector: "Technology".to_string(),
            industry: "Consumer Electronics".to_string(),
            market_cap: Some(2.9e12),
            pe_ratio: Some(31.0),
        }
    }

    fn pipeline(
        provider: Arc<RecordingProvider>,
        store: StockStore,
        timeout: Duration,
    ) -> NarrativePipeline {
        let settings = LlmSettings {
            timeout,
            ..LlmSettings::default()
        };
        NarrativePipeline::new(provider, store, settings)
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_found_with_zero_llm_calls() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let provider = Arc::new(RecordingProvider::new("should not run"));
        let pipeline = pipeline(Arc::clone(&provider), store, Duration::from_secs(5));

        let result = pipeline.analyze_stock("XYZ").await;
        assert!(matches!(result, Err(AdvisorError::NotFound { .. })));
        assert!(provider.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_makes_two_ordered_llm_calls() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        store.upsert_profile(&aapl_profile()).unwrap();
        store
            .append_news(
                "AAPL",
                &[
                    ("Record earnings".to_string(), "Revenue up 8%".to_string()),
                    ("New product".to_string(), "Headset refresh".to_string()),
                ],
            )
            .unwrap();

        let provider = Arc::new(RecordingProvider::new("Positive outlook. Recommendation: buy."));
        let pipeline = pipeline(Arc::clone(&provider), store, Duration::from_secs(5));

        let result = pipeline.analyze_stock("AAPL").await.unwrap();
        assert!(!result.text.is_empty());

        // Exactly two calls: summarize first, then analyze
        let recorded = provider.recorded();
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0].contains("Summarize the following news"));
        assert!(recorded[0].contains("Record earnings"));
        assert!(recorded[1].contains("Analyze the following stock"));
        assert!(recorded[1].contains("Apple Inc"));
        // Stage 2 embeds stage 1's output
        assert!(recorded[1].contains("Positive outlook. Recommendation: buy."));
    }

    #[tokio::test]
    async fn test_empty_news_skips_summarize_stage() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        store.upsert_profile(&aapl_profile()).unwrap();

        let provider = Arc::new(RecordingProvider::new("Hold."));
        let pipeline = pipeline(Arc::clone(&provider), store, Duration::from_secs(5));

        let result = pipeline.analyze_stock("AAPL").await.unwrap();
        assert_eq!(result.news_summary, NO_NEWS_PLACEHOLDER);

        let recorded = provider.recorded();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].contains(NO_NEWS_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_stage_timeout_maps_to_data_unavailable() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        store.upsert_profile(&aapl_profile()).unwrap();

        let provider = Arc::new(RecordingProvider::with_delay(
            "too late",
            Duration::from_millis(200),
        ));
        let pipeline = pipeline(Arc::clone(&provider), store, Duration::from_millis(10));

        let result = pipeline.analyze_stock("AAPL").await;
        assert!(matches!(result, Err(AdvisorError::DataUnavailable { .. })));
    }
}
