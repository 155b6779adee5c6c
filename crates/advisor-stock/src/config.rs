//! Configuration for the stock advisor

use crate::error::{AdvisorError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// LLM invocation settings: model identity and sampling parameters are
/// configuration, not per-call state.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Model identifier passed to the provider
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling parameter
    pub top_p: f32,

    /// Maximum tokens per completion
    pub max_tokens: usize,

    /// Per-stage timeout; expiry is treated as data-unavailable
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "meta/llama3-70b-instruct".to_string(),
            temperature: 0.5,
            top_p: 1.0,
            max_tokens: 1024,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Configuration for collectors, store, and pipeline
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Path of the embedded database file (relative to the process
    /// working directory by default)
    pub db_path: PathBuf,

    /// Alpha Vantage API key (required by profile and news collectors)
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,

    /// Maximum news articles fetched and stored per collection
    pub max_news_articles: usize,

    /// Default trailing period for price history
    pub default_period: String,

    /// LLM settings for the narrative pipeline
    pub llm: LlmSettings,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("stock_data.db"),
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5,
            max_news_articles: 5,
            default_period: "1mo".to_string(),
            llm: LlmSettings::default(),
        }
    }
}

impl AdvisorConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_news_articles == 0 {
            return Err(AdvisorError::Config(
                "max_news_articles must be at least 1".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(AdvisorError::Config(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The Alpha Vantage key, or a configuration error naming the
    /// collectors that need it
    pub fn require_alpha_vantage_key(&self) -> Result<&str> {
        self.alpha_vantage_api_key.as_deref().ok_or_else(|| {
            AdvisorError::Config(
                "Alpha Vantage API key required for profile and news collectors".to_string(),
            )
        })
    }
}

/// Builder for AdvisorConfig
#[derive(Debug, Default)]
pub struct AdvisorConfigBuilder {
    db_path: Option<PathBuf>,
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
    max_news_articles: Option<usize>,
    default_period: Option<String>,
    llm: Option<LlmSettings>,
}

impl AdvisorConfigBuilder {
    /// Set the database file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Set the Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Load the Alpha Vantage API key from the environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Set the Alpha Vantage rate limit (requests per minute)
    pub fn alpha_vantage_rate_limit(mut self, limit: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(limit);
        self
    }

    /// Set the maximum news articles per collection
    pub fn max_news_articles(mut self, max: usize) -> Self {
        self.max_news_articles = Some(max);
        self
    }

    /// Set the default trailing period for price history
    pub fn default_period(mut self, period: impl Into<String>) -> Self {
        self.default_period = Some(period.into());
        self
    }

    /// Set the LLM settings
    pub fn llm(mut self, settings: LlmSettings) -> Self {
        self.llm = Some(settings);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AdvisorConfig> {
        let defaults = AdvisorConfig::default();

        let config = AdvisorConfig {
            db_path: self.db_path.unwrap_or(defaults.db_path),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
            max_news_articles: self.max_news_articles.unwrap_or(defaults.max_news_articles),
            default_period: self.default_period.unwrap_or(defaults.default_period),
            llm: self.llm.unwrap_or(defaults.llm),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.db_path, PathBuf::from("stock_data.db"));
        assert_eq!(config.max_news_articles, 5);
        assert_eq!(config.llm.model, "meta/llama3-70b-instruct");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AdvisorConfig::builder()
            .db_path("/tmp/test.db")
            .alpha_vantage_api_key("demo")
            .max_news_articles(3)
            .default_period("3mo")
            .build()
            .unwrap();

        assert_eq!(config.max_news_articles, 3);
        assert_eq!(config.default_period, "3mo");
        assert_eq!(config.require_alpha_vantage_key().unwrap(), "demo");
    }

    #[test]
    fn test_validation_rejects_zero_articles() {
        let result = AdvisorConfig::builder().max_news_articles(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        let config = AdvisorConfig::default();
        assert!(matches!(
            config.require_alpha_vantage_key(),
            Err(AdvisorError::Config(_))
        ));
    }
}
