//! Error types for stock advisor operations

use thiserror::Error;

/// Stock advisor specific errors
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A provider could not be reached or returned unusable data.
    /// Recoverable: the caller may proceed with partial data or abort.
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// No persisted profile exists for the requested symbol.
    /// Recoverable by re-running the collectors.
    #[error("No information found for {symbol}")]
    NotFound { symbol: String },

    /// Rate limit exceeded for a data provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    /// Unsupported trailing-period string (e.g. "7w")
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Local persistence failure. Fatal for the current request.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Connection pool failure. Fatal for the current request.
    #[error("Store connection error: {0}")]
    Pool(#[from] r2d2::Error),

    /// LLM invocation error
    #[error("LLM error: {0}")]
    Llm(#[from] advisor_llm::LlmError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for stock advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

impl AdvisorError {
    /// Build a `DataUnavailable` error for a symbol
    pub fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdvisorError::NotFound {
            symbol: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "No information found for XYZ");

        let err = AdvisorError::unavailable("AAPL", "provider timeout");
        assert_eq!(
            err.to_string(),
            "Data not available for AAPL: provider timeout"
        );
    }
}
