//! Prompt templates for the narrative pipeline
//!
//! Pure string templating over structured inputs, so prompt content is
//! unit-testable without invoking the LLM. Two templates, one per
//! pipeline stage.

use crate::store::{NewsItem, StockProfile};
use std::fmt::Write;

/// Stage-1 prompt: summarize a batch of news articles and assess their
/// overall sentiment
pub fn summarize_news_prompt(news: &[NewsItem]) -> String {
    let mut body = String::new();
    for item in news {
        let _ = writeln!(body, "Title: {}", item.title);
        let _ = writeln!(body, "Summary: {}", item.summary);
    }

    format!(
        "Summarize the following news and provide an overall sentiment analysis:\n\
         {body}\n\
         Summary and analysis:"
    )
}

/// Stage-2 prompt: full analysis from profile fields plus the stage-1
/// news summary
pub fn analysis_prompt(profile: &StockProfile, news_summary: &str) -> String {
    format!(
        "Analyze the following stock based on the information provided:\n\
         \n\
         Name: {name}\n\
         Sector: {sector}\n\
         Industry: {industry}\n\
         Market cap: {market_cap}\n\
         P/E ratio: {pe_ratio}\n\
         \n\
         Recent news summary:\n\
         {news_summary}\n\
         \n\
         Provide a detailed analysis of the stock, including:\n\
         1. An overall evaluation of the company and its market position.\n\
         2. Potential risks and opportunities based on recent news.\n\
         3. An investment recommendation (buy, hold, sell) with justification.\n\
         \n\
         Analysis:",
        name = profile.name,
        sector = profile.sector,
        industry = profile.industry,
        market_cap = profile.market_cap_display(),
        pe_ratio = profile.pe_ratio_display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NOT_AVAILABLE;

    fn news(title: &str, summary: &str) -> NewsItem {
        NewsItem {
            symbol: "NVDA".to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_summarize_prompt_lists_all_articles() {
        let prompt = summarize_news_prompt(&[
            news("Record quarter", "Data center revenue doubled"),
            news("New chip", "Next-gen GPU announced"),
        ]);

        assert!(prompt.contains("Title: Record quarter"));
        assert!(prompt.contains("Summary: Data center revenue doubled"));
        assert!(prompt.contains("Title: New chip"));
        assert!(prompt.ends_with("Summary and analysis:"));
    }

    #[test]
    fn test_analysis_prompt_embeds_profile_and_summary() {
        let profile = StockProfile {
            symbol: "NVDA".to_string(),
            name: "NVIDIA Corporation".to_string(),
            sector: "Technology".to_string(),
            industry: "Semiconductors".to_string(),
            market_cap: Some(3.2e12),
            pe_ratio: None,
        };

        let prompt = analysis_prompt(&profile, "Sentiment is broadly positive.");
        assert!(prompt.contains("Name: NVIDIA Corporation"));
        assert!(prompt.contains("Sector: Technology"));
        assert!(prompt.contains(&format!("P/E ratio: {NOT_AVAILABLE}")));
        assert!(prompt.contains("Sentiment is broadly positive."));
        assert!(prompt.contains("buy, hold, sell"));
    }
}
