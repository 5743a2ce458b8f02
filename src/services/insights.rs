use crate::{
    error::{AppError, AppResult},
    models::Sentiment,
    services::providers::TextGenerator,
};

fn require_content(content: &str) -> AppResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::InvalidInput(
            "Article content cannot be empty".to_string(),
        ));
    }
    Ok(content)
}

/// Condenses article text into a few bullet points
pub async fn summarize(generator: &dyn TextGenerator, content: &str) -> AppResult<String> {
    let content = require_content(content)?;
    let prompt = format!(
        "Summarize this article in 3-5 bullet points:\n\n{}",
        content
    );

    let summary = generator.generate(&prompt).await?;
    Ok(summary.trim().to_string())
}

/// Classifies the overall tone of article text
pub async fn analyze_sentiment(
    generator: &dyn TextGenerator,
    content: &str,
) -> AppResult<Sentiment> {
    let content = require_content(content)?;
    let prompt = format!(
        "Analyze the sentiment of this news article. Reply with one word: Positive, Negative, or Neutral.\n\n{}",
        content
    );

    let reply = generator.generate(&prompt).await?;

    parse_sentiment(&reply).ok_or_else(|| {
        tracing::warn!(reply = %reply, provider = generator.name(), "Unrecognized sentiment reply");
        AppError::ExternalApi(format!("Unrecognized sentiment: {}", reply.trim()))
    })
}

fn parse_sentiment(reply: &str) -> Option<Sentiment> {
    let word = reply
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_lowercase();

    match word.as_str() {
        "positive" => Some(Sentiment::Positive),
        "negative" => Some(Sentiment::Negative),
        "neutral" => Some(Sentiment::Neutral),
        _ => None,
    }
}
