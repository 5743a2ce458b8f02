/// Upstream service abstractions
///
/// The generative-language model and the headline source are reached through
/// these traits so handlers and services never depend on a concrete vendor.
use crate::{
    error::AppResult,
    models::{Headline, HeadlineQuery},
};

pub mod gemini;
pub mod newsapi;

pub use gemini::GeminiProvider;
pub use newsapi::NewsApiProvider;

/// Text-completion backend
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends a single prompt and returns the model's text reply
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Headline source
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetches one page of top headlines
    async fn top_headlines(&self, query: &HeadlineQuery) -> AppResult<Vec<Headline>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
