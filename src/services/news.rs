use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Headline, HeadlineQuery},
    services::providers::NewsProvider,
};

/// Fetches a headlines page and narrows it to a search term
///
/// Delegates the fetch to the configured NewsProvider; the search runs over
/// the (possibly cached) page so it never costs an upstream call.
pub async fn search_headlines(
    provider: Arc<dyn NewsProvider>,
    query: &HeadlineQuery,
    search: Option<&str>,
) -> AppResult<Vec<Headline>> {
    let headlines = provider.top_headlines(query).await?;

    match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => Ok(filter_headlines(headlines, term)),
        None => Ok(headlines),
    }
}

/// Keeps headlines whose title, description or source contains `term`, ignoring case
pub fn filter_headlines(headlines: Vec<Headline>, term: &str) -> Vec<Headline> {
    let needle = term.to_lowercase();
    headlines
        .into_iter()
        .filter(|h| {
            h.title.to_lowercase().contains(&needle)
                || h.description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false)
                || h.source.to_lowercase().contains(&needle)
        })
        .collect()
}
