/// NewsAPI provider
///
/// Proxies /v2/top-headlines for one configured country. Responses are cached
/// in Redis per (country, category, page) so repeated page loads from many
/// clients cost a single upstream call.
use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiHeadlinesResponse, Headline, HeadlineQuery},
    services::providers::NewsProvider,
};

const HEADLINES_CACHE_TTL: u64 = 900; // 15 minutes
const PAGE_SIZE: u32 = 20;
/// Title NewsAPI substitutes for articles pulled by the publisher
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Clone)]
pub struct NewsApiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    country: String,
    cache: Cache,
}

impl NewsApiProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, country: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            country,
            cache,
        }
    }

    async fn fetch_upstream(&self, query: &HeadlineQuery) -> AppResult<Vec<Headline>> {
        let url = format!("{}/v2/top-headlines", self.api_url.trim_end_matches('/'));

        let mut params = vec![
            ("country", self.country.clone()),
            ("page", query.page.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
        ];
        if let Some(category) = query.category {
            params.push(("category", category.as_str().to_string()));
        }

        let response = self
            .http_client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "NewsAPI returned status {}: {}",
                status, body
            )));
        }

        let body: ApiHeadlinesResponse = response.json().await?;
        let headlines = into_headlines(body)?;

        tracing::info!(
            country = %self.country,
            category = ?query.category,
            page = query.page,
            results = headlines.len(),
            provider = "newsapi",
            "Headlines fetched"
        );

        Ok(headlines)
    }
}

/// Converts an upstream payload, dropping withdrawn articles
fn into_headlines(body: ApiHeadlinesResponse) -> AppResult<Vec<Headline>> {
    if body.status != "ok" {
        return Err(AppError::ExternalApi(
            body.message
                .unwrap_or_else(|| format!("NewsAPI returned status {}", body.status)),
        ));
    }

    Ok(body
        .articles
        .into_iter()
        .map(Headline::from)
        .filter(|h| !h.title.is_empty() && h.title != REMOVED_MARKER)
        .collect())
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiProvider {
    async fn top_headlines(&self, query: &HeadlineQuery) -> AppResult<Vec<Headline>> {
        let key = CacheKey::Headlines {
            country: self.country.clone(),
            category: query.category.map(|c| c.as_str().to_string()),
            page: query.page,
        };

        cached!(self.cache, key, HEADLINES_CACHE_TTL, async {
            self.fetch_upstream(query).await
        })
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}
