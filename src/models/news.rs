use serde::{Deserialize, Serialize};

/// A headline returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub source: String,
    pub published_at: String,
}

// ============================================================================
// NewsAPI Types
// ============================================================================

/// Raw response from GET /v2/top-headlines
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHeadlinesResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<ApiArticle>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    pub source: ApiSource,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSource {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ApiArticle> for Headline {
    fn from(article: ApiArticle) -> Self {
        Headline {
            title: article.title.unwrap_or_default(),
            description: article.description,
            url: article.url.unwrap_or_default(),
            image: article.url_to_image,
            source: article.source.name.unwrap_or_default(),
            published_at: article.published_at.unwrap_or_default(),
        }
    }
}

/// Sections offered by the top-headlines endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Business => "business",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::General => "general",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
            NewsCategory::Sports => "sports",
            NewsCategory::Technology => "technology",
        }
    }
}

impl std::str::FromStr for NewsCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(NewsCategory::Business),
            "entertainment" => Ok(NewsCategory::Entertainment),
            "general" => Ok(NewsCategory::General),
            "health" => Ok(NewsCategory::Health),
            "science" => Ok(NewsCategory::Science),
            "sports" => Ok(NewsCategory::Sports),
            "technology" => Ok(NewsCategory::Technology),
            _ => Err(format!("Invalid news category: {}", s)),
        }
    }
}

/// Parameters for one upstream headlines page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineQuery {
    pub category: Option<NewsCategory>,
    pub page: u32,
}

impl Default for HeadlineQuery {
    fn default() -> Self {
        Self {
            category: None,
            page: 1,
        }
    }
}
