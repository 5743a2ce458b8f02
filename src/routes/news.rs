use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Headline, HeadlineQuery, NewsCategory},
    routes::AppState,
    services::news::search_headlines,
};

#[derive(Debug, Deserialize)]
pub struct NewsParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl NewsParams {
    fn to_query(&self) -> AppResult<HeadlineQuery> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(c) if c.eq_ignore_ascii_case("all") => None,
            Some(c) => Some(c.parse::<NewsCategory>().map_err(AppError::InvalidInput)?),
        };

        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::InvalidInput("page starts at 1".to_string()));
        }

        Ok(HeadlineQuery { category, page })
    }
}

/// Top headlines for the configured country, optionally narrowed by a search term
pub async fn headlines(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> AppResult<Json<Vec<Headline>>> {
    let query = params.to_query()?;
    let headlines = search_headlines(state.news.clone(), &query, params.search.as_deref()).await?;
    Ok(Json(headlines))
}
