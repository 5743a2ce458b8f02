use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::ArticleFilter,
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{NewArticle, SavedArticle},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub message: String,
    pub article: SavedArticle,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_article_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("Invalid article id: {}", raw)))
}

/// Lists a user's saved articles in store order
pub async fn list_saved(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<SavedArticle>>> {
    let articles = state.articles.find(&ArticleFilter::owned_by(&user_id)).await?;
    Ok(Json(articles))
}

pub async fn save(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(article): Json<NewArticle>,
) -> AppResult<(StatusCode, Json<SavedResponse>)> {
    if article.title.trim().is_empty() || article.user_id.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title and userId are required".to_string(),
        ));
    }

    let article = state.articles.insert(article).await?;

    tracing::info!(
        request_id = %request_id,
        article_id = %article.id,
        user_id = %article.user_id,
        "Article saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            message: "Article saved successfully!".to_string(),
            article,
        }),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_article_id(&id)?;

    if !state.articles.delete(id).await? {
        return Err(AppError::NotFound("Article not found".to_string()));
    }

    tracing::info!(request_id = %request_id, article_id = %id, "Article removed");

    Ok(Json(MessageResponse {
        message: "Article removed".to_string(),
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SavedArticle>> {
    let id = parse_article_id(&id)?;
    let article = state.articles.set_read(id, true).await?;
    Ok(Json(article))
}
