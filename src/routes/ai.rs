use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        ContentRequest, InterestEntry, RecommendationsResponse, SentimentResponse,
        SummaryResponse,
    },
    routes::AppState,
    services::insights,
};

const MAX_RECOMMENDATIONS: usize = 100;

/// Kept as text so a malformed `limit` gets the JSON error body
#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<String>,
}

fn resolve_limit(raw: Option<&str>, default: usize) -> AppResult<usize> {
    let limit = match raw.map(str::trim) {
        None | Some("") => default,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid limit: {}", raw)))?,
    };

    if limit == 0 || limit > MAX_RECOMMENDATIONS {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_RECOMMENDATIONS
        )));
    }
    Ok(limit)
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> AppResult<Json<SummaryResponse>> {
    let summary = insights::summarize(state.generator.as_ref(), &request.content).await?;
    Ok(Json(SummaryResponse { summary }))
}

pub async fn sentiment(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> AppResult<Json<SentimentResponse>> {
    let sentiment =
        insights::analyze_sentiment(state.generator.as_ref(), &request.content).await?;
    Ok(Json(SentimentResponse { sentiment }))
}

/// Interest distribution over the user's saved articles
pub async fn interests(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<InterestEntry>>> {
    tracing::debug!(request_id = %request_id, user_id = %user_id, "Computing interests");

    let interests = state.interests.compute_interests(&user_id).await?;
    Ok(Json(interests))
}

pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let limit = resolve_limit(params.limit.as_deref(), state.recommendation_limit)?;

    tracing::debug!(request_id = %request_id, user_id = %user_id, limit, "Computing recommendations");

    let response = state
        .recommendations
        .compute_recommendations(&user_id, limit)
        .await?;
    Ok(Json(response))
}
