use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod ai;
pub mod articles;
pub mod auth;
pub mod news;
pub mod state;

pub use state::{AppState, StateOptions};

/// Creates the application router with all routes and layers
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
        .route("/news", get(news::headlines))
        .nest("/articles", article_routes())
        .nest("/ai", ai_routes())
}

fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/saved/:user_id", get(articles::list_saved))
        .route("/save", post(articles::save))
        .route("/remove/:id", delete(articles::remove))
        .route("/read/:id", put(articles::mark_read))
}

fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/summarize", post(ai::summarize))
        .route("/sentiment", post(ai::sentiment))
        .route("/interests/:user_id", get(ai::interests))
        .route("/recommendations/:user_id", get(ai::recommendations))
}

async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
