use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use news_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, PgArticleStore, PgUserStore},
    routes::{create_router, AppState, StateOptions},
    services::{ClassificationOptions, GeminiProvider, NewsApiProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_handle) = Cache::connect(redis_client).await?;

    let generator = Arc::new(GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));
    let news = Arc::new(NewsApiProvider::new(
        cache,
        config.news_api_key.clone(),
        config.news_api_url.clone(),
        config.news_country.clone(),
    ));

    let state = AppState::new(
        Arc::new(PgArticleStore::new(pool.clone())),
        Arc::new(PgUserStore::new(pool)),
        generator,
        news,
        StateOptions {
            classification: ClassificationOptions {
                concurrency: config.classifier_concurrency,
                timeout: config.classifier_timeout(),
            },
            recommendation_limit: config.recommendation_limit,
            password_hash_cost: config.password_hash_cost,
        },
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
