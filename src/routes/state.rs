use std::sync::Arc;

use crate::{
    db::{ArticleStore, UserStore},
    services::{
        AccountService, ClassificationOptions, GenerativeClassifier, InterestAggregator,
        NewsProvider, RecommendationSelector, TextGenerator,
    },
};

/// Shared handler state; every client is built once in `main` and injected here
#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<dyn ArticleStore>,
    pub accounts: AccountService,
    pub generator: Arc<dyn TextGenerator>,
    pub news: Arc<dyn NewsProvider>,
    pub interests: InterestAggregator,
    pub recommendations: RecommendationSelector,
    /// Used when a recommendations request gives no `limit`
    pub recommendation_limit: usize,
}

/// Inputs for `AppState::new`
pub struct StateOptions {
    pub classification: ClassificationOptions,
    pub recommendation_limit: usize,
    pub password_hash_cost: u32,
}

impl AppState {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        users: Arc<dyn UserStore>,
        generator: Arc<dyn TextGenerator>,
        news: Arc<dyn NewsProvider>,
        options: StateOptions,
    ) -> Self {
        let classifier = Arc::new(GenerativeClassifier::new(generator.clone()));
        let interests =
            InterestAggregator::new(articles.clone(), classifier, options.classification);
        let recommendations = RecommendationSelector::new(interests.clone(), articles.clone());

        Self {
            articles,
            accounts: AccountService::new(users, options.password_hash_cost),
            generator,
            news,
            interests,
            recommendations,
            recommendation_limit: options.recommendation_limit,
        }
    }
}
