use std::sync::Arc;

use crate::{
    db::{ArticleFilter, ArticleStore},
    error::AppResult,
    models::RecommendationsResponse,
    services::interests::{tally_interests, top_categories, InterestAggregator},
};

/// Number of leading interest categories used to pick recommendations
pub const TOP_INTEREST_COUNT: usize = 3;

/// Recommendation count when the caller does not ask for one
pub const DEFAULT_LIMIT: usize = 10;

/// Recommends other users' saved articles in a user's leading categories
#[derive(Clone)]
pub struct RecommendationSelector {
    aggregator: InterestAggregator,
    store: Arc<dyn ArticleStore>,
}

impl RecommendationSelector {
    pub fn new(aggregator: InterestAggregator, store: Arc<dyn ArticleStore>) -> Self {
        Self { aggregator, store }
    }

    /// Full interest distribution plus up to `limit` recommendations, newest first
    ///
    /// Articles owned by `user_id` are never recommended back to them.
    pub async fn compute_recommendations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AppResult<RecommendationsResponse> {
        let articles = self.aggregator.load_categorized(user_id).await?;
        if articles.is_empty() {
            return Ok(RecommendationsResponse::default());
        }

        let interests = tally_interests(&articles);
        let top = top_categories(&interests, TOP_INTEREST_COUNT);

        tracing::debug!(user_id = %user_id, top = ?top, limit, "Selecting recommendations");

        let filter = ArticleFilter::not_owned_by(user_id)
            .in_categories(top)
            .newest_first()
            .limit(limit);
        let recommendations = self.store.find(&filter).await?;

        tracing::info!(
            user_id = %user_id,
            interests = interests.len(),
            recommendations = recommendations.len(),
            "Recommendations computed"
        );

        Ok(RecommendationsResponse {
            interests,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryArticleStore,
        models::{Category, SavedArticle},
        services::interests::{
            tests::{saved, ScriptedClassifier},
            ClassificationOptions,
        },
    };

    fn dated(user_id: &str, title: &str, category: Category, date: &str) -> SavedArticle {
        SavedArticle {
            date: date.to_string(),
            ..saved(user_id, title, Some(category))
        }
    }

    fn selector(articles: Vec<SavedArticle>, classifier: ScriptedClassifier) -> RecommendationSelector {
        let store = Arc::new(MemoryArticleStore::with_articles(articles));
        let aggregator = InterestAggregator::new(
            store.clone(),
            Arc::new(classifier),
            ClassificationOptions::default(),
        );
        RecommendationSelector::new(aggregator, store)
    }

    #[tokio::test]
    async fn test_user_without_articles_gets_empty_response() {
        let others = vec![dated("bob", "x", Category::Science, "2024-01-01")];
        let selector = selector(others, ScriptedClassifier::default());

        let response = selector
            .compute_recommendations("alice", DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(response, RecommendationsResponse::default());
    }

    #[tokio::test]
    async fn test_excludes_own_articles_and_orders_by_date() {
        let articles = vec![
            dated("alice", "mine", Category::Science, "2024-09-01"),
            dated("bob", "old", Category::Science, "2024-01-01"),
            dated("carol", "new", Category::Science, "2024-06-01"),
            dated("bob", "off-topic", Category::Sports, "2024-12-01"),
        ];
        let selector = selector(articles, ScriptedClassifier::default());

        let response = selector
            .compute_recommendations("alice", DEFAULT_LIMIT)
            .await
            .unwrap();

        let titles: Vec<&str> = response
            .recommendations
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
        assert!(response
            .recommendations
            .iter()
            .all(|a| a.user_id != "alice"));
    }

    #[tokio::test]
    async fn test_only_top_three_categories_drive_selection() {
        let articles = vec![
            dated("alice", "t1", Category::Technology, "2024-01-01"),
            dated("alice", "t2", Category::Technology, "2024-01-01"),
            dated("alice", "b1", Category::Business, "2024-01-01"),
            dated("alice", "b2", Category::Business, "2024-01-01"),
            dated("alice", "s1", Category::Science, "2024-01-01"),
            dated("alice", "h1", Category::Health, "2024-01-01"),
            dated("bob", "health pick", Category::Health, "2024-05-01"),
            dated("bob", "science pick", Category::Science, "2024-04-01"),
        ];
        let selector = selector(articles, ScriptedClassifier::default());

        let response = selector
            .compute_recommendations("alice", DEFAULT_LIMIT)
            .await
            .unwrap();

        // Health ties Science on count but appeared later, so it is fourth
        assert_eq!(response.interests.len(), 4);
        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.recommendations[0].title, "science pick");
    }

    #[tokio::test]
    async fn test_limit_caps_results() {
        let mut articles = vec![dated("alice", "mine", Category::Sports, "2024-01-01")];
        for day in 10..25 {
            articles.push(dated(
                "bob",
                &format!("match {}", day),
                Category::Sports,
                &format!("2024-03-{}", day),
            ));
        }
        let selector = selector(articles, ScriptedClassifier::default());

        let response = selector.compute_recommendations("alice", 5).await.unwrap();

        let dates: Vec<&str> = response
            .recommendations
            .iter()
            .map(|a| a.date.as_str())
            .collect();
        assert_eq!(
            dates,
            vec!["2024-03-24", "2024-03-23", "2024-03-22", "2024-03-21", "2024-03-20"]
        );
    }

    #[tokio::test]
    async fn test_classifies_before_selecting() {
        let articles = vec![
            saved("alice", "Parliament vote", None),
            dated("bob", "Senate recap", Category::Politics, "2024-02-02"),
        ];
        let classifier = ScriptedClassifier::default().reply("Parliament vote", Category::Politics);
        let selector = selector(articles, classifier);

        let response = selector
            .compute_recommendations("alice", DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(response.interests[0].category_name, Category::Politics);
        assert_eq!(response.recommendations[0].title, "Senate recap");
    }
}
