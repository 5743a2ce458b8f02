use std::{sync::Arc, time::Duration};

use futures::{stream, StreamExt, TryStreamExt};

use crate::{
    db::{ArticleFilter, ArticleStore},
    error::{AppError, AppResult},
    models::{Category, InterestEntry, SavedArticle},
    services::classifier::{ClassificationError, Classifier},
};

/// Limits applied to classification work within one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationOptions {
    /// Classifier calls in flight at once
    pub concurrency: usize,
    /// Upper bound on a single classifier call
    pub timeout: Duration,
}

impl Default for ClassificationOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Computes a user's interest distribution from their saved articles
///
/// Articles without a category are classified on the way through and the
/// label is written back, so later requests skip them.
#[derive(Clone)]
pub struct InterestAggregator {
    store: Arc<dyn ArticleStore>,
    classifier: Arc<dyn Classifier>,
    options: ClassificationOptions,
}

impl InterestAggregator {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        classifier: Arc<dyn Classifier>,
        options: ClassificationOptions,
    ) -> Self {
        Self {
            store,
            classifier,
            options,
        }
    }

    /// Interest entries for `user_id`, most saved category first
    pub async fn compute_interests(&self, user_id: &str) -> AppResult<Vec<InterestEntry>> {
        let articles = self.load_categorized(user_id).await?;
        Ok(tally_interests(&articles))
    }

    /// Loads the user's articles and labels every uncategorized one
    ///
    /// All category writes have completed when this returns. A store failure
    /// aborts the whole load, except for an article deleted mid-request, which
    /// keeps its new label locally. A classifier failure only affects its article.
    pub async fn load_categorized(&self, user_id: &str) -> AppResult<Vec<SavedArticle>> {
        let mut articles = self.store.find(&ArticleFilter::owned_by(user_id)).await?;

        let pending: Vec<usize> = articles
            .iter()
            .enumerate()
            .filter(|(_, article)| article.category.is_none())
            .map(|(idx, _)| idx)
            .collect();

        if pending.is_empty() {
            return Ok(articles);
        }

        tracing::info!(
            user_id = %user_id,
            total = articles.len(),
            uncategorized = pending.len(),
            "Classifying saved articles"
        );

        let labelled: Vec<(usize, Category)> = {
            let articles = &articles;
            stream::iter(pending)
                .map(|idx| async move {
                    let article = &articles[idx];
                    let category = self.classify_or_fallback(article).await;
                    match self.store.update_category(article.id, category).await {
                        Ok(_) => {}
                        // Deleted since the load; still counted in this tally
                        Err(AppError::NotFound(_)) => tracing::warn!(
                            article_id = %article.id,
                            "Article vanished before its category was saved"
                        ),
                        Err(e) => return Err(e),
                    }
                    Ok::<_, AppError>((idx, category))
                })
                .buffer_unordered(self.options.concurrency.max(1))
                .try_collect()
                .await?
        };

        for (idx, category) in labelled {
            articles[idx].category = Some(category);
        }

        Ok(articles)
    }

    async fn classify_or_fallback(&self, article: &SavedArticle) -> Category {
        let call = self
            .classifier
            .classify(&article.title, article.description.as_deref());

        let outcome = match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ClassificationError::Timeout(self.options.timeout)),
        };

        match outcome {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(
                    article_id = %article.id,
                    error = %e,
                    "Classification failed, using fallback category"
                );
                Category::Uncategorized
            }
        }
    }
}

/// Counts articles per category in first-seen order, then sorts by count
///
/// The sort is stable, so equal counts keep the order in which their category
/// first appeared. Articles still lacking a label count as `Uncategorized`.
pub fn tally_interests(articles: &[SavedArticle]) -> Vec<InterestEntry> {
    let total = articles.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: Vec<(Category, usize)> = Vec::new();
    for article in articles {
        let category = article.category.unwrap_or(Category::Uncategorized);
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut interests: Vec<InterestEntry> = counts
        .into_iter()
        .map(|(category_name, count)| InterestEntry {
            category_name,
            count,
            percentage: percentage_of(count, total),
        })
        .collect();

    interests.sort_by(|a, b| b.count.cmp(&a.count));
    interests
}

/// Highest-ranked `n` category names
pub fn top_categories(interests: &[InterestEntry], n: usize) -> Vec<Category> {
    interests.iter().take(n).map(|i| i.category_name).collect()
}

fn percentage_of(count: usize, total: usize) -> u32 {
    ((count as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::{articles::MockArticleStore, MemoryArticleStore};
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    /// Classifier answering from a fixed title → outcome table
    #[derive(Default)]
    pub(crate) struct ScriptedClassifier {
        replies: HashMap<String, Option<Category>>,
        delay: Option<Duration>,
        pub calls: AtomicUsize,
        in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
    }

    impl ScriptedClassifier {
        pub fn reply(mut self, title: &str, category: Category) -> Self {
            self.replies.insert(title.to_string(), Some(category));
            self
        }

        pub fn fail(mut self, title: &str) -> Self {
            self.replies.insert(title.to_string(), None);
            self
        }

        fn stall(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait::async_trait]
    impl Classifier for ScriptedClassifier {
        async fn classify(
            &self,
            title: &str,
            _description: Option<&str>,
        ) -> Result<Category, ClassificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            match self.replies.get(title) {
                Some(Some(category)) => Ok(*category),
                _ => Err(ClassificationError::Service("scripted failure".to_string())),
            }
        }
    }

    pub(crate) fn saved(user_id: &str, title: &str, category: Option<Category>) -> SavedArticle {
        SavedArticle {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: Some(format!("About {}", title)),
            image: String::new(),
            source: "Wire".to_string(),
            date: "2024-01-01T00:00:00Z".to_string(),
            user_id: user_id.to_string(),
            read: false,
            category,
        }
    }

    fn aggregator(
        articles: Vec<SavedArticle>,
        classifier: ScriptedClassifier,
    ) -> (InterestAggregator, Arc<MemoryArticleStore>, Arc<ScriptedClassifier>) {
        let store = Arc::new(MemoryArticleStore::with_articles(articles));
        let classifier = Arc::new(classifier);
        let aggregator = InterestAggregator::new(
            store.clone(),
            classifier.clone(),
            ClassificationOptions::default(),
        );
        (aggregator, store, classifier)
    }

    fn entry(category_name: Category, count: usize, percentage: u32) -> InterestEntry {
        InterestEntry {
            category_name,
            count,
            percentage,
        }
    }

    #[tokio::test]
    async fn test_no_saved_articles_yields_empty() {
        let (aggregator, _, classifier) = aggregator(vec![], ScriptedClassifier::default());

        let interests = aggregator.compute_interests("alice").await.unwrap();

        assert!(interests.is_empty());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_categorized_articles_are_counted_without_classifier() {
        let articles = vec![
            saved("alice", "a", Some(Category::Technology)),
            saved("alice", "b", Some(Category::Business)),
            saved("alice", "c", Some(Category::Technology)),
            saved("alice", "d", Some(Category::Technology)),
            saved("bob", "e", Some(Category::Sports)),
        ];
        let (aggregator, _, classifier) = aggregator(articles, ScriptedClassifier::default());

        let interests = aggregator.compute_interests("alice").await.unwrap();

        assert_eq!(
            interests,
            vec![
                entry(Category::Technology, 3, 75),
                entry(Category::Business, 1, 25),
            ]
        );
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_per_article() {
        let articles = vec![
            saved("alice", "Rocket launch", None),
            saved("alice", "Garbled", None),
        ];
        let classifier = ScriptedClassifier::default()
            .reply("Rocket launch", Category::Science)
            .fail("Garbled");
        let (aggregator, store, _) = aggregator(articles, classifier);

        let interests = assert_ok!(aggregator.compute_interests("alice").await);

        assert_eq!(
            interests,
            vec![
                entry(Category::Science, 1, 50),
                entry(Category::Uncategorized, 1, 50),
            ]
        );

        let persisted = store.find(&ArticleFilter::owned_by("alice")).await.unwrap();
        let labels: Vec<Option<Category>> = persisted.iter().map(|a| a.category).collect();
        assert_eq!(
            labels,
            vec![Some(Category::Science), Some(Category::Uncategorized)]
        );
    }

    #[tokio::test]
    async fn test_percentage_rounds_each_entry() {
        let articles = vec![
            saved("alice", "a", Some(Category::Health)),
            saved("alice", "b", Some(Category::Politics)),
            saved("alice", "c", Some(Category::Politics)),
        ];
        let (aggregator, _, _) = aggregator(articles, ScriptedClassifier::default());

        let interests = aggregator.compute_interests("alice").await.unwrap();

        assert_eq!(
            interests,
            vec![
                entry(Category::Politics, 2, 67),
                entry(Category::Health, 1, 33),
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let articles = vec![
            saved("alice", "a", Some(Category::Education)),
            saved("alice", "b", Some(Category::Environment)),
            saved("alice", "c", Some(Category::Environment)),
            saved("alice", "d", Some(Category::Education)),
            saved("alice", "e", Some(Category::Sports)),
        ];

        let interests = tally_interests(&articles);
        let order: Vec<Category> = interests.iter().map(|i| i.category_name).collect();

        assert_eq!(
            order,
            vec![Category::Education, Category::Environment, Category::Sports]
        );
    }

    #[tokio::test]
    async fn test_second_run_is_identical_and_skips_classification() {
        let articles = vec![
            saved("alice", "Election night", None),
            saved("alice", "Box office", None),
            saved("alice", "Budget", Some(Category::Politics)),
        ];
        let classifier = ScriptedClassifier::default()
            .reply("Election night", Category::Politics)
            .reply("Box office", Category::Entertainment);
        let (aggregator, _, classifier) = aggregator(articles, classifier);

        let first = aggregator.compute_interests("alice").await.unwrap();
        let second = aggregator.compute_interests("alice").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0], entry(Category::Politics, 2, 67));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_classifier_times_out_to_fallback() {
        let articles = vec![saved("alice", "Slow", None)];
        let classifier = ScriptedClassifier::default()
            .reply("Slow", Category::Business)
            .stall(Duration::from_secs(5));
        let store = Arc::new(MemoryArticleStore::with_articles(articles));
        let aggregator = InterestAggregator::new(
            store,
            Arc::new(classifier),
            ClassificationOptions {
                concurrency: 2,
                timeout: Duration::from_millis(20),
            },
        );

        let interests = aggregator.compute_interests("alice").await.unwrap();

        assert_eq!(interests, vec![entry(Category::Uncategorized, 1, 100)]);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_request() {
        let mut store = MockArticleStore::new();
        store
            .expect_find()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let aggregator = InterestAggregator::new(
            Arc::new(store),
            Arc::new(ScriptedClassifier::default()),
            ClassificationOptions::default(),
        );

        let result = aggregator.compute_interests("alice").await;
        assert!(matches!(assert_err!(result), AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_failed_category_write_aborts_request() {
        let article = saved("alice", "Rocket launch", None);
        let mut store = MockArticleStore::new();
        store
            .expect_find()
            .returning(move |_| Ok(vec![article.clone()]));
        store
            .expect_update_category()
            .times(1)
            .returning(|_, _| Err(AppError::Database(sqlx::Error::PoolClosed)));

        let aggregator = InterestAggregator::new(
            Arc::new(store),
            Arc::new(ScriptedClassifier::default().reply("Rocket launch", Category::Science)),
            ClassificationOptions::default(),
        );

        assert!(aggregator.compute_interests("alice").await.is_err());
    }

    #[tokio::test]
    async fn test_deleted_article_is_still_counted() {
        let kept = saved("alice", "Budget", Some(Category::Politics));
        let vanished = saved("alice", "Rocket launch", None);
        let mut store = MockArticleStore::new();
        store
            .expect_find()
            .returning(move |_| Ok(vec![kept.clone(), vanished.clone()]));
        store
            .expect_update_category()
            .times(1)
            .returning(|id, _| Err(AppError::NotFound(format!("Article {} not found", id))));

        let aggregator = InterestAggregator::new(
            Arc::new(store),
            Arc::new(ScriptedClassifier::default().reply("Rocket launch", Category::Science)),
            ClassificationOptions::default(),
        );

        let interests = assert_ok!(aggregator.compute_interests("alice").await);

        assert_eq!(
            interests,
            vec![
                entry(Category::Politics, 1, 50),
                entry(Category::Science, 1, 50),
            ]
        );
    }

    #[tokio::test]
    async fn test_classification_respects_concurrency_limit() {
        let labels = [
            Category::Technology,
            Category::Business,
            Category::Science,
            Category::Health,
            Category::Sports,
            Category::Education,
        ];
        let articles: Vec<SavedArticle> = (0..labels.len())
            .map(|i| saved("alice", &format!("story {}", i), None))
            .collect();
        let classifier = labels
            .iter()
            .enumerate()
            .fold(ScriptedClassifier::default(), |c, (i, label)| {
                c.reply(&format!("story {}", i), *label)
            })
            .stall(Duration::from_millis(20));

        let store = Arc::new(MemoryArticleStore::with_articles(articles));
        let classifier = Arc::new(classifier);
        let aggregator = InterestAggregator::new(
            store.clone(),
            classifier.clone(),
            ClassificationOptions {
                concurrency: 2,
                timeout: Duration::from_secs(5),
            },
        );

        let categorized = aggregator.load_categorized("alice").await.unwrap();

        assert_eq!(classifier.calls.load(Ordering::SeqCst), labels.len());
        assert_eq!(classifier.max_in_flight.load(Ordering::SeqCst), 2);

        for (i, article) in categorized.iter().enumerate() {
            assert_eq!(article.title, format!("story {}", i));
            assert_eq!(article.category, Some(labels[i]));
        }

        let persisted = store.find(&ArticleFilter::owned_by("alice")).await.unwrap();
        let stored: Vec<Option<Category>> = persisted.iter().map(|a| a.category).collect();
        let expected: Vec<Option<Category>> = labels.iter().copied().map(Some).collect();
        assert_eq!(stored, expected);
    }
}
