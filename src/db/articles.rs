use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Category, NewArticle, SavedArticle},
};

const ARTICLE_COLUMNS: &str =
    "id, title, description, image, source, date, user_id, read, category";

/// Restriction on the owning user of an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    Is(String),
    IsNot(String),
}

/// Query over saved articles
///
/// Without `newest_first` results come back in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub owner: Option<OwnerFilter>,
    /// `Some(vec![])` matches nothing
    pub categories: Option<Vec<Category>>,
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl ArticleFilter {
    pub fn owned_by(user_id: &str) -> Self {
        Self {
            owner: Some(OwnerFilter::Is(user_id.to_string())),
            ..Self::default()
        }
    }

    pub fn not_owned_by(user_id: &str) -> Self {
        Self {
            owner: Some(OwnerFilter::IsNot(user_id.to_string())),
            ..Self::default()
        }
    }

    pub fn in_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single record passes the owner and category restrictions
    pub fn matches(&self, article: &SavedArticle) -> bool {
        let owner_ok = match &self.owner {
            Some(OwnerFilter::Is(user_id)) => article.user_id == *user_id,
            Some(OwnerFilter::IsNot(user_id)) => article.user_id != *user_id,
            None => true,
        };

        let category_ok = match &self.categories {
            Some(categories) => article
                .category
                .map(|category| categories.contains(&category))
                .unwrap_or(false),
            None => true,
        };

        owner_ok && category_ok
    }
}

/// Persistence for saved articles
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    async fn find(&self, filter: &ArticleFilter) -> AppResult<Vec<SavedArticle>>;

    /// Sets the category label and returns the updated record
    async fn update_category(&self, id: Uuid, category: Category) -> AppResult<SavedArticle>;

    async fn insert(&self, article: NewArticle) -> AppResult<SavedArticle>;

    /// Returns false when no record had this id
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn set_read(&self, id: Uuid, read: bool) -> AppResult<SavedArticle>;
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    image: String,
    source: String,
    date: String,
    user_id: String,
    read: bool,
    category: Option<String>,
}

impl From<ArticleRow> for SavedArticle {
    fn from(row: ArticleRow) -> Self {
        SavedArticle {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            source: row.source,
            date: row.date,
            user_id: row.user_id,
            read: row.read,
            // A blank label counts as never classified
            category: row
                .category
                .as_deref()
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(Category::from_stored),
        }
    }
}

/// Postgres-backed article store
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ArticleStore for PgArticleStore {
    async fn find(&self, filter: &ArticleFilter) -> AppResult<Vec<SavedArticle>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM articles WHERE TRUE",
            ARTICLE_COLUMNS
        ));

        match &filter.owner {
            Some(OwnerFilter::Is(user_id)) => {
                query.push(" AND user_id = ").push_bind(user_id.clone());
            }
            Some(OwnerFilter::IsNot(user_id)) => {
                query.push(" AND user_id <> ").push_bind(user_id.clone());
            }
            None => {}
        }

        if let Some(categories) = &filter.categories {
            let labels: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
            query
                .push(" AND category = ANY(")
                .push_bind(labels)
                .push(")");
        }

        // Dates are opaque text, so compare them bytewise
        if filter.newest_first {
            query.push(r#" ORDER BY date COLLATE "C" DESC, created_at ASC"#);
        } else {
            query.push(" ORDER BY created_at ASC, id ASC");
        }

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows: Vec<ArticleRow> = query.build_query_as().fetch_all(&self.pool).await?;

        tracing::debug!(filter = ?filter, rows = rows.len(), "Article query completed");

        Ok(rows.into_iter().map(SavedArticle::from).collect())
    }

    async fn update_category(&self, id: Uuid, category: Category) -> AppResult<SavedArticle> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "UPDATE articles SET category = $1 WHERE id = $2 RETURNING {}",
            ARTICLE_COLUMNS
        ))
        .bind(category.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SavedArticle::from)
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))
    }

    async fn insert(&self, article: NewArticle) -> AppResult<SavedArticle> {
        let article = article.into_saved();

        let row: ArticleRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO articles (id, title, description, image, source, date, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ARTICLE_COLUMNS
        ))
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.image)
        .bind(&article.source)
        .bind(&article.date)
        .bind(&article.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_read(&self, id: Uuid, read: bool) -> AppResult<SavedArticle> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "UPDATE articles SET read = $1 WHERE id = $2 RETURNING {}",
            ARTICLE_COLUMNS
        ))
        .bind(read)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SavedArticle::from)
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(user_id: &str, category: Option<Category>) -> SavedArticle {
        SavedArticle {
            id: Uuid::new_v4(),
            title: "Title".to_string(),
            description: None,
            image: String::new(),
            source: String::new(),
            date: String::new(),
            user_id: user_id.to_string(),
            read: false,
            category,
        }
    }

    #[test]
    fn test_owner_filters() {
        let mine = article("alice", None);
        let theirs = article("bob", None);

        assert!(ArticleFilter::owned_by("alice").matches(&mine));
        assert!(!ArticleFilter::owned_by("alice").matches(&theirs));
        assert!(ArticleFilter::not_owned_by("alice").matches(&theirs));
        assert!(!ArticleFilter::not_owned_by("alice").matches(&mine));
    }

    #[test]
    fn test_category_membership_excludes_unlabelled() {
        let filter = ArticleFilter::default().in_categories(vec![Category::Science]);

        assert!(filter.matches(&article("bob", Some(Category::Science))));
        assert!(!filter.matches(&article("bob", Some(Category::Sports))));
        assert!(!filter.matches(&article("bob", None)));
    }

    #[test]
    fn test_empty_category_set_matches_nothing() {
        let filter = ArticleFilter::default().in_categories(vec![]);
        assert!(!filter.matches(&article("bob", Some(Category::Science))));
    }

    #[test]
    fn test_stored_label_is_parsed() {
        let row = ArticleRow {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            image: String::new(),
            source: String::new(),
            date: String::new(),
            user_id: "u".to_string(),
            read: false,
            category: Some("Something else".to_string()),
        };

        let saved = SavedArticle::from(row);
        assert_eq!(saved.category, Some(Category::Uncategorized));
    }

    #[test]
    fn test_blank_stored_label_is_reclassified() {
        for stored in [Some(""), Some("   "), None] {
            let row = ArticleRow {
                id: Uuid::new_v4(),
                title: "t".to_string(),
                description: None,
                image: String::new(),
                source: String::new(),
                date: String::new(),
                user_id: "u".to_string(),
                read: false,
                category: stored.map(str::to_string),
            };

            assert_eq!(SavedArticle::from(row).category, None);
        }
    }
}
