//! In-process stores backing the unit and integration tests.
use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{ArticleFilter, ArticleStore, UserStore},
    error::{AppError, AppResult},
    models::{Category, NewArticle, NewUser, SavedArticle, User},
};

/// Article store holding records in insertion order
#[derive(Default)]
pub struct MemoryArticleStore {
    articles: RwLock<Vec<SavedArticle>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records
    pub fn with_articles(articles: Vec<SavedArticle>) -> Self {
        Self {
            articles: RwLock::new(articles),
        }
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> AppResult<SavedArticle>
    where
        F: FnOnce(&mut SavedArticle) + Send,
    {
        let mut articles = self.articles.write().await;
        let article = articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;
        apply(article);
        Ok(article.clone())
    }
}

#[async_trait::async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn find(&self, filter: &ArticleFilter) -> AppResult<Vec<SavedArticle>> {
        let articles = self.articles.read().await;
        let mut found: Vec<SavedArticle> = articles
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();

        if filter.newest_first {
            found.sort_by(|a, b| b.date.cmp(&a.date));
        }

        if let Some(limit) = filter.limit {
            found.truncate(limit);
        }

        Ok(found)
    }

    async fn update_category(&self, id: Uuid, category: Category) -> AppResult<SavedArticle> {
        self.update(id, |article| article.category = Some(category))
            .await
    }

    async fn insert(&self, article: NewArticle) -> AppResult<SavedArticle> {
        let saved = article.into_saved();
        self.articles.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|a| a.id != id);
        Ok(articles.len() != before)
    }

    async fn set_read(&self, id: Uuid, read: bool) -> AppResult<SavedArticle> {
        self.update(id, |article| article.read = read).await
    }
}

/// User store keyed by email
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AppError::UserExists);
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            interests: user.interests,
            created_at: Utc::now(),
        };
        users.insert(created.email.clone(), created.clone());

        Ok(created)
    }
}
