use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// An article a user saved to their personal list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedArticle {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub source: String,
    /// Publication date exactly as supplied by the client
    pub date: String,
    pub user_id: String,
    pub read: bool,
    pub category: Option<Category>,
}

/// Payload for saving an article
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub date: String,
    pub user_id: String,
}

impl NewArticle {
    /// Materializes the record the store will hold, with a fresh id
    pub fn into_saved(self) -> SavedArticle {
        SavedArticle {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            image: self.image,
            source: self.source,
            date: self.date,
            user_id: self.user_id,
            read: false,
            category: None,
        }
    }
}

/// One row of a user's interest distribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterestEntry {
    pub category_name: Category,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecommendationsResponse {
    pub interests: Vec<InterestEntry>,
    pub recommendations: Vec<SavedArticle>,
}
