use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Subject label attached to a saved article
///
/// `Uncategorized` is the fallback used when classification fails; it is never
/// offered to the classifier as a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Science,
    Health,
    Entertainment,
    Sports,
    Politics,
    Environment,
    Education,
    Uncategorized,
}

impl Category {
    /// Labels the classifier may choose from
    pub const CLASSIFIABLE: [Category; 9] = [
        Category::Technology,
        Category::Business,
        Category::Science,
        Category::Health,
        Category::Entertainment,
        Category::Sports,
        Category::Politics,
        Category::Environment,
        Category::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Science => "Science",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Sports => "Sports",
            Category::Politics => "Politics",
            Category::Environment => "Environment",
            Category::Education => "Education",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Reads a label persisted by an earlier run; unknown labels fall back to `Uncategorized`
    pub fn from_stored(label: &str) -> Self {
        label.parse().unwrap_or(Category::Uncategorized)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technology" => Ok(Category::Technology),
            "business" => Ok(Category::Business),
            "science" => Ok(Category::Science),
            "health" => Ok(Category::Health),
            "entertainment" => Ok(Category::Entertainment),
            "sports" => Ok(Category::Sports),
            "politics" => Ok(Category::Politics),
            "environment" => Ok(Category::Environment),
            "education" => Ok(Category::Education),
            "uncategorized" => Ok(Category::Uncategorized),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}
