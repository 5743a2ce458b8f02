use std::{sync::Arc, time::Duration};

use crate::{models::Category, services::providers::TextGenerator};

/// Why a single article could not be labelled
///
/// Callers recover from these locally by falling back to `Category::Uncategorized`.
#[derive(thiserror::Error, Debug)]
pub enum ClassificationError {
    #[error("classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("classifier service failed: {0}")]
    Service(String),

    #[error("unrecognized category label: {0:?}")]
    UnrecognizedLabel(String),
}

/// Assigns a subject category to an article
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Category, ClassificationError>;
}

/// Classifier that asks a text generator to pick one label
#[derive(Clone)]
pub struct GenerativeClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl GenerativeClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

pub fn classification_prompt(title: &str, description: Option<&str>) -> String {
    let labels: Vec<&str> = Category::CLASSIFIABLE.iter().map(|c| c.as_str()).collect();

    format!(
        "Based on this article title and description, classify it into ONE of the following categories:\n\
         {}.\n\
         Return only the category name, nothing else.\n\n\
         Title: {}\n\
         Description: {}",
        labels.join(", "),
        title,
        description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description available")
    )
}

/// Reads the label out of a model reply such as "Technology." or "**Sports**"
fn parse_label(reply: &str) -> Result<Category, ClassificationError> {
    let first_line = reply.trim().lines().next().unwrap_or_default();
    let label = first_line.trim_matches(|c: char| !c.is_alphanumeric());

    label
        .parse()
        .map_err(|_| ClassificationError::UnrecognizedLabel(reply.trim().to_string()))
}

#[async_trait::async_trait]
impl Classifier for GenerativeClassifier {
    async fn classify(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Category, ClassificationError> {
        let prompt = classification_prompt(title, description);

        let reply = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| ClassificationError::Service(e.to_string()))?;

        let category = parse_label(&reply)?;

        tracing::debug!(
            title = %title,
            category = %category,
            provider = self.generator.name(),
            "Article classified"
        );

        Ok(category)
    }
}
