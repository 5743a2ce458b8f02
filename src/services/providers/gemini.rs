/// Generative Language API provider
///
/// Wraps POST /v1beta/models/{model}:generateContent with a single-turn prompt.
use std::fmt;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{GenerateContentRequest, GenerateContentResponse},
    services::providers::TextGenerator,
};

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                model = %self.model,
                "Generative API request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Generative API returned status {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response.json().await?;

        let text = body.text().ok_or_else(|| {
            AppError::ExternalApi("Generative API returned no text".to_string())
        })?;

        tracing::debug!(model = %self.model, chars = text.len(), "Generated content");

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
