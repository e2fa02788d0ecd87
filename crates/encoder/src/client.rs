use async_trait::async_trait;
use datedine_common::{DateDineError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::encoder_trait::{validate_text, TextEncoder};
use crate::types::{EmbedRequest, EmbedResponse, EmbeddingVector};

const MAX_ATTEMPTS: u32 = 3;

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DateDineError::network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama client initialized: {}", base_url);
        Ok(Self { base_url, client })
    }

    /// Generate embedding for text (with retry logic)
    pub async fn embed(&self, model: &str, text: &str) -> Result<EmbeddingVector> {
        self.embed_with_retry(model, text, MAX_ATTEMPTS).await
    }

    /// Generate embedding with custom retry count
    async fn embed_with_retry(
        &self,
        model: &str,
        text: &str,
        max_retries: u32,
    ) -> Result<EmbeddingVector> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!("Generating embedding - Model: {}, Text length: {}", model, text.len());

        let request = EmbedRequest {
            model: model.to_string(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) => {
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt - 1));
                        warn!(
                            "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                            attempt, max_retries, e, delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DateDineError::network("All retries failed")))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<EmbeddingVector> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| DateDineError::network(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| DateDineError::encoder(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response.json().await.map_err(|e| {
            DateDineError::encoder(format!("Failed to parse embedding response: {}", e))
        })?;

        if result.embedding.is_empty() {
            return Err(DateDineError::encoder("Empty embedding from Ollama"));
        }

        Ok(result.embedding)
    }
}

/// [`TextEncoder`] backed by an Ollama embedding model
#[derive(Debug, Clone)]
pub struct OllamaEncoder {
    client: OllamaClient,
    model: String,
}

impl OllamaEncoder {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextEncoder for OllamaEncoder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn encode(&self, text: &str) -> Result<EmbeddingVector> {
        let text = validate_text(text)?;
        self.client.embed(&self.model, text).await
    }
}
