//! DateDine Text Encoder
//!
//! Maps free text to fixed-length embedding vectors. The concrete backend is
//! swappable behind [`TextEncoder`]: a local feature-hashing encoder that
//! needs no network, or an Ollama embeddings client.

mod client;
mod encoder_trait;
mod hashing;
mod types;

use datedine_common::{AppConfig, EmbeddingBackend, Result};
use std::sync::Arc;

pub use client::{OllamaClient, OllamaEncoder};
pub use encoder_trait::{ensure_uniform_dimension, validate_text, TextEncoder};
pub use hashing::HashEncoder;
pub use types::{EmbedRequest, EmbedResponse, EmbeddingVector};

/// Build the encoder selected by configuration
pub fn build_encoder(config: &AppConfig) -> Result<Arc<dyn TextEncoder>> {
    let encoder: Arc<dyn TextEncoder> = match config.embedding_backend {
        EmbeddingBackend::Hash => Arc::new(HashEncoder::new(config.embedding_dim)?),
        EmbeddingBackend::Ollama => {
            let client = OllamaClient::new(&config.ollama_base_url)?;
            Arc::new(OllamaEncoder::new(client, &config.embedding_model))
        }
    };

    tracing::info!(
        "Text encoder ready: backend={}, model={}",
        config.embedding_backend,
        encoder.model_name()
    );
    Ok(encoder)
}
