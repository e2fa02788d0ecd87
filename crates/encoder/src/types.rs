use serde::{Deserialize, Serialize};

/// Dense embedding of one text
pub type EmbeddingVector = Vec<f32>;

/// Ollama embedding request
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Model name (e.g., "all-minilm", "nomic-embed-text")
    pub model: String,

    /// Text to embed
    pub prompt: String,
}

/// Ollama embedding response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    pub embedding: EmbeddingVector,
}
