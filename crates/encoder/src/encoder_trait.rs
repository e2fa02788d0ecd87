use async_trait::async_trait;
use datedine_common::{DateDineError, Result};

use crate::types::EmbeddingVector;

/// Text-to-vector encoder
///
/// Implementations must be deterministic for a fixed model: the same text
/// always yields the same vector. Empty or whitespace-only text is rejected
/// with `InvalidInput` rather than mapped to a sentinel vector.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Model identifier, reported in engine statistics
    fn model_name(&self) -> &str;

    /// Encode a single text
    async fn encode(&self, text: &str) -> Result<EmbeddingVector>;

    /// Encode many texts, one output per input, in input order
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.encode(text).await?);
        }

        ensure_uniform_dimension(&vectors)?;
        Ok(vectors)
    }
}

/// Reject empty or whitespace-only text
pub fn validate_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DateDineError::invalid_input("text to encode cannot be empty"));
    }
    Ok(trimmed)
}

/// All vectors must share the first vector's length
pub fn ensure_uniform_dimension(vectors: &[EmbeddingVector]) -> Result<()> {
    if let Some(first) = vectors.first() {
        let expected = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(DateDineError::dimension_mismatch(expected, bad.len()));
        }
    }
    Ok(())
}
