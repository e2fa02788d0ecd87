use async_trait::async_trait;
use datedine_common::{DateDineError, Result};
use sha2::{Digest, Sha256};

use crate::encoder_trait::{validate_text, TextEncoder};
use crate::types::EmbeddingVector;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Function words that carry no ambience or cuisine signal
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "its",
    "of", "on", "or", "the", "to", "with", "we", "i", "our", "my", "that", "this",
];

/// Local feature-hashing encoder
///
/// Each lower-cased word (minus stop words) and each adjacent word pair is
/// hashed with SHA-256 into one of `dimension` buckets with a digest-derived
/// sign. Term weights are accumulated without normalization, so the output
/// is stable across processes and platforms.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dimension: usize,
    model_name: String,
}

impl HashEncoder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(DateDineError::config("hash encoder dimension must be at least 1"));
        }

        Ok(Self {
            dimension,
            model_name: format!("feature-hash-{}", dimension),
        })
    }

    /// Synchronous encoding; the async trait methods delegate here
    pub fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let text = validate_text(text)?;
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(DateDineError::invalid_input(format!(
                "text has no words to encode: '{}'",
                text
            )));
        }

        let mut vector = vec![0.0f32; self.dimension];

        for token in &tokens {
            self.accumulate(&mut vector, token, UNIGRAM_WEIGHT);
        }
        for pair in tokens.windows(2) {
            self.accumulate(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        Ok(vector)
    }

    fn accumulate(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());

        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;

        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

#[async_trait]
impl TextEncoder for HashEncoder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn encode(&self, text: &str) -> Result<EmbeddingVector> {
        self.embed(text)
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Lower-case alphanumeric words without stop words
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !STOP_WORDS.iter().any(|stop| stop == word))
        .map(str::to_string)
        .collect()
}
