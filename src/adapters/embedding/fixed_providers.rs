//! Providers that need no server.

use async_trait::async_trait;

use crate::domain::document::{Embedding, EMBEDDING_DIMENSIONS};
use crate::ports::{EmbeddingError, EmbeddingProvider};

/// Used when embeddings are switched off; every call fails with `Disabled`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for DisabledEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Err(EmbeddingError::Disabled)
    }

    fn model(&self) -> &str {
        "disabled"
    }
}

/// Bag-of-words hashing embedder for tests.
///
/// Each lowercase word bumps one bucket, then the vector is normalised, so
/// texts sharing words come out similar and identical texts identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingEmbeddingProvider;

impl HashingEmbeddingProvider {
    fn bucket(word: &str) -> usize {
        // FNV-1a
        let hash = word.bytes().fold(0xcbf2_9ce4_8422_2325u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
        });
        (hash % EMBEDDING_DIMENSIONS as u64) as usize
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut values = vec![0f32; EMBEDDING_DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            values[Self::bucket(&word.to_lowercase())] += 1.0;
        }
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        Embedding::new(values).map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))
    }

    fn model(&self) -> &str {
        "hashing"
    }
}
