//! Embedding vector value object.

use crate::domain::foundation::ValidationError;

/// Width of the `documents.embedding` column. The embedding model must
/// produce vectors of exactly this size.
pub const EMBEDDING_DIMENSIONS: usize = 768;

/// A content embedding of the fixed column width.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// # Errors
    ///
    /// - `OutOfRange` when the vector is not `EMBEDDING_DIMENSIONS` wide
    /// - `InvalidFormat` when any component is NaN or infinite
    pub fn new(values: Vec<f32>) -> Result<Self, ValidationError> {
        Self::with_dimensions(values, EMBEDDING_DIMENSIONS)
    }

    pub(crate) fn with_dimensions(
        values: Vec<f32>,
        dimensions: usize,
    ) -> Result<Self, ValidationError> {
        if values.len() != dimensions {
            return Err(ValidationError::out_of_range(
                "embedding",
                dimensions as i32,
                dimensions as i32,
                values.len().min(i32::MAX as usize) as i32,
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::invalid_format(
                "embedding",
                "contains non-finite values",
            ));
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// `1 - cosine distance`, matching pgvector's `1 - (a <=> b)`.
    ///
    /// Zero vectors have no direction; their similarity is 0.
    pub fn cosine_similarity(&self, other: &Embedding) -> f64 {
        let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let (a, b) = (f64::from(*a), f64::from(*b));
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}
