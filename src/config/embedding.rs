//! Embedding service configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::embedding::HttpEmbeddingConfig;
use crate::domain::document::EMBEDDING_DIMENSIONS;

use super::error::ValidationError;

/// Settings for the OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Disabled means documents are stored without vectors and search
    /// returns nothing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Vector width; must match the `vector(...)` column
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token, not needed for Ollama
    pub api_key: Option<Secret<String>>,
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client settings for `HttpEmbeddingProvider`.
    pub fn http_config(&self) -> HttpEmbeddingConfig {
        let config = HttpEmbeddingConfig::new(self.base_url.clone(), self.model.clone())
            .with_timeout(self.timeout());
        match &self.api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EMBEDDING__MODEL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidEmbeddingUrl);
        }
        if self.dimensions != EMBEDDING_DIMENSIONS {
            return Err(ValidationError::InvalidEmbeddingDimensions);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            dimensions: default_dimensions(),
            timeout_secs: default_timeout(),
            api_key: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_dimensions() -> usize {
    EMBEDDING_DIMENSIONS
}

fn default_timeout() -> u64 {
    30
}
