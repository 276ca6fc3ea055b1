//! Application configuration module
//!
//! Configuration is read from environment variables with the `APPROVAL_CMS`
//! prefix; nested values use a double underscore as separator. A `.env` file
//! in the working directory is loaded first when present.
//!
//! # Example
//!
//! ```no_run
//! use approval_cms::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod embedding;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use embedding::EmbeddingConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a
/// development server on the in-memory adapters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `APPROVAL_CMS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `APPROVAL_CMS__DATABASE__URL=...` -> `database.url = ...`
    /// - `APPROVAL_CMS__EMBEDDING__ENABLED=false` -> `embedding.enabled = false`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("APPROVAL_CMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.embedding.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "APPROVAL_CMS__DATABASE__URL",
        "APPROVAL_CMS__SERVER__PORT",
        "APPROVAL_CMS__SERVER__ENVIRONMENT",
        "APPROVAL_CMS__EMBEDDING__ENABLED",
        "APPROVAL_CMS__EMBEDDING__MODEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.database.url().is_none());
        assert!(config.embedding.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_values_are_read_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("APPROVAL_CMS__DATABASE__URL", "postgresql://cms@localhost/cms");
        env::set_var("APPROVAL_CMS__SERVER__PORT", "9090");
        env::set_var("APPROVAL_CMS__EMBEDDING__ENABLED", "false");
        env::set_var("APPROVAL_CMS__EMBEDDING__MODEL", "mxbai-embed-large");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url(), Some("postgresql://cms@localhost/cms"));
        assert_eq!(config.server.port, 9090);
        assert!(!config.embedding.enabled);
        assert_eq!(config.embedding.model, "mxbai-embed-large");
    }

    #[test]
    fn production_environment_is_detected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("APPROVAL_CMS__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn invalid_database_url_fails_validation() {
        let config = AppConfig {
            database: DatabaseConfig {
                url: Some("sqlite://cms.db".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDatabaseUrl));
    }
}
