//! Configuration management

use anyhow::{Context, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// OpenRouteService API key. Empty or unset forces the haversine fallback.
    pub ors_api_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;

        let ors_api_key = std::env::var("ORS_API_KEY").unwrap_or_default();

        Ok(Self {
            nats_url,
            database_url,
            ors_api_key,
        })
    }

    /// Whether a usable OpenRouteService key is configured (empty string counts as unset).
    pub fn has_ors_key(&self) -> bool {
        !self.ors_api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_nats_url_defaults() {
        std::env::remove_var("NATS_URL");
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.nats_url, "nats://localhost:4222");
    }

    #[test]
    fn test_config_ors_key_empty_by_default() {
        std::env::remove_var("ORS_API_KEY");
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();
        assert!(!config.has_ors_key());
    }

    #[test]
    fn test_config_ors_key_present_when_set() {
        std::env::set_var("ORS_API_KEY", "secret-key");
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();
        assert!(config.has_ors_key());

        std::env::remove_var("ORS_API_KEY");
    }

    #[test]
    fn test_config_requires_database_url() {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("ORS_API_KEY");
        assert!(Config::from_env().is_err());
    }
}
