//! Application settings loading from config.toml
//!
//! Every section has defaults so a partial file is valid. Connection strings
//! are never compiled in: they come from the file or from `DATABASE_URL`.

use crate::config::catalog::CatalogSeed;
use crate::config::database::DatabaseSettings;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Database target and connection parameters
    #[serde(default)]
    pub database: DatabaseSettings,
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Initial catalog content
    #[serde(default)]
    pub catalog: CatalogSeed,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Socket address to bind, e.g. `127.0.0.1:8080`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Parses configuration from a TOML string and applies environment overrides.
///
/// # Errors
/// Returns `Error::Config` if the TOML syntax is invalid or a value has the wrong type,
/// or if `ASCENSION_DB_TARGET` holds an unknown target.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let mut config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.database.apply_env_overrides()?;
    Ok(config)
}

/// Loads application configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - An environment override is malformed
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    tracing::debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `ASCENSION_CONFIG`, or `./config.toml` when unset
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("ASCENSION_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::database::{DatabaseTarget, TextCollation};

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [database]
            target = "local"
            primary_url = "sqlite://data/primary.sqlite?mode=rwc"
            local_url = "sqlite://data/local.sqlite?mode=rwc"
            collation = "nocase"
            max_connections = 4

            [server]
            bind_address = "0.0.0.0:9000"

            [[catalog.super_categories]]
            name = "Computers"
            categories = ["Laptops", "Desktops"]

            [[catalog.specifications]]
            name = "Color"
            options = ["Black", "Silver"]
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.target, DatabaseTarget::Local);
        assert_eq!(config.database.collation, TextCollation::NoCase);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(
            config.database.selected_url(),
            "sqlite://data/local.sqlite?mode=rwc"
        );
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.catalog.super_categories.len(), 1);
        assert_eq!(config.catalog.super_categories[0].categories.len(), 2);
        assert_eq!(config.catalog.specifications[0].options, ["Black", "Silver"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.database.target, DatabaseTarget::Primary);
        assert_eq!(config.database.collation, TextCollation::Binary);
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert!(config.catalog.super_categories.is_empty());
    }

    #[test]
    fn test_invalid_collation_is_rejected() {
        let result = parse_config("[database]\ncollation = \"Russian_Russia.1251\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
