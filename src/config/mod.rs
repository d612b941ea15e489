/// Database connection targets, connection parameters and table creation
pub mod database;

/// Catalog seed data from config.toml
pub mod catalog;

/// Application settings loaded from config.toml and the environment
pub mod settings;

pub use settings::{AppConfig, load_config, load_default_config};
