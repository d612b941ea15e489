//! Database configuration module.
//!
//! This module handles the `SQLite` connection target and table creation using `SeaORM`.
//! Two targets are known: the primary database used by default and a local alternate.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`
//! so the database schema always matches the Rust structs.

use crate::entities::{
    Category, Image, Order, Product, ProductLine, ProductSpecificationOption, Purchase,
    Specification, SpecificationOption, SuperCategory, User,
};
use crate::errors::{Error, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Which configured database to connect to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseTarget {
    /// The shared remote database
    #[default]
    Primary,
    /// A developer-local database
    Local,
}

impl std::str::FromStr for DatabaseTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "local" => Ok(Self::Local),
            other => Err(Error::Config {
                message: format!("Unknown database target '{other}'"),
            }),
        }
    }
}

/// Collation applied to text ordering in name-sorted listings
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextCollation {
    /// Byte-wise comparison
    #[default]
    Binary,
    /// ASCII case-insensitive comparison
    NoCase,
    /// Like binary, ignoring trailing spaces
    RTrim,
}

impl TextCollation {
    /// The collation name as understood by `SQLite`
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Binary => "BINARY",
            Self::NoCase => "NOCASE",
            Self::RTrim => "RTRIM",
        }
    }
}

/// The `[database]` section of config.toml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Target selected at startup
    pub target: DatabaseTarget,
    /// Connection URL of the primary target
    pub primary_url: String,
    /// Connection URL of the local target
    pub local_url: String,
    /// Text collation for name ordering
    pub collation: TextCollation,
    /// Upper bound of pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a connection before failing
    pub connect_timeout_secs: u64,
    /// Whether sqlx logs every statement
    pub sqlx_logging: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            target: DatabaseTarget::Primary,
            primary_url: "sqlite://ascension.sqlite?mode=rwc".to_string(),
            local_url: "sqlite://ascension_local.sqlite?mode=rwc".to_string(),
            collation: TextCollation::Binary,
            max_connections: 8,
            connect_timeout_secs: 8,
            sqlx_logging: false,
        }
    }
}

impl DatabaseSettings {
    /// URL of the currently selected target
    #[must_use]
    pub fn selected_url(&self) -> &str {
        match self.target {
            DatabaseTarget::Primary => &self.primary_url,
            DatabaseTarget::Local => &self.local_url,
        }
    }

    /// Applies `ASCENSION_DB_TARGET` and `DATABASE_URL` on top of file values.
    ///
    /// `DATABASE_URL` replaces the URL of whichever target ends up selected.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::apply_env_overrides`], reading variables through `lookup`.
    ///
    /// # Errors
    /// Returns `Error::Config` if `ASCENSION_DB_TARGET` names an unknown target.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(target) = lookup("ASCENSION_DB_TARGET") {
            self.target = target.parse()?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            match self.target {
                DatabaseTarget::Primary => self.primary_url = url,
                DatabaseTarget::Local => self.local_url = url,
            }
        }
        Ok(())
    }

    /// Builds `SeaORM` connect options for the selected target
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.selected_url().to_string());
        options
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(self.sqlx_logging);
        options
    }
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Tables are created in dependency order so foreign keys always point at an
/// existing table. Existing tables are left untouched.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, SuperCategory).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Specification).await?;
    create_table(db, &schema, SpecificationOption).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, ProductSpecificationOption).await?;
    create_table(db, &schema, Image).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Purchase).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, ProductLine).await?;

    debug!("All storefront tables ensured");
    Ok(())
}
