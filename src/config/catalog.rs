//! Catalog seed configuration.
//!
//! The `[catalog]` section of config.toml lists the super categories (with
//! their categories) and specifications (with their options) the store
//! should start with. Seeding is idempotent, see `core::seed`.

use serde::Deserialize;

/// The `[catalog]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CatalogSeed {
    /// Top level groups and their categories
    #[serde(default)]
    pub super_categories: Vec<SuperCategorySeed>,
    /// Product attributes and their values
    #[serde(default)]
    pub specifications: Vec<SpecificationSeed>,
}

/// One super category and the categories filed under it
#[derive(Debug, Deserialize, Clone)]
pub struct SuperCategorySeed {
    /// Super category name
    pub name: String,
    /// Names of categories belonging to it
    #[serde(default)]
    pub categories: Vec<String>,
}

/// One specification and its option values
#[derive(Debug, Deserialize, Clone)]
pub struct SpecificationSeed {
    /// Specification name
    pub name: String,
    /// Option values
    #[serde(default)]
    pub options: Vec<String>,
}
