//! Catalog seeding from the `[catalog]` section of config.toml.
//!
//! Seeding is idempotent: rows are matched by name (categories by name within
//! their super category, options by value within their specification) and only
//! missing rows are inserted.

use crate::{
    config::catalog::CatalogSeed,
    entities::{category, specification, specification_option, super_category},
    errors::Result,
    store::Store,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

/// Counts of rows inserted by one seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// New super categories
    pub super_categories: usize,
    /// New categories
    pub categories: usize,
    /// New specifications
    pub specifications: usize,
    /// New specification options
    pub options: usize,
}

/// Inserts whatever part of `seed` is not in the database yet.
#[instrument(skip(store, seed))]
pub async fn seed_catalog(store: &Store, seed: &CatalogSeed) -> Result<SeedReport> {
    info!(
        "Seeding catalog: {} super categories, {} specifications in config",
        seed.super_categories.len(),
        seed.specifications.len()
    );
    let mut report = SeedReport::default();
    let txn = store.conn().begin().await?;

    for group in &seed.super_categories {
        let (parent, created) = ensure_super_category(store, &txn, &group.name).await?;
        report.super_categories += usize::from(created);
        for name in &group.categories {
            report.categories += usize::from(ensure_category(store, &txn, name, parent.id).await?);
        }
    }

    for spec in &seed.specifications {
        let (parent, created) = ensure_specification(store, &txn, &spec.name).await?;
        report.specifications += usize::from(created);
        for value in &spec.options {
            report.options += usize::from(ensure_option(store, &txn, value, parent.id).await?);
        }
    }

    txn.commit().await?;
    info!("Catalog seeding finished: {:?}", report);
    Ok(report)
}

async fn ensure_super_category(
    store: &Store,
    txn: &DatabaseTransaction,
    name: &str,
) -> Result<(super_category::Model, bool)> {
    if let Some(existing) = store
        .super_categories()
        .filter(super_category::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        debug!("Super category '{}' already exists. Skipping.", name);
        return Ok((existing, false));
    }
    let created = super_category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok((created, true))
}

async fn ensure_category(
    store: &Store,
    txn: &DatabaseTransaction,
    name: &str,
    super_category_id: i64,
) -> Result<bool> {
    let existing = store
        .categories()
        .filter(category::Column::Name.eq(name))
        .filter(category::Column::SuperCategoryId.eq(super_category_id))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }
    category::ActiveModel {
        name: Set(name.to_string()),
        super_category_id: Set(Some(super_category_id)),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(true)
}

async fn ensure_specification(
    store: &Store,
    txn: &DatabaseTransaction,
    name: &str,
) -> Result<(specification::Model, bool)> {
    if let Some(existing) = store
        .specifications()
        .filter(specification::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        debug!("Specification '{}' already exists. Skipping.", name);
        return Ok((existing, false));
    }
    let created = specification::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok((created, true))
}

async fn ensure_option(
    store: &Store,
    txn: &DatabaseTransaction,
    value: &str,
    specification_id: i64,
) -> Result<bool> {
    let existing = store
        .specification_options()
        .filter(specification_option::Column::Value.eq(value))
        .filter(specification_option::Column::SpecificationId.eq(specification_id))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }
    specification_option::ActiveModel {
        value: Set(value.to_string()),
        specification_id: Set(Some(specification_id)),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{SpecificationSeed, SuperCategorySeed};
    use crate::core::catalog;
    use crate::test_utils::*;

    fn seed() -> CatalogSeed {
        CatalogSeed {
            super_categories: vec![SuperCategorySeed {
                name: "Computers".to_string(),
                categories: vec!["Laptops".to_string(), "Desktops".to_string()],
            }],
            specifications: vec![SpecificationSeed {
                name: "Color".to_string(),
                options: vec!["Black".to_string(), "Silver".to_string()],
            }],
        }
    }

    #[tokio::test]
    async fn test_seed_inserts_everything_once() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store().await?;

        let first = seed_catalog(&store, &seed()).await?;
        assert_eq!(
            first,
            SeedReport {
                super_categories: 1,
                categories: 2,
                specifications: 1,
                options: 2,
            }
        );

        let second = seed_catalog(&store, &seed()).await?;
        assert_eq!(second, SeedReport::default());

        let names: Vec<String> = catalog::list_categories(&store)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Desktops", "Laptops"]);
        assert_eq!(catalog::list_specification_options(&store).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_adds_only_missing_rows() -> Result<()> {
        let store = setup_test_store().await?;
        seed_catalog(&store, &seed()).await?;

        let mut extended = seed();
        extended.super_categories[0]
            .categories
            .push("Tablets".to_string());
        let report = seed_catalog(&store, &extended).await?;
        assert_eq!(report.categories, 1);
        assert_eq!(report.super_categories, 0);
        Ok(())
    }
}
