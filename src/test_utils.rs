//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::database::{TextCollation, create_tables},
    core::{
        catalog,
        product::{self, ProductInput},
        user::{self, NewUser},
    },
    entities,
    errors::Result,
    store::Store,
};
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_store() -> Result<Store> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(Store::new(db, TextCollation::NoCase))
}

/// Creates a test category without a super category.
pub async fn create_test_category(store: &Store, name: &str) -> Result<entities::CategoryModel> {
    catalog::create_category(store, name, 0).await
}

/// Creates a specification with the given option values.
/// Returns the option rows in the order given.
pub async fn create_test_options(
    store: &Store,
    specification: &str,
    values: &[&str],
) -> Result<Vec<entities::SpecificationOptionModel>> {
    let spec = catalog::create_specification(store, specification).await?;
    let mut options = Vec::with_capacity(values.len());
    for value in values {
        options.push(catalog::create_specification_option(store, value, spec.id).await?);
    }
    Ok(options)
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `cost`: 100
/// * `description`: "Test description"
/// * no category, options or images
pub async fn create_test_product(store: &Store, name: &str) -> Result<entities::ProductModel> {
    create_custom_product(store, name, 100, 0).await
}

/// Creates a test product with custom cost and category.
pub async fn create_custom_product(
    store: &Store,
    name: &str,
    cost: i64,
    category: i64,
) -> Result<entities::ProductModel> {
    product::create_product(
        store,
        ProductInput {
            name: name.to_string(),
            cost,
            description: "Test description".to_string(),
            category,
            specification_options: Vec::new(),
            images: Vec::new(),
        },
    )
    .await
}

/// Registers a test user with password `"secret"`.
pub async fn create_test_user(store: &Store, email: &str) -> Result<entities::UserModel> {
    user::register_user(
        store,
        NewUser {
            email: email.to_string(),
            password: "secret".to_string(),
            name: "Test".to_string(),
            surname: "User".to_string(),
            phone: None,
        },
    )
    .await
}

/// Sets up a store with one registered user and one product.
/// Returns (store, user, product) for cart and order tests.
pub async fn setup_with_user_and_product()
-> Result<(Store, entities::UserModel, entities::ProductModel)> {
    let store = setup_test_store().await?;
    let user = create_test_user(&store, "buyer@example.com").await?;
    let product = create_test_product(&store, "Test Product").await?;
    Ok((store, user, product))
}
