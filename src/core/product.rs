//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating and searching products.
//! Creation and update take raw scalars plus related ids and resolve those ids inside
//! the same database transaction as the write:
//!
//! - `category > 0` must name an existing category, `0` means none (create) or
//!   unchanged (update).
//! - A non-empty id list for specification options or images replaces the relation
//!   with the rows those ids name; ids without a row are skipped. An empty list means
//!   none (create) or unchanged (update).

use crate::{
    core::{cart::Cart, required_text},
    entities::{
        Category, Image, Product, ProductLine, ProductSpecificationOption, Purchase,
        SpecificationOption, category, image, product, product_line, product_specification_option,
        purchase, specification_option,
    },
    errors::{Error, Result},
    store::{Store, find_many, remove, resolve},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Raw values for creating or updating a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Display name
    pub name: String,
    /// Price, must not be negative
    pub cost: i64,
    /// Free-form description
    pub description: String,
    /// Category id, 0 for none
    pub category: i64,
    /// Specification option ids
    pub specification_options: Vec<i64>,
    /// Image ids
    pub images: Vec<i64>,
}

/// A product loaded together with its related rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetails {
    /// The product row
    pub product: product::Model,
    /// Its category, if set
    pub category: Option<category::Model>,
    /// Attached specification options
    pub specification_options: Vec<specification_option::Model>,
    /// Attached images
    pub images: Vec<image::Model>,
    /// Whether the current shopper has it in their cart; never stored
    pub is_in_cart: bool,
}

/// Builds the normalized search token string for a product.
///
/// Tokens are lower-cased runs of alphanumeric characters, deduplicated and sorted.
#[must_use]
pub fn search_vector(name: &str, description: &str) -> String {
    let tokens: BTreeSet<String> = tokenize(name).chain(tokenize(description)).collect();
    tokens.into_iter().collect::<Vec<_>>().join(" ")
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn validated_name(input: &ProductInput) -> Result<String> {
    let name = required_text("name", &input.name)?;
    if input.cost < 0 {
        return Err(Error::validation("cost cannot be negative"));
    }
    Ok(name)
}

/// Retrieves all products ordered by name.
pub async fn list_products(store: &Store) -> Result<Vec<product::Model>> {
    store
        .sorted_by_name(store.products(), product::Column::Name)
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Retrieves the products filed under a category, ordered by name.
pub async fn products_in_category(store: &Store, category_id: i64) -> Result<Vec<product::Model>> {
    store
        .sorted_by_name(
            store
                .products()
                .filter(product::Column::CategoryId.eq(category_id)),
            product::Column::Name,
        )
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, returning None if it does not exist.
pub async fn get_product_by_id(store: &Store, product_id: i64) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(store.conn())
        .await
        .map_err(Into::into)
}

/// Finds products whose search vector contains every token of `query`.
///
/// Tokens match whole words only. An empty query matches nothing.
pub async fn search_products(store: &Store, query: &str) -> Result<Vec<product::Model>> {
    let tokens: BTreeSet<String> = tokenize(query).collect();
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut select = store.products();
    for token in &tokens {
        select = select.filter(Expr::cust_with_values(
            "(' ' || \"search_vector\" || ' ') LIKE ?",
            [format!("% {token} %")],
        ));
    }
    let found = store
        .sorted_by_name(select, product::Column::Name)
        .all(store.conn())
        .await?;
    debug!("Search {:?} matched {} products", tokens, found.len());
    Ok(found)
}

/// Loads a product with its category, specification options and images.
///
/// Each relation is fetched explicitly; `is_in_cart` is taken from `cart`.
///
/// # Errors
/// Returns `Error::NotFound` if the product does not exist.
pub async fn load_product_details(
    store: &Store,
    product_id: i64,
    cart: &Cart,
) -> Result<ProductDetails> {
    let (product, category) = Product::find_by_id(product_id)
        .find_also_related(Category)
        .one(store.conn())
        .await?
        .ok_or_else(|| Error::not_found("products", product_id))?;

    let specification_options = product
        .find_related(SpecificationOption)
        .all(store.conn())
        .await?;
    let images = product.find_related(Image).all(store.conn()).await?;

    Ok(ProductDetails {
        is_in_cart: cart.contains(product.id),
        product,
        category,
        specification_options,
        images,
    })
}

async fn link_options(
    txn: &DatabaseTransaction,
    product_id: i64,
    options: &[specification_option::Model],
) -> Result<()> {
    ProductSpecificationOption::delete_many()
        .filter(product_specification_option::Column::ProductId.eq(product_id))
        .exec(txn)
        .await?;
    if options.is_empty() {
        return Ok(());
    }

    let links = options
        .iter()
        .map(|option| product_specification_option::ActiveModel {
            product_id: Set(product_id),
            specification_option_id: Set(option.id),
        });
    ProductSpecificationOption::insert_many(links)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn attach_images<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    images: &[image::Model],
) -> Result<()> {
    Image::update_many()
        .col_expr(image::Column::ProductId, Expr::value(None::<i64>))
        .filter(image::Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    if images.is_empty() {
        return Ok(());
    }

    Image::update_many()
        .col_expr(image::Column::ProductId, Expr::value(product_id))
        .filter(image::Column::Id.is_in(images.iter().map(|i| i.id)))
        .exec(conn)
        .await?;
    Ok(())
}

/// Creates a new product and wires up its relations.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or the cost is negative (`Error::Validation`)
/// - A non-zero category does not exist (`Error::NotFound`)
/// - The database write fails
#[instrument(skip(store, input), fields(name = %input.name))]
pub async fn create_product(store: &Store, input: ProductInput) -> Result<product::Model> {
    let name = validated_name(&input)?;

    // Use a transaction so a failed resolution leaves nothing behind
    let txn = store.conn().begin().await?;

    let category_id = if input.category > 0 {
        Some(resolve::<Category, _>(&txn, input.category).await?.id)
    } else {
        None
    };
    let options = find_many::<SpecificationOption, _>(&txn, &input.specification_options).await?;
    let images = find_many::<Image, _>(&txn, &input.images).await?;

    let model = product::ActiveModel {
        search_vector: Set(search_vector(&name, &input.description)),
        name: Set(name),
        cost: Set(input.cost),
        description: Set(input.description),
        category_id: Set(category_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if !options.is_empty() {
        link_options(&txn, model.id, &options).await?;
    }
    if !images.is_empty() {
        attach_images(&txn, model.id, &images).await?;
    }

    txn.commit().await?;
    info!("Created product {} '{}'", model.id, model.name);
    Ok(model)
}

/// Updates an existing product with the same inputs as [`create_product`].
///
/// Relations given as 0 or an empty list are left as they are.
///
/// # Errors
/// Same as [`create_product`], plus `Error::NotFound` if the product does not exist.
#[instrument(skip(store, input), fields(name = %input.name))]
pub async fn update_product(
    store: &Store,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let name = validated_name(&input)?;

    let txn = store.conn().begin().await?;

    let mut model: product::ActiveModel = resolve::<Product, _>(&txn, product_id).await?.into();
    if input.category > 0 {
        let category = resolve::<Category, _>(&txn, input.category).await?;
        model.category_id = Set(Some(category.id));
    }
    let options = find_many::<SpecificationOption, _>(&txn, &input.specification_options).await?;
    let images = find_many::<Image, _>(&txn, &input.images).await?;

    model.search_vector = Set(search_vector(&name, &input.description));
    model.name = Set(name);
    model.cost = Set(input.cost);
    model.description = Set(input.description);
    let updated = model.update(&txn).await?;

    if !input.specification_options.is_empty() {
        link_options(&txn, product_id, &options).await?;
    }
    if !input.images.is_empty() {
        attach_images(&txn, product_id, &images).await?;
    }

    txn.commit().await?;
    info!("Updated product {}", product_id);
    Ok(updated)
}

/// Deletes a product. Its option links cascade and its images are detached.
///
/// # Errors
/// Returns `Error::NotFound` if no product has this id, and `Error::Validation`
/// if the product has been purchased or ordered.
pub async fn delete_product(store: &Store, product_id: i64) -> Result<()> {
    let txn = store.conn().begin().await?;
    resolve::<Product, _>(&txn, product_id).await?;

    let purchases = Purchase::find()
        .filter(purchase::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    let lines = ProductLine::find()
        .filter(product_line::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    if purchases > 0 || lines > 0 {
        return Err(Error::validation(format!(
            "product {product_id} has been purchased or ordered and cannot be deleted"
        )));
    }

    remove::<Product, _>(&txn, product_id).await?;
    txn.commit().await?;
    info!("Deleted product {}", product_id);
    Ok(())
}
