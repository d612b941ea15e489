//! Catalog business logic - super categories, categories, specifications,
//! specification options and images.
//!
//! Relation ids follow the same convention as products: an id of 0 means
//! "no relation" on create and "leave unchanged" on update, any other id must
//! resolve to an existing row.

use crate::{
    core::required_text,
    entities::{
        Category, Product, Specification, SuperCategory, category, image, specification,
        specification_option, super_category,
    },
    errors::Result,
    store::{Store, resolve},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, QueryFilter, Set};
use tracing::info;

/// Lists all super categories ordered by name.
pub async fn list_super_categories(store: &Store) -> Result<Vec<super_category::Model>> {
    store
        .sorted_by_name(store.super_categories(), super_category::Column::Name)
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Creates a super category.
///
/// # Errors
/// Returns `Error::Validation` if the name is empty.
pub async fn create_super_category(store: &Store, name: &str) -> Result<super_category::Model> {
    let model = super_category::ActiveModel {
        name: Set(required_text("name", name)?),
        ..Default::default()
    }
    .insert(store.conn())
    .await?;
    info!("Created super category {} '{}'", model.id, model.name);
    Ok(model)
}

/// Renames a super category.
pub async fn update_super_category(
    store: &Store,
    id: i64,
    name: &str,
) -> Result<super_category::Model> {
    let name = required_text("name", name)?;
    let mut model: super_category::ActiveModel =
        resolve::<SuperCategory, _>(store.conn(), id).await?.into();
    model.name = Set(name);
    model.update(store.conn()).await.map_err(Into::into)
}

/// Lists all categories ordered by name.
pub async fn list_categories(store: &Store) -> Result<Vec<category::Model>> {
    store
        .sorted_by_name(store.categories(), category::Column::Name)
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Lists the categories filed under one super category.
pub async fn categories_in(store: &Store, super_category_id: i64) -> Result<Vec<category::Model>> {
    store
        .sorted_by_name(
            store
                .categories()
                .filter(category::Column::SuperCategoryId.eq(super_category_id)),
            category::Column::Name,
        )
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Creates a category, optionally filed under a super category.
///
/// # Errors
/// Returns `Error::NotFound` if `super_category` is non-zero and does not exist.
pub async fn create_category(
    store: &Store,
    name: &str,
    super_category: i64,
) -> Result<category::Model> {
    let name = required_text("name", name)?;
    let super_category_id = if super_category > 0 {
        Some(resolve::<SuperCategory, _>(store.conn(), super_category).await?.id)
    } else {
        None
    };

    let model = category::ActiveModel {
        name: Set(name),
        super_category_id: Set(super_category_id),
        ..Default::default()
    }
    .insert(store.conn())
    .await?;
    info!("Created category {} '{}'", model.id, model.name);
    Ok(model)
}

/// Updates a category; `super_category = 0` keeps the current parent.
pub async fn update_category(
    store: &Store,
    id: i64,
    name: &str,
    super_category: i64,
) -> Result<category::Model> {
    let name = required_text("name", name)?;
    let mut model: category::ActiveModel = resolve::<Category, _>(store.conn(), id).await?.into();
    model.name = Set(name);
    if super_category > 0 {
        let parent = resolve::<SuperCategory, _>(store.conn(), super_category).await?;
        model.super_category_id = Set(Some(parent.id));
    }
    model.update(store.conn()).await.map_err(Into::into)
}

/// Lists all specifications ordered by name.
pub async fn list_specifications(store: &Store) -> Result<Vec<specification::Model>> {
    store
        .sorted_by_name(store.specifications(), specification::Column::Name)
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Creates a specification.
pub async fn create_specification(store: &Store, name: &str) -> Result<specification::Model> {
    let model = specification::ActiveModel {
        name: Set(required_text("name", name)?),
        ..Default::default()
    }
    .insert(store.conn())
    .await?;
    info!("Created specification {} '{}'", model.id, model.name);
    Ok(model)
}

/// Renames a specification.
pub async fn update_specification(
    store: &Store,
    id: i64,
    name: &str,
) -> Result<specification::Model> {
    let name = required_text("name", name)?;
    let mut model: specification::ActiveModel =
        resolve::<Specification, _>(store.conn(), id).await?.into();
    model.name = Set(name);
    model.update(store.conn()).await.map_err(Into::into)
}

/// Lists all specification options ordered by value.
pub async fn list_specification_options(
    store: &Store,
) -> Result<Vec<specification_option::Model>> {
    store
        .sorted_by_name(
            store.specification_options(),
            specification_option::Column::Value,
        )
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Creates an option value for a specification.
pub async fn create_specification_option(
    store: &Store,
    value: &str,
    specification: i64,
) -> Result<specification_option::Model> {
    let value = required_text("value", value)?;
    let specification_id = if specification > 0 {
        Some(resolve::<Specification, _>(store.conn(), specification).await?.id)
    } else {
        None
    };

    specification_option::ActiveModel {
        value: Set(value),
        specification_id: Set(specification_id),
        ..Default::default()
    }
    .insert(store.conn())
    .await
    .map_err(Into::into)
}

/// Updates an option value; `specification = 0` keeps the current specification.
pub async fn update_specification_option(
    store: &Store,
    id: i64,
    value: &str,
    specification: i64,
) -> Result<specification_option::Model> {
    let value = required_text("value", value)?;
    let mut model: specification_option::ActiveModel =
        resolve::<crate::entities::SpecificationOption, _>(store.conn(), id)
            .await?
            .into();
    model.value = Set(value);
    if specification > 0 {
        let parent = resolve::<Specification, _>(store.conn(), specification).await?;
        model.specification_id = Set(Some(parent.id));
    }
    model.update(store.conn()).await.map_err(Into::into)
}

/// Lists all images ordered by path.
pub async fn list_images(store: &Store) -> Result<Vec<image::Model>> {
    store
        .sorted_by_name(store.images(), image::Column::Path)
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Registers an image, optionally attached to a product.
pub async fn create_image(store: &Store, path: &str, product: i64) -> Result<image::Model> {
    let path = required_text("path", path)?;
    let product_id = if product > 0 {
        Some(resolve::<Product, _>(store.conn(), product).await?.id)
    } else {
        None
    };

    image::ActiveModel {
        path: Set(path),
        product_id: Set(product_id),
        ..Default::default()
    }
    .insert(store.conn())
    .await
    .map_err(Into::into)
}

/// Updates an image; `product = 0` keeps the current attachment.
pub async fn update_image(
    store: &Store,
    id: i64,
    path: &str,
    product: i64,
) -> Result<image::Model> {
    let path = required_text("path", path)?;
    let mut model: image::ActiveModel =
        resolve::<crate::entities::Image, _>(store.conn(), id).await?.into();
    model.path = Set(path);
    if product > 0 {
        let owner = resolve::<Product, _>(store.conn(), product).await?;
        model.product_id = Set(Some(owner.id));
    }
    model.update(store.conn()).await.map_err(Into::into)
}
