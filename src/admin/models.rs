//! [`AdminModel`] implementations for the catalog entities.

use super::{AdminModel, BoundForm, EntityDescriptor, FormValues, descriptors};
use crate::{
    core::{
        cart::Cart,
        catalog,
        product::{self, ProductInput},
    },
    entities::{Category, Image, Product, Specification, SpecificationOption, SuperCategory},
    errors::{Error, Result},
    store::{Store, remove, resolve},
};
use sea_orm::{EntityName, EntityTrait, PrimaryKeyTrait};
use tracing::info;

async fn delete_row<E>(store: &Store, id: i64) -> Result<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    let table = E::default().table_name().to_string();
    if remove::<E, _>(store.conn(), id).await? == 0 {
        return Err(Error::not_found(table, id));
    }
    info!("Deleted {} {}", table, id);
    Ok(())
}

fn optional_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn product_input(form: &BoundForm) -> ProductInput {
    ProductInput {
        name: form.text("name").to_string(),
        cost: form.integer("cost"),
        description: form.text("description").to_string(),
        category: form.id("category"),
        specification_options: form.ids("specification_options"),
        images: form.ids("images"),
    }
}

impl AdminModel for Product {
    const DESCRIPTOR: &'static EntityDescriptor = &descriptors::PRODUCT;

    async fn create(store: &Store, form: &BoundForm) -> Result<i64> {
        Ok(product::create_product(store, product_input(form)).await?.id)
    }

    async fn update(store: &Store, id: i64, form: &BoundForm) -> Result<()> {
        product::update_product(store, id, product_input(form)).await?;
        Ok(())
    }

    async fn delete(store: &Store, id: i64) -> Result<()> {
        product::delete_product(store, id).await
    }

    async fn current_values(store: &Store, id: i64) -> Result<FormValues> {
        let details = product::load_product_details(store, id, &Cart::default()).await?;
        let mut values = FormValues::from_pairs([
            ("name", details.product.name.clone()),
            ("cost", details.product.cost.to_string()),
            ("description", details.product.description.clone()),
            ("category", optional_id(details.product.category_id)),
        ]);
        for option in &details.specification_options {
            values.push("specification_options", option.id.to_string());
        }
        for image in &details.images {
            values.push("images", image.id.to_string());
        }
        Ok(values)
    }
}

impl AdminModel for Category {
    const DESCRIPTOR: &'static EntityDescriptor = &descriptors::CATEGORY;

    async fn create(store: &Store, form: &BoundForm) -> Result<i64> {
        let created =
            catalog::create_category(store, form.text("name"), form.id("super_category")).await?;
        Ok(created.id)
    }

    async fn update(store: &Store, id: i64, form: &BoundForm) -> Result<()> {
        catalog::update_category(store, id, form.text("name"), form.id("super_category")).await?;
        Ok(())
    }

    async fn delete(store: &Store, id: i64) -> Result<()> {
        delete_row::<Self>(store, id).await
    }

    async fn current_values(store: &Store, id: i64) -> Result<FormValues> {
        let model = resolve::<Self, _>(store.conn(), id).await?;
        Ok(FormValues::from_pairs([
            ("name", model.name),
            ("super_category", optional_id(model.super_category_id)),
        ]))
    }
}

impl AdminModel for SuperCategory {
    const DESCRIPTOR: &'static EntityDescriptor = &descriptors::SUPER_CATEGORY;

    async fn create(store: &Store, form: &BoundForm) -> Result<i64> {
        Ok(catalog::create_super_category(store, form.text("name")).await?.id)
    }

    async fn update(store: &Store, id: i64, form: &BoundForm) -> Result<()> {
        catalog::update_super_category(store, id, form.text("name")).await?;
        Ok(())
    }

    async fn delete(store: &Store, id: i64) -> Result<()> {
        delete_row::<Self>(store, id).await
    }

    async fn current_values(store: &Store, id: i64) -> Result<FormValues> {
        let model = resolve::<Self, _>(store.conn(), id).await?;
        Ok(FormValues::from_pairs([("name", model.name)]))
    }
}

impl AdminModel for Specification {
    const DESCRIPTOR: &'static EntityDescriptor = &descriptors::SPECIFICATION;

    async fn create(store: &Store, form: &BoundForm) -> Result<i64> {
        Ok(catalog::create_specification(store, form.text("name")).await?.id)
    }

    async fn update(store: &Store, id: i64, form: &BoundForm) -> Result<()> {
        catalog::update_specification(store, id, form.text("name")).await?;
        Ok(())
    }

    async fn delete(store: &Store, id: i64) -> Result<()> {
        delete_row::<Self>(store, id).await
    }

    async fn current_values(store: &Store, id: i64) -> Result<FormValues> {
        let model = resolve::<Self, _>(store.conn(), id).await?;
        Ok(FormValues::from_pairs([("name", model.name)]))
    }
}

impl AdminModel for SpecificationOption {
    const DESCRIPTOR: &'static EntityDescriptor = &descriptors::SPECIFICATION_OPTION;

    async fn create(store: &Store, form: &BoundForm) -> Result<i64> {
        let created = catalog::create_specification_option(
            store,
            form.text("value"),
            form.id("specification"),
        )
        .await?;
        Ok(created.id)
    }

    async fn update(store: &Store, id: i64, form: &BoundForm) -> Result<()> {
        catalog::update_specification_option(
            store,
            id,
            form.text("value"),
            form.id("specification"),
        )
        .await?;
        Ok(())
    }

    async fn delete(store: &Store, id: i64) -> Result<()> {
        delete_row::<Self>(store, id).await
    }

    async fn current_values(store: &Store, id: i64) -> Result<FormValues> {
        let model = resolve::<Self, _>(store.conn(), id).await?;
        Ok(FormValues::from_pairs([
            ("value", model.value),
            ("specification", optional_id(model.specification_id)),
        ]))
    }
}

impl AdminModel for Image {
    const DESCRIPTOR: &'static EntityDescriptor = &descriptors::IMAGE;

    async fn create(store: &Store, form: &BoundForm) -> Result<i64> {
        Ok(catalog::create_image(store, form.text("path"), form.id("product")).await?.id)
    }

    async fn update(store: &Store, id: i64, form: &BoundForm) -> Result<()> {
        catalog::update_image(store, id, form.text("path"), form.id("product")).await?;
        Ok(())
    }

    async fn delete(store: &Store, id: i64) -> Result<()> {
        delete_row::<Self>(store, id).await
    }

    async fn current_values(store: &Store, id: i64) -> Result<FormValues> {
        let model = resolve::<Self, _>(store.conn(), id).await?;
        Ok(FormValues::from_pairs([
            ("path", model.path),
            ("product", optional_id(model.product_id)),
        ]))
    }
}
