//! Product entity - an item offered in the storefront catalog.
//!
//! A product is filed under at most one category, carries any number of
//! specification options (via `product_specification_options`) and images,
//! and is referenced by purchases and order lines. `search_vector` is derived
//! from name and description on every write and never edited directly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (never empty)
    pub name: String,
    /// Price in whole currency units (never negative)
    pub cost: i64,
    /// Free-form description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Category the product is filed under, if any
    pub category_id: Option<i64>,
    /// Normalized search tokens built from name and description
    #[sea_orm(column_type = "Text")]
    pub search_vector: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to at most one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    /// One product has many images
    #[sea_orm(has_many = "super::image::Entity")]
    Images,
    /// Join rows to specification options
    #[sea_orm(has_many = "super::product_specification_option::Entity")]
    SpecificationLinks,
    /// Completed purchases of this product
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
    /// Order lines referencing this product
    #[sea_orm(has_many = "super::product_line::Entity")]
    ProductLines,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::product_specification_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecificationLinks.def()
    }
}

impl Related<super::specification_option::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_specification_option::Relation::SpecificationOption.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_specification_option::Relation::Product.def().rev())
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::product_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
