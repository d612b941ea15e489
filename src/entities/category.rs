//! Category entity - a leaf of the catalog tree that products are filed under.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Owning super category, if any
    pub super_category_id: Option<i64>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category may belong to one super category
    #[sea_orm(
        belongs_to = "super::super_category::Entity",
        from = "Column::SuperCategoryId",
        to = "super::super_category::Column::Id",
        on_delete = "SetNull"
    )]
    SuperCategory,
    /// One category holds many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::super_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuperCategory.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
