//! Specification option entity - one concrete value of a specification ("Black", "16 GB").
//!
//! Options are attached to products through the `product_specification_options` join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Specification option database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "specification_options")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The option value shown to shoppers
    pub value: String,
    /// Specification this value belongs to
    pub specification_id: Option<i64>,
}

/// Defines relationships between `SpecificationOption` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each option belongs to one specification
    #[sea_orm(
        belongs_to = "super::specification::Entity",
        from = "Column::SpecificationId",
        to = "super::specification::Column::Id",
        on_delete = "Cascade"
    )]
    Specification,
    /// Join rows linking this option to products
    #[sea_orm(has_many = "super::product_specification_option::Entity")]
    ProductLinks,
}

impl Related<super::specification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Specification.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_specification_option::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_specification_option::Relation::SpecificationOption.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
