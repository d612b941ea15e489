//! Specification entity - a named product attribute such as "Color" or "RAM".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Specification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "specifications")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Attribute name
    pub name: String,
}

/// Defines relationships between Specification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One specification offers many option values
    #[sea_orm(has_many = "super::specification_option::Entity")]
    Options,
}

impl Related<super::specification_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
