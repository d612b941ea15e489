//! User entity - a registered storefront account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, stored trimmed and lower-cased
    #[sea_orm(unique)]
    pub email: String,
    /// Salted password digest, `salt$hash` in hex
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Orders placed by the user
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// Completed purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
