//! Order entity - a placed order with recipient, delivery and status tracking.
//!
//! The allowed status moves live in `core::order`; this module only declares
//! the stored shape and the two enums persisted as text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Progress of an order from placement to hand-over
#[derive(
    Debug, Copy, Clone, Hash, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum OrderStatus {
    /// Placed, awaiting payment
    #[sea_orm(string_value = "not_paid")]
    NotPaid,
    /// Payment received
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Being packed in the warehouse
    #[sea_orm(string_value = "packing")]
    Packing,
    /// Handed to the courier
    #[sea_orm(string_value = "delivering")]
    Delivering,
    /// Received by the recipient
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Abandoned before delivery
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// How the order reaches the recipient
#[derive(
    Debug, Copy, Clone, Hash, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DeliveryType {
    /// Courier delivery to `delivery_address`
    #[sea_orm(string_value = "delivery")]
    Delivery,
    /// Collected by the recipient; no address needed
    #[sea_orm(string_value = "pickup")]
    Pickup,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the order was placed
    pub order_time: DateTimeUtc,
    /// Account that placed the order
    pub user_id: i64,
    /// Recipient given name
    pub recipient_name: String,
    /// Recipient family name
    pub recipient_surname: String,
    /// Recipient contact email
    pub recipient_email: String,
    /// Total cost of all lines at the time of ordering
    pub amount: i64,
    /// Current workflow status
    pub status: OrderStatus,
    /// Delivery or pickup
    pub delivery_type: DeliveryType,
    /// Shipping address, set when `delivery_type` is `Delivery`
    pub delivery_address: Option<String>,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Lines of the order
    #[sea_orm(has_many = "super::product_line::Entity")]
    ProductLines,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::product_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
