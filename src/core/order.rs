//! Order workflow - placing orders and moving them through their status path.
//!
//! Status path: `NotPaid -> Paid -> Packing -> Delivering -> Delivered`.
//! Any state before `Delivered` may also move to `Cancelled`. `Delivered` and
//! `Cancelled` are terminal.

use crate::{
    core::required_text,
    entities::{
        DeliveryType, Order, OrderStatus, Product, ProductLine, User, order, product_line,
    },
    errors::{Error, Result},
    store::{Store, resolve},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

impl OrderStatus {
    /// The status every new order starts in
    pub const INITIAL: Self = Self::NotPaid;

    /// Next step on the normal path, `None` for terminal states
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::NotPaid => Some(Self::Paid),
            Self::Paid => Some(Self::Packing),
            Self::Packing => Some(Self::Delivering),
            Self::Delivering => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether no further change is allowed
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the workflow allows moving from `self` to `to`
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotPaid => "NotPaid",
            Self::Paid => "Paid",
            Self::Packing => "Packing",
            Self::Delivering => "Delivering",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// Who receives the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Contact email
    pub email: String,
}

/// One requested product and quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// Product to order
    pub product_id: i64,
    /// Units, must be positive
    pub quantity: i32,
}

/// Values for placing an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Ordering account
    pub user_id: i64,
    /// Recipient details
    pub recipient: Recipient,
    /// Delivery or pickup
    pub delivery_type: DeliveryType,
    /// Required for `Delivery`, ignored for `Pickup`
    pub delivery_address: Option<String>,
    /// Ordered products
    pub lines: Vec<LineInput>,
}

/// An order with its lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithLines {
    /// The order row
    pub order: order::Model,
    /// Its product lines
    pub lines: Vec<product_line::Model>,
}

/// Checks the delivery rule: an address is required for delivery and dropped for pickup.
///
/// Returns the address to store.
pub fn delivery_address_for(
    delivery_type: DeliveryType,
    address: Option<&str>,
) -> Result<Option<String>> {
    let address = address.map(str::trim).filter(|a| !a.is_empty());
    match (delivery_type, address) {
        (DeliveryType::Delivery, Some(address)) => Ok(Some(address.to_string())),
        (DeliveryType::Delivery, None) => Err(Error::validation(
            "delivery address is required for delivery orders",
        )),
        (DeliveryType::Pickup, _) => Ok(None),
    }
}

/// Places an order in the `NotPaid` state.
///
/// The amount is the sum of each product's current cost times its quantity.
///
/// # Errors
/// Returns an error if:
/// - There are no lines, or a quantity is not positive (`Error::Validation`)
/// - Delivery is requested without an address (`Error::Validation`)
/// - Recipient name or email is empty (`Error::Validation`)
/// - The user or any product does not exist (`Error::NotFound`)
/// - The amount does not fit in an `i64` (`Error::Validation`)
#[instrument(skip(store, new_order), fields(user_id = new_order.user_id))]
pub async fn create_order(store: &Store, new_order: NewOrder) -> Result<OrderWithLines> {
    if new_order.lines.is_empty() {
        return Err(Error::validation("an order needs at least one product line"));
    }
    if let Some(line) = new_order.lines.iter().find(|l| l.quantity <= 0) {
        return Err(Error::validation(format!(
            "quantity for product {} must be positive",
            line.product_id
        )));
    }
    let delivery_address =
        delivery_address_for(new_order.delivery_type, new_order.delivery_address.as_deref())?;
    let recipient_name = required_text("recipient name", &new_order.recipient.name)?;
    let recipient_email = required_text("recipient email", &new_order.recipient.email)?;

    let txn = store.conn().begin().await?;

    resolve::<User, _>(&txn, new_order.user_id).await?;
    let mut amount = 0i64;
    for line in &new_order.lines {
        let product = resolve::<Product, _>(&txn, line.product_id).await?;
        amount = product
            .cost
            .checked_mul(i64::from(line.quantity))
            .and_then(|line_total| amount.checked_add(line_total))
            .ok_or_else(|| Error::validation("order amount overflows"))?;
    }

    let order = order::ActiveModel {
        order_time: Set(chrono::Utc::now()),
        user_id: Set(new_order.user_id),
        recipient_name: Set(recipient_name),
        recipient_surname: Set(new_order.recipient.surname.trim().to_string()),
        recipient_email: Set(recipient_email),
        amount: Set(amount),
        status: Set(OrderStatus::INITIAL),
        delivery_type: Set(new_order.delivery_type),
        delivery_address: Set(delivery_address),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut lines = Vec::with_capacity(new_order.lines.len());
    for line in &new_order.lines {
        let inserted = product_line::ActiveModel {
            product_id: Set(line.product_id),
            order_id: Set(order.id),
            quantity: Set(line.quantity),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        lines.push(inserted);
    }

    txn.commit().await?;
    info!("Placed order {} for amount {}", order.id, amount);
    Ok(OrderWithLines { order, lines })
}

/// Loads an order and its lines.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist.
pub async fn get_order_with_lines(store: &Store, order_id: i64) -> Result<OrderWithLines> {
    let order = resolve::<Order, _>(store.conn(), order_id).await?;
    let lines = order
        .find_related(ProductLine)
        .order_by_asc(product_line::Column::Id)
        .all(store.conn())
        .await?;
    Ok(OrderWithLines { order, lines })
}

/// Lists a user's orders, newest first.
pub async fn orders_for_user(store: &Store, user_id: i64) -> Result<Vec<order::Model>> {
    store
        .orders()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::OrderTime)
        .order_by_desc(order::Column::Id)
        .all(store.conn())
        .await
        .map_err(Into::into)
}

/// Moves an order to `to` if the workflow allows it.
///
/// # Errors
/// Returns `Error::InvalidTransition` for moves off the status path and
/// `Error::NotFound` if the order does not exist.
pub async fn set_order_status(
    store: &Store,
    order_id: i64,
    to: OrderStatus,
) -> Result<order::Model> {
    // Transition check and update share one transaction
    let txn = store.conn().begin().await?;
    let current = resolve::<Order, _>(&txn, order_id).await?;
    let from = current.status;
    if !from.can_transition_to(to) {
        return Err(Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let mut model: order::ActiveModel = current.into();
    model.status = Set(to);
    let updated = model.update(&txn).await?;
    txn.commit().await?;
    info!("Order {} moved from {} to {}", order_id, from, to);
    Ok(updated)
}

/// Moves an order one step along the normal path.
pub async fn advance_order(store: &Store, order_id: i64) -> Result<order::Model> {
    let current = resolve::<Order, _>(store.conn(), order_id).await?;
    let Some(next) = current.status.next() else {
        return Err(Error::InvalidTransition {
            from: current.status.to_string(),
            to: "next".to_string(),
        });
    };
    set_order_status(store, order_id, next).await
}

/// Cancels an order that has not reached a terminal state.
pub async fn cancel_order(store: &Store, order_id: i64) -> Result<order::Model> {
    set_order_status(store, order_id, OrderStatus::Cancelled).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::Iterable;

    fn new_order(user_id: i64, product_id: i64, delivery_type: DeliveryType) -> NewOrder {
        NewOrder {
            user_id,
            recipient: Recipient {
                name: "Ann".to_string(),
                surname: "Lee".to_string(),
                email: "ann@example.com".to_string(),
            },
            delivery_type,
            delivery_address: None,
            lines: vec![LineInput {
                product_id,
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_linear_path_reaches_delivered() {
        let mut status = OrderStatus::INITIAL;
        let mut visited = vec![status];
        while let Some(next) = status.next() {
            assert!(status.can_transition_to(next));
            status = next;
            visited.push(status);
        }
        assert_eq!(
            visited,
            [
                OrderStatus::NotPaid,
                OrderStatus::Paid,
                OrderStatus::Packing,
                OrderStatus::Delivering,
                OrderStatus::Delivered,
            ]
        );
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        for status in OrderStatus::iter() {
            let allowed = status.can_transition_to(OrderStatus::Cancelled);
            assert_eq!(allowed, !status.is_terminal(), "from {status}");
        }
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!OrderStatus::NotPaid.can_transition_to(OrderStatus::Packing));
        assert!(!OrderStatus::Packing.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::NotPaid));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Paid));
    }

    #[test]
    fn test_delivery_address_rules() {
        assert_eq!(
            delivery_address_for(DeliveryType::Pickup, None).unwrap(),
            None
        );
        assert_eq!(
            delivery_address_for(DeliveryType::Pickup, Some("Main St 1")).unwrap(),
            None
        );
        assert_eq!(
            delivery_address_for(DeliveryType::Delivery, Some(" Main St 1 ")).unwrap(),
            Some("Main St 1".to_string())
        );
        assert!(matches!(
            delivery_address_for(DeliveryType::Delivery, Some("   ")),
            Err(Error::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_pickup_order_computes_amount() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;

        let placed = create_order(&store, new_order(user.id, product.id, DeliveryType::Pickup))
            .await?;
        assert_eq!(placed.order.status, OrderStatus::NotPaid);
        assert_eq!(placed.order.amount, product.cost * 2);
        assert_eq!(placed.order.delivery_address, None);
        assert_eq!(placed.lines.len(), 1);
        assert_eq!(placed.lines[0].quantity, 2);

        let loaded = get_order_with_lines(&store, placed.order.id).await?;
        assert_eq!(loaded, placed);
        assert_eq!(orders_for_user(&store, user.id).await?, vec![placed.order]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_without_address_is_rejected() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;

        let result =
            create_order(&store, new_order(user.id, product.id, DeliveryType::Delivery)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut with_address = new_order(user.id, product.id, DeliveryType::Delivery);
        with_address.delivery_address = Some("Main St 1".to_string());
        let placed = create_order(&store, with_address).await?;
        assert_eq!(placed.order.delivery_address.as_deref(), Some("Main St 1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_lines() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;

        let mut zero = new_order(user.id, product.id, DeliveryType::Pickup);
        zero.lines[0].quantity = 0;
        assert!(matches!(
            create_order(&store, zero).await,
            Err(Error::Validation { .. })
        ));

        let mut empty = new_order(user.id, product.id, DeliveryType::Pickup);
        empty.lines.clear();
        assert!(matches!(
            create_order(&store, empty).await,
            Err(Error::Validation { .. })
        ));

        let missing = new_order(user.id, 999, DeliveryType::Pickup);
        assert!(matches!(
            create_order(&store, missing).await,
            Err(Error::NotFound { id: 999, .. })
        ));
        assert!(orders_for_user(&store, user.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_amount_overflow_is_rejected() -> Result<()> {
        let (store, user, _) = setup_with_user_and_product().await?;
        let pricey = create_custom_product(&store, "Yacht", i64::MAX / 2 + 1, 0).await?;

        let result = create_order(&store, new_order(user.id, pricey.id, DeliveryType::Pickup)).await;
        match result {
            Err(Error::Validation { message }) => assert!(message.contains("overflows")),
            other => panic!("Expected Validation, got {other:?}"),
        }
        assert!(orders_for_user(&store, user.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_order_walks_status_path() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;
        let placed = create_order(&store, new_order(user.id, product.id, DeliveryType::Pickup))
            .await?;
        let id = placed.order.id;

        assert_eq!(advance_order(&store, id).await?.status, OrderStatus::Paid);
        assert_eq!(advance_order(&store, id).await?.status, OrderStatus::Packing);
        assert_eq!(advance_order(&store, id).await?.status, OrderStatus::Delivering);
        assert_eq!(advance_order(&store, id).await?.status, OrderStatus::Delivered);

        assert!(matches!(
            cancel_order(&store, id).await,
            Err(Error::InvalidTransition { .. })
        ));
        assert!(matches!(
            advance_order(&store, id).await,
            Err(Error::InvalidTransition { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_from_packing() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;
        let placed = create_order(&store, new_order(user.id, product.id, DeliveryType::Pickup))
            .await?;
        let id = placed.order.id;

        set_order_status(&store, id, OrderStatus::Paid).await?;
        set_order_status(&store, id, OrderStatus::Packing).await?;
        assert_eq!(cancel_order(&store, id).await?.status, OrderStatus::Cancelled);

        let result = set_order_status(&store, id, OrderStatus::Delivering).await;
        match result {
            Err(Error::InvalidTransition { from, to }) => {
                assert_eq!(from, "Cancelled");
                assert_eq!(to, "Delivering");
            }
            other => panic!("Expected InvalidTransition, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_status_change_leaves_order_untouched() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;
        let placed = create_order(&store, new_order(user.id, product.id, DeliveryType::Pickup))
            .await?;
        let id = placed.order.id;

        let result = set_order_status(&store, id, OrderStatus::Delivered).await;
        assert!(matches!(result, Err(Error::InvalidTransition { .. })));
        let stored = get_order_with_lines(&store, id).await?;
        assert_eq!(stored.order.status, OrderStatus::NotPaid);

        let paid = set_order_status(&store, id, OrderStatus::Paid).await?;
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(matches!(
            set_order_status(&store, id + 100, OrderStatus::Paid).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
