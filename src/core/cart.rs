//! Shopping cart and purchases.
//!
//! The cart lives only for the shopper's session and is never written to the
//! database. Checking out turns each product in the cart into a `Purchase`
//! row, all in one transaction.

use crate::{
    entities::{Product, User, product, purchase},
    errors::Result,
    store::{Store, resolve, resolve_many},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Products the shopper intends to buy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    product_ids: BTreeSet<i64>,
}

impl Cart {
    /// Adds a product; returns false if it was already in the cart
    pub fn add(&mut self, product_id: i64) -> bool {
        self.product_ids.insert(product_id)
    }

    /// Removes a product; returns false if it was not in the cart
    pub fn remove(&mut self, product_id: i64) -> bool {
        self.product_ids.remove(&product_id)
    }

    /// Whether the product is in the cart
    #[must_use]
    pub fn contains(&self, product_id: i64) -> bool {
        self.product_ids.contains(&product_id)
    }

    /// Number of distinct products
    #[must_use]
    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    /// True when nothing has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    /// Product ids in ascending order
    pub fn product_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.product_ids.iter().copied()
    }
}

/// A product row paired with the per-request cart flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    /// The product
    #[serde(flatten)]
    pub product: product::Model,
    /// Whether the product is in the shopper's cart
    pub is_in_cart: bool,
}

/// Lists all products ordered by name, flagging the ones in `cart`.
pub async fn product_cards(store: &Store, cart: &Cart) -> Result<Vec<ProductCard>> {
    let products = crate::core::product::list_products(store).await?;
    Ok(products
        .into_iter()
        .map(|product| ProductCard {
            is_in_cart: cart.contains(product.id),
            product,
        })
        .collect())
}

/// Records a single purchase.
///
/// # Errors
/// Returns `Error::NotFound` if the user or product does not exist.
pub async fn record_purchase(
    store: &Store,
    user_id: i64,
    product_id: i64,
) -> Result<purchase::Model> {
    resolve::<User, _>(store.conn(), user_id).await?;
    resolve::<Product, _>(store.conn(), product_id).await?;

    purchase::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        purchased_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(store.conn())
    .await
    .map_err(Into::into)
}

/// Turns every product in the cart into a purchase and empties the cart.
///
/// Nothing is written if the user or any product is missing; the cart is only
/// cleared after the transaction commits.
pub async fn checkout(store: &Store, user_id: i64, cart: &mut Cart) -> Result<Vec<purchase::Model>> {
    let txn = store.conn().begin().await?;

    resolve::<User, _>(&txn, user_id).await?;
    let ids: Vec<i64> = cart.product_ids().collect();
    let products = resolve_many::<Product, _>(&txn, &ids).await?;

    let now = chrono::Utc::now();
    let mut purchases = Vec::with_capacity(products.len());
    for product in &products {
        let purchase = purchase::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product.id),
            purchased_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        purchases.push(purchase);
    }

    txn.commit().await?;
    *cart = Cart::default();
    info!(
        "User {} checked out {} products",
        user_id,
        purchases.len()
    );
    Ok(purchases)
}

/// Lists a user's purchases, newest first.
pub async fn purchases_for_user(store: &Store, user_id: i64) -> Result<Vec<purchase::Model>> {
    store
        .purchases()
        .filter(purchase::Column::UserId.eq(user_id))
        .order_by_desc(purchase::Column::PurchasedAt)
        .order_by_desc(purchase::Column::Id)
        .all(store.conn())
        .await
        .map_err(Into::into)
}
