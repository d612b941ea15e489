//! Core business logic - framework-agnostic catalog, product, user, cart and order operations.
//!
//! Every operation takes the [`Store`](crate::store::Store) explicitly; nothing
//! in this module opens its own connection.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod password;
pub mod product;
pub mod seed;
pub mod user;

use crate::errors::{Error, Result};

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
