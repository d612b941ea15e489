//! Persistence context - the single owner of the database connection.
//!
//! A `Store` wraps the pooled connection together with the configured text
//! collation and hands out one typed collection (a `SeaORM` query builder) per
//! entity kind. Relation ids are resolved with [`resolve`] and [`resolve_many`],
//! which fail loudly when a referenced row does not exist, or loaded leniently
//! with [`find_many`], which skips them.

use crate::config::database::{DatabaseSettings, TextCollation};
use crate::entities::{
    Category, Image, Order, Product, ProductLine, Purchase, Specification, SpecificationOption,
    SuperCategory, User,
};
use crate::errors::{Error, Result};
use sea_orm::sea_query::{Expr, Order as SortOrder};
use sea_orm::{
    ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityName, EntityTrait,
    IdenStatic, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, Select,
};
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Shared handle to the storefront database
#[derive(Debug, Clone)]
pub struct Store {
    conn: DatabaseConnection,
    collation: TextCollation,
}

impl Store {
    /// Wraps an already open connection
    #[must_use]
    pub const fn new(conn: DatabaseConnection, collation: TextCollation) -> Self {
        Self { conn, collation }
    }

    /// Connects to the target selected in `settings`.
    ///
    /// Connection failures are returned as-is; there is no retry.
    #[instrument(skip(settings), fields(target = ?settings.target))]
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let conn = Database::connect(settings.connect_options()).await?;
        info!("Connected to {:?} database", settings.target);
        Ok(Self::new(conn, settings.collation))
    }

    /// The underlying connection, for queries and transactions
    #[must_use]
    pub const fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Collation used by [`Store::sorted_by_name`]
    #[must_use]
    pub const fn collation(&self) -> TextCollation {
        self.collation
    }

    /// Orders a query by a text column under the configured collation
    #[must_use]
    pub fn sorted_by_name<E, C>(&self, select: Select<E>, column: C) -> Select<E>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        let ordering = Expr::cust(format!(
            "\"{}\" COLLATE {}",
            column.as_str(),
            self.collation.sql_name()
        ));
        select.order_by(ordering, SortOrder::Asc)
    }

    /// Products collection
    #[must_use]
    pub fn products(&self) -> Select<Product> {
        Product::find()
    }

    /// Categories collection
    #[must_use]
    pub fn categories(&self) -> Select<Category> {
        Category::find()
    }

    /// Super categories collection
    #[must_use]
    pub fn super_categories(&self) -> Select<SuperCategory> {
        SuperCategory::find()
    }

    /// Specifications collection
    #[must_use]
    pub fn specifications(&self) -> Select<Specification> {
        Specification::find()
    }

    /// Specification options collection
    #[must_use]
    pub fn specification_options(&self) -> Select<SpecificationOption> {
        SpecificationOption::find()
    }

    /// Images collection
    #[must_use]
    pub fn images(&self) -> Select<Image> {
        Image::find()
    }

    /// Users collection
    #[must_use]
    pub fn users(&self) -> Select<User> {
        User::find()
    }

    /// Orders collection
    #[must_use]
    pub fn orders(&self) -> Select<Order> {
        Order::find()
    }

    /// Product lines collection
    #[must_use]
    pub fn product_lines(&self) -> Select<ProductLine> {
        ProductLine::find()
    }

    /// Purchases collection
    #[must_use]
    pub fn purchases(&self) -> Select<Purchase> {
        Purchase::find()
    }
}

fn primary_column<E: EntityTrait>() -> Result<E::Column> {
    E::PrimaryKey::iter()
        .next()
        .map(PrimaryKeyToColumn::into_column)
        .ok_or_else(|| Error::Config {
            message: format!("Entity '{}' has no primary key", E::default().table_name()),
        })
}

/// Looks up a row by id, failing with `Error::NotFound` when it does not exist.
///
/// This is a first-match lookup: callers that want a soft miss should use
/// `find_by_id` directly.
pub async fn resolve<E, C>(conn: &C, id: i64) -> Result<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::not_found(E::default().table_name(), id))
}

/// Loads the rows whose id appears in `ids`, skipping ids without a row.
///
/// Duplicate ids are collapsed. The returned rows are in database order.
pub async fn find_many<E, C>(conn: &C, ids: &[i64]) -> Result<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let column = primary_column::<E>()?;
    E::find()
        .filter(column.is_in(wanted))
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Resolves every id in `ids`, failing on the first id without a matching row.
///
/// Duplicate ids are collapsed. The returned rows are in database order.
pub async fn resolve_many<E, C>(conn: &C, ids: &[i64]) -> Result<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let rows = find_many::<E, C>(conn, ids).await?;
    let column = primary_column::<E>()?;
    let found: BTreeSet<i64> = rows
        .iter()
        .filter_map(|row| row_id::<E>(row, column))
        .collect();
    if let Some(missing) = ids.iter().copied().find(|id| !found.contains(id)) {
        return Err(Error::not_found(E::default().table_name(), missing));
    }
    Ok(rows)
}

fn row_id<E: EntityTrait>(row: &E::Model, column: E::Column) -> Option<i64> {
    use sea_orm::{ModelTrait, Value};
    match row.get(column) {
        Value::BigInt(Some(id)) => Some(id),
        Value::Int(Some(id)) => Some(i64::from(id)),
        _ => None,
    }
}

/// Deletes a row by id and returns the number of rows removed (0 or 1)
pub async fn remove<E, C>(conn: &C, id: i64) -> Result<u64>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    let result = E::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
