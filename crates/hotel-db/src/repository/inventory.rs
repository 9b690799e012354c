//! # Inventory Repository
//!
//! Database operations for items, their stock and the ledger period.
//!
//! ## How `sold` Is Derived
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inventory                 sales                    ledger_period       │
//! │  ┌──────────────┐          ┌──────────────────┐     ┌────────────────┐ │
//! │  │ id  name qty │◄─────────│ item_id period q │     │ current_period │ │
//! │  │ 2   Burger 10│          │ 2       0      3 │     │       1        │ │
//! │  └──────────────┘          │ 2       1      2 │ ◄───┴────────────────┘ │
//! │                            └──────────────────┘                         │
//! │                                                                         │
//! │  sold(Burger) = SUM(q WHERE period = current_period) = 2                │
//! │  remaining    = 10 − 2 = 8                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories borrow a connection rather than owning the pool so the
//! store can run several of them inside one transaction.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use hotel_core::{Category, Item, Money, StockEntry, StockRecord};

/// One inventory row joined with the current period's sold count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryRow {
    pub id: i64,
    pub name: String,
    pub price_units: i64,
    pub quantity: i64,
    pub category: Category,
    pub sold: i64,
}

impl InventoryRow {
    /// Converts to the core type, checking the stock invariant on the way.
    pub fn to_entry(&self) -> DbResult<StockEntry> {
        let item = Item {
            name: self.name.clone(),
            price: Money::from_units(self.price_units),
            category: self.category,
        };
        let stock = StockRecord::new(&self.name, self.quantity, self.sold)?;
        Ok(StockEntry::new(item, stock))
    }
}

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut tx = db.pool().begin().await?;
/// let row = InventoryRepository::new(&mut tx).find_with_stock("Burger").await?;
/// ```
#[derive(Debug)]
pub struct InventoryRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> InventoryRepository<'c> {
    /// Creates a repository over a borrowed connection or transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        InventoryRepository { conn }
    }

    /// All items with stock, ordered by category then name.
    pub async fn list_with_stock(&mut self) -> DbResult<Vec<InventoryRow>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT
                i.id,
                i.name,
                i.price_units,
                i.quantity,
                i.category,
                COALESCE((
                    SELECT SUM(s.quantity) FROM sales s
                    WHERE s.item_id = i.id
                      AND s.period = (SELECT current_period FROM ledger_period WHERE id = 1)
                ), 0) AS sold
            FROM inventory i
            ORDER BY i.category, i.name
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// One item with stock, by name.
    pub async fn find_with_stock(&mut self, name: &str) -> DbResult<Option<InventoryRow>> {
        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT
                i.id,
                i.name,
                i.price_units,
                i.quantity,
                i.category,
                COALESCE((
                    SELECT SUM(s.quantity) FROM sales s
                    WHERE s.item_id = i.id
                      AND s.period = (SELECT current_period FROM ledger_period WHERE id = 1)
                ), 0) AS sold
            FROM inventory i
            WHERE i.name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row)
    }

    /// Number of catalog items.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }

    /// Inserts a catalog item with the given stocked quantity.
    pub async fn insert_item(&mut self, item: &Item, quantity: i64) -> DbResult<i64> {
        debug!(name = %item.name, price = item.price.units(), "Inserting item");

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (name, price_units, quantity, category)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&item.name)
        .bind(item.price.units())
        .bind(quantity)
        .bind(item.category)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Sets the total stocked quantity of an item.
    pub async fn set_quantity(&mut self, id: i64, quantity: i64) -> DbResult<()> {
        debug!(id, quantity, "Setting stocked quantity");

        sqlx::query("UPDATE inventory SET quantity = ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Ledger Period
    // =========================================================================

    /// The period new sales are booked against.
    pub async fn current_period(&mut self) -> DbResult<i64> {
        let period: i64 =
            sqlx::query_scalar("SELECT current_period FROM ledger_period WHERE id = 1")
                .fetch_one(&mut *self.conn)
                .await?;
        Ok(period)
    }

    /// Starts a new period, which zeroes every item's `sold`.
    pub async fn advance_period(&mut self, started_at: &str) -> DbResult<i64> {
        let period: i64 = sqlx::query_scalar(
            r#"
            UPDATE ledger_period
            SET current_period = current_period + 1, started_at = ?1
            WHERE id = 1
            RETURNING current_period
            "#,
        )
        .bind(started_at)
        .fetch_one(&mut *self.conn)
        .await?;

        debug!(period, "Ledger period advanced");
        Ok(period)
    }
}
