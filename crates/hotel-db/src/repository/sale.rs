//! # Sale Repository
//!
//! Database operations for the append-only sale history.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. INSERT (inside the order transaction)                              │
//! │     └── insert() → row booked against the current period               │
//! │                                                                         │
//! │  2. REPORT                                                             │
//! │     └── list_since() → rows joined with inventory for category         │
//! │                                                                         │
//! │  3. ROLLOVER                                                           │
//! │     └── nothing happens to the row; the period moves on                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hotel_core::{format_timestamp, parse_timestamp, Category, Money, SaleRecord};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    item: String,
    category: Category,
    quantity: i64,
    unit_price_units: i64,
    total_price_units: i64,
    user_name: String,
    sold_at: String,
}

impl SaleRow {
    fn into_record(self) -> DbResult<SaleRecord> {
        Ok(SaleRecord {
            sold_at: parse_timestamp(&self.sold_at).ok_or_else(|| {
                DbError::PersistenceUnavailable(format!("bad sold_at value '{}'", self.sold_at))
            })?,
            item: self.item,
            category: self.category,
            quantity: self.quantity,
            unit_price: Money::from_units(self.unit_price_units),
            total: Money::from_units(self.total_price_units),
            user: self.user_name,
        })
    }
}

/// Repository for sale database operations.
#[derive(Debug)]
pub struct SaleRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SaleRepository<'c> {
    /// Creates a repository over a borrowed connection or transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        SaleRepository { conn }
    }

    /// Appends a sale row.
    ///
    /// ## Snapshot Pattern
    /// Unit price and total are copied into the row, so history is stable
    /// even if the catalog price changes later.
    pub async fn insert(&mut self, item_id: i64, period: i64, record: &SaleRecord) -> DbResult<i64> {
        debug!(
            item = %record.item,
            quantity = record.quantity,
            total = record.total.units(),
            period,
            "Inserting sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                item_id, period, quantity,
                unit_price_units, total_price_units,
                user_name, sold_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item_id)
        .bind(period)
        .bind(record.quantity)
        .bind(record.unit_price.units())
        .bind(record.total.units())
        .bind(&record.user)
        .bind(format_timestamp(record.sold_at))
        .execute(&mut *self.conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Sales at or after `start`, in timestamp order (ties in insertion order).
    pub async fn list_since(&mut self, start: DateTime<Utc>) -> DbResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                i.name AS item,
                i.category,
                s.quantity,
                s.unit_price_units,
                s.total_price_units,
                s.user_name,
                s.sold_at
            FROM sales s
            JOIN inventory i ON i.id = s.item_id
            WHERE s.sold_at >= ?1
            ORDER BY s.sold_at, s.id
            "#,
        )
        .bind(format_timestamp(start))
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(SaleRow::into_record).collect()
    }

    /// Total number of sale rows across all periods.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }
}
