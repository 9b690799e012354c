//! # Persistence Store
//!
//! The one capability set every backend implements.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Arc<dyn PersistenceStore>                           │
//! │                               │                                         │
//! │              ┌────────────────┴────────────────┐                        │
//! │              ▼                                 ▼                        │
//! │  ┌───────────────────────┐        ┌───────────────────────────┐         │
//! │  │     SqliteStore       │        │      FlatFileStore        │         │
//! │  │  BEGIN … COMMIT       │        │  journal → snapshot → log │         │
//! │  │  sold = SUM(period)   │        │  sold stored in snapshot  │         │
//! │  └───────────────────────┘        └───────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both backends pass the same contract suite (`tests/store_contract.rs`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::archive::ArchiveSink;
use crate::error::DbResult;
use hotel_core::{OrderRequest, SaleRecord, StockEntry, User};

/// Durable home of the catalog, stock, sale history and users.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Short backend name for logs and CLI output.
    fn backend(&self) -> &'static str;

    /// Catalog and stock, ordered by category then name.
    async fn load_catalog_and_stock(&self) -> DbResult<Vec<StockEntry>>;

    /// Debits stock and appends the sale as one indivisible unit.
    ///
    /// Remaining stock is re-checked under the store's own lock. On any
    /// error the store is left exactly as it was before the call.
    async fn atomic_order(&self, order: &OrderRequest) -> DbResult<SaleRecord>;

    /// Sales at or after `start`, in timestamp order, ties in insertion order.
    async fn sales_since(&self, start: DateTime<Utc>) -> DbResult<Vec<SaleRecord>>;

    /// Sets an item's total stocked quantity. Rejects `new_quantity < sold`.
    async fn restock(&self, item: &str, new_quantity: i64) -> DbResult<StockEntry>;

    /// Writes `records` to `sink`, then zeroes every item's `sold`.
    ///
    /// A sink failure returns before anything is reset. History is kept.
    /// Returns the number of records archived.
    async fn rollover_period(
        &self,
        records: &[SaleRecord],
        sink: &mut (dyn ArchiveSink + Send),
    ) -> DbResult<usize>;

    /// Adds a user; a taken username is a `UniqueViolation`.
    async fn insert_user(&self, user: &User) -> DbResult<()>;

    /// Looks up a user by username.
    async fn find_user(&self, username: &str) -> DbResult<Option<User>>;
}

/// Writes every record to the sink and finishes it.
pub(crate) fn drain_into_sink(
    records: &[SaleRecord],
    sink: &mut (dyn ArchiveSink + Send),
) -> DbResult<usize> {
    for record in records {
        sink.write_record(record)?;
    }
    sink.finish()?;
    Ok(records.len())
}
