//! # Sales Reporting
//!
//! Daily totals, the inventory report, and period rollover.
//!
//! ## Rollover
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  archive_and_reset(now, confirm, actor, sink)                           │
//! │       │                                                                 │
//! │       ├── confirm == false  → Ok(None), nothing touched                 │
//! │       ├── actor not admin   → PermissionDenied                          │
//! │       ├── records = today's sales (UTC day of `now`)                    │
//! │       ▼                                                                 │
//! │  store.rollover_period(records, sink)                                   │
//! │       ├── sink.write_record × N, sink.finish()                          │
//! │       └── sold = 0 for every item (history kept)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::archive::ArchiveSink;
use crate::error::DbResult;
use crate::store::PersistenceStore;
use hotel_core::report::{aggregate_daily, day_bounds, inventory_lines, records_on_day};
use hotel_core::{DailyTotals, InventoryLine, SaleRecord, User};

/// Read-side reports plus the rollover operation.
#[derive(Clone)]
pub struct SalesReporter {
    store: Arc<dyn PersistenceStore>,
}

impl SalesReporter {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        SalesReporter { store }
    }

    /// Sale records on the UTC day containing `now`, in timestamp order.
    pub async fn day_records(&self, now: DateTime<Utc>) -> DbResult<Vec<SaleRecord>> {
        let (start, _) = day_bounds(now);
        let records = self.store.sales_since(start).await?;
        Ok(records_on_day(&records, now.date_naive()))
    }

    /// Units sold and revenue per item for the day containing `now`.
    ///
    /// Read-only; repeated calls with no order in between agree.
    pub async fn daily_totals(&self, now: DateTime<Utc>) -> DbResult<DailyTotals> {
        let records = self.day_records(now).await?;
        let totals = aggregate_daily(&records, now.date_naive());
        debug!(
            day = %totals.day,
            lines = totals.lines.len(),
            revenue = totals.total_revenue.units(),
            "Daily totals"
        );
        Ok(totals)
    }

    /// Price, quantity, sold and remaining per item.
    pub async fn inventory_snapshot(&self) -> DbResult<Vec<InventoryLine>> {
        let entries = self.store.load_catalog_and_stock().await?;
        Ok(inventory_lines(&entries))
    }

    /// Archives today's sales to `sink` and starts a new period.
    ///
    /// Returns `None` when `confirm` is false, otherwise the number of
    /// records archived.
    pub async fn archive_and_reset(
        &self,
        now: DateTime<Utc>,
        confirm: bool,
        actor: &User,
        sink: &mut (dyn ArchiveSink + Send),
    ) -> DbResult<Option<usize>> {
        if !confirm {
            debug!("Rollover not confirmed, nothing to do");
            return Ok(None);
        }
        actor.require_admin("Archive and reset")?;

        let records = self.day_records(now).await?;
        let archived = self.store.rollover_period(&records, sink).await?;

        info!(archived, user = %actor.username, "Sales archived and counters reset");
        Ok(Some(archived))
    }
}
