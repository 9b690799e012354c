//! # Stock Ledger
//!
//! Quantity and cumulative-sold counters per item.
//!
//! ## The Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  0  ≤  sold  ≤  quantity                                │
//! │                                                                         │
//! │  remaining = quantity − sold      (never negative)                      │
//! │                                                                         │
//! │  debit(qty)       sold += qty        only if qty ≤ remaining            │
//! │  restock(q)       quantity = q       only if q ≥ sold                   │
//! │  reset_period()   sold = 0           rollover                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutator checks first and mutates second, so a rejected call leaves
//! the record untouched. Both storage backends funnel their writes through
//! these methods.

use serde::{Deserialize, Serialize};

use crate::catalog::{listing_order, ItemCatalog};
use crate::error::{CoreError, CoreResult};
use crate::types::Item;

// =============================================================================
// Stock Record
// =============================================================================

/// Counter pair for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    quantity: i64,
    sold: i64,
}

impl StockRecord {
    /// Builds a record, rejecting pairs that break the invariant.
    pub fn new(item: &str, quantity: i64, sold: i64) -> CoreResult<Self> {
        if quantity < 0 || sold < 0 || sold > quantity {
            return Err(CoreError::InvalidRestock {
                item: item.to_string(),
                sold,
                requested: quantity,
            });
        }
        Ok(StockRecord { quantity, sold })
    }

    /// Total units stocked.
    #[inline]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Units sold since the last rollover.
    #[inline]
    pub const fn sold(&self) -> i64 {
        self.sold
    }

    /// Units still available.
    #[inline]
    pub const fn remaining(&self) -> i64 {
        self.quantity - self.sold
    }

    /// Records `qty` units as sold.
    pub fn debit(&mut self, item: &str, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            return Err(CoreError::InvalidQuantity { requested: qty });
        }
        if qty > self.remaining() {
            return Err(CoreError::InsufficientStock {
                item: item.to_string(),
                remaining: self.remaining(),
                requested: qty,
            });
        }
        self.sold += qty;
        Ok(())
    }

    /// Sets the total stocked quantity, keeping `sold`.
    pub fn restock(&mut self, item: &str, new_quantity: i64) -> CoreResult<()> {
        if new_quantity < 0 || new_quantity < self.sold {
            return Err(CoreError::InvalidRestock {
                item: item.to_string(),
                sold: self.sold,
                requested: new_quantity,
            });
        }
        self.quantity = new_quantity;
        Ok(())
    }

    /// Starts a new reporting period.
    pub fn reset_period(&mut self) {
        self.sold = 0;
    }
}

/// An item together with its stock counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub item: Item,
    pub stock: StockRecord,
}

impl StockEntry {
    pub fn new(item: Item, stock: StockRecord) -> Self {
        StockEntry { item, stock }
    }

    /// Entry with nothing stocked and nothing sold.
    pub fn empty(item: Item) -> Self {
        StockEntry {
            item,
            stock: StockRecord::default(),
        }
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// All stock entries, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLedger {
    entries: Vec<StockEntry>,
}

impl StockLedger {
    /// Builds a ledger, sorting entries into listing order.
    pub fn new(mut entries: Vec<StockEntry>) -> Self {
        entries.sort_by(|a, b| listing_order(&a.item, &b.item));
        StockLedger { entries }
    }

    /// Default catalog with zero stock.
    pub fn bootstrap() -> Self {
        StockLedger::new(
            ItemCatalog::default_catalog()
                .items()
                .iter()
                .cloned()
                .map(StockEntry::empty)
                .collect(),
        )
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn get(&self, item: &str) -> CoreResult<&StockEntry> {
        self.entries
            .iter()
            .find(|e| e.item.name == item)
            .ok_or_else(|| CoreError::UnknownItem(item.to_string()))
    }

    fn get_mut(&mut self, item: &str) -> CoreResult<&mut StockEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.item.name == item)
            .ok_or_else(|| CoreError::UnknownItem(item.to_string()))
    }

    /// Remaining stock for one item.
    pub fn remaining(&self, item: &str) -> CoreResult<i64> {
        Ok(self.get(item)?.stock.remaining())
    }

    /// Debits `qty` units; no effect on failure.
    pub fn debit(&mut self, item: &str, qty: i64) -> CoreResult<&StockEntry> {
        let entry = self.get_mut(item)?;
        entry.stock.debit(item, qty)?;
        Ok(entry)
    }

    /// Sets total quantity for one item; no effect on failure.
    pub fn restock(&mut self, item: &str, new_quantity: i64) -> CoreResult<&StockEntry> {
        let entry = self.get_mut(item)?;
        entry.stock.restock(item, new_quantity)?;
        Ok(entry)
    }

    /// Zeroes `sold` for one item.
    pub fn reset_period(&mut self, item: &str) -> CoreResult<()> {
        self.get_mut(item)?.stock.reset_period();
        Ok(())
    }

    /// Zeroes `sold` for every item.
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.stock.reset_period();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
