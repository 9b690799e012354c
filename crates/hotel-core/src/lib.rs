//! # hotel-core: Pure Business Logic for Hotel POS
//!
//! This crate is the **heart** of Hotel POS. It contains the inventory and
//! order rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hotel POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    hotel-cli (binary)                           │   │
//! │  │    order, restock, report, inventory, rollover, add-user        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         hotel-db services + PersistenceStore backends           │   │
//! │  │            SQLite (sqlx)  │  flat files (snapshot + log)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hotel-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │ catalog │ │ ledger  │ │ report  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, SaleRecord, User, Receipt)
//! - [`money`] - Integer money in smallest currency units
//! - [`catalog`] - Sellable items and the default catalog
//! - [`ledger`] - Stock counters and the `0 ≤ sold ≤ quantity` rule
//! - [`report`] - Daily totals and inventory rows
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use hotel_core::StockLedger;
//!
//! let mut ledger = StockLedger::bootstrap();
//! ledger.restock("Burger", 10).unwrap();
//! ledger.debit("Burger", 3).unwrap();
//! assert_eq!(ledger.remaining("Burger").unwrap(), 7);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::ItemCatalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{StockEntry, StockLedger, StockRecord};
pub use money::Money;
pub use report::{DailyTotals, InventoryLine, ItemTotal};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Username of the account present in every fresh user directory.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 50;
