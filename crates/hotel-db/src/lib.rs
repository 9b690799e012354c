//! # hotel-db: Persistence and Services for Hotel POS
//!
//! Durable storage for the catalog, stock ledger, sale history and users,
//! plus the order and report services that run on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hotel POS Data Flow                              │
//! │                                                                         │
//! │  hotel-cli (order Burger 3 --user desk)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     hotel-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Services    │    │ Persistence   │    │   Archive    │   │   │
//! │  │   │               │    │    Store      │    │              │   │   │
//! │  │   │ OrderProcessor│───►│ SqliteStore   │    │ CsvArchive   │   │   │
//! │  │   │ SalesReporter │    │ FlatFileStore │    │ MemoryArchive│   │   │
//! │  │   │ StaffDirectory│    │               │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   hotel.db (SQLite, WAL)  or  hotel_data.txt + customer_log.txt │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `PersistenceStore` trait both backends implement
//! - [`sqlite_store`] - SQLite backend (transactions)
//! - [`flat_file`] - Text-file backend (journal + atomic rename)
//! - [`archive`] - Rollover sinks
//! - [`service`] - Orders, reports, staff
//! - [`pool`] / [`migrations`] / [`repository`] - SQLite plumbing
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hotel_db::{DbConfig, OrderProcessor, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::open(DbConfig::new("hotel.db")).await?);
//! let orders = OrderProcessor::new(store);
//! let receipt = orders.place_order("Burger", 3, &actor, Utc::now()).await?;
//! println!("{}", receipt.confirmation());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod archive;
pub mod error;
pub mod flat_file;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;
pub mod sqlite_store;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use archive::{archive_file_name, ArchiveFile, ArchiveSink, CsvArchive, MemoryArchive};
pub use error::{DbError, DbResult};
pub use flat_file::{FlatFileConfig, FlatFileStore};
pub use pool::{Database, DbConfig};
pub use service::{OrderProcessor, SalesReporter, StaffDirectory};
pub use sqlite_store::SqliteStore;
pub use store::PersistenceStore;
