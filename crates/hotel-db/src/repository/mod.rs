//! # Repository Module
//!
//! SQL for the SQLite backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SqliteStore::atomic_order                                             │
//! │       │                                                                 │
//! │       │  let mut tx = pool.begin().await?;                             │
//! │       ▼                                                                 │
//! │  InventoryRepository::new(&mut tx)                                     │
//! │  ├── find_with_stock(name)                                             │
//! │  └── current_period()                                                  │
//! │  SaleRepository::new(&mut tx)                                          │
//! │  └── insert(item_id, period, record)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tx.commit()  (or drop → rollback)                                     │
//! │                                                                         │
//! │  Every statement is parameterized; no query text is built from input. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - Items, stock, ledger period
//! - [`SaleRepository`] - Sale history
//! - [`UserRepository`] - Staff directory

pub mod inventory;
pub mod sale;
pub mod user;

pub use inventory::{InventoryRepository, InventoryRow};
pub use sale::SaleRepository;
pub use user::UserRepository;
