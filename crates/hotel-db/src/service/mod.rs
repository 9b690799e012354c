//! # Services
//!
//! Business operations over an injected `Arc<dyn PersistenceStore>`.
//!
//! - [`OrderProcessor`] - orders and restock
//! - [`SalesReporter`] - daily totals, inventory, rollover
//! - [`StaffDirectory`] - users

pub mod order;
pub mod report;
pub mod staff;

pub use order::OrderProcessor;
pub use report::SalesReporter;
pub use staff::StaffDirectory;
