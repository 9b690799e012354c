//! # SQLite Store
//!
//! Transactional backend: every mutation is one `BEGIN … COMMIT`.
//!
//! ## Order Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  atomic_order(Burger × 3)                                               │
//! │       │                                                                 │
//! │       ├── write_lock.lock()                                             │
//! │       ├── BEGIN                                                         │
//! │       ├── SELECT quantity, SUM(current period sales)  → remaining = 10 │
//! │       ├── StockRecord::debit(3)                        → ok             │
//! │       ├── INSERT INTO sales (...)                                       │
//! │       └── COMMIT                                                        │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction → ROLLBACK.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `sold` is never stored: it is the sum of the current period's sale rows,
//! so the debit and the sale append are the same single INSERT.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::archive::ArchiveSink;
use crate::error::DbResult;
use crate::pool::{Database, DbConfig};
use crate::repository::{InventoryRepository, SaleRepository, UserRepository};
use crate::store::{drain_into_sink, PersistenceStore};
use hotel_core::catalog::default_items;
use hotel_core::validation::validate_order_quantity;
use hotel_core::{
    format_timestamp, whole_seconds, CoreError, OrderRequest, Role, SaleRecord, StockEntry, User,
    DEFAULT_ADMIN_USERNAME,
};

/// `PersistenceStore` over a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    db: Database,
    write_lock: Mutex<()>,
    #[cfg(test)]
    fail_before_commit: std::sync::atomic::AtomicBool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database described by `config`.
    ///
    /// A file that cannot be opened or migrated is renamed to `*.corrupt`
    /// and replaced by a fresh database seeded with the default catalog.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        match Self::connect(config.clone()).await {
            Ok(store) => Ok(store),
            Err(err) if !config.is_in_memory() => {
                warn!(
                    path = %config.database_path.display(),
                    error = %err,
                    "Database unreadable, moving it aside and starting from the default catalog"
                );
                quarantine(&config.database_path).await?;
                Self::connect(config).await
            }
            Err(err) => Err(err),
        }
    }

    async fn connect(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;
        let store = SqliteStore {
            db,
            write_lock: Mutex::new(()),
            #[cfg(test)]
            fail_before_commit: std::sync::atomic::AtomicBool::new(false),
        };

        if let Err(err) = store.bootstrap().await {
            store.db.close().await;
            return Err(err);
        }
        Ok(store)
    }

    /// Seeds the default catalog and admin account into an empty database.
    async fn bootstrap(&self) -> DbResult<()> {
        let mut tx = self.db.pool().begin().await?;

        {
            let mut inventory = InventoryRepository::new(&mut tx);
            if inventory.count().await? == 0 {
                info!("Empty inventory, seeding default catalog");
                for item in default_items() {
                    inventory.insert_item(&item, 0).await?;
                }
            }
        }

        {
            let mut users = UserRepository::new(&mut tx);
            if users.count().await? == 0 {
                info!(username = DEFAULT_ADMIN_USERNAME, "Creating default admin user");
                users
                    .insert(&User::new(DEFAULT_ADMIN_USERNAME, Role::Admin))
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// The underlying pool handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    #[cfg(test)]
    fn crash_point(&self) -> DbResult<()> {
        if self
            .fail_before_commit
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(crate::error::DbError::PersistenceUnavailable(
                "simulated crash before commit".to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn crash_point(&self) -> DbResult<()> {
        Ok(())
    }
}

/// Renames the database file and its WAL sidecars to `*.corrupt`.
async fn quarantine(path: &Path) -> DbResult<()> {
    for suffix in ["", "-wal", "-shm"] {
        let source = PathBuf::from(format!("{}{}", path.display(), suffix));
        if tokio::fs::try_exists(&source).await? {
            let target = PathBuf::from(format!("{}.corrupt", source.display()));
            tokio::fs::rename(&source, &target).await?;
            debug!(from = %source.display(), to = %target.display(), "Moved aside");
        }
    }
    Ok(())
}

#[async_trait]
impl PersistenceStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn load_catalog_and_stock(&self) -> DbResult<Vec<StockEntry>> {
        let mut conn = self.db.pool().acquire().await?;
        let rows = InventoryRepository::new(&mut conn).list_with_stock().await?;
        rows.iter().map(|row| row.to_entry()).collect()
    }

    async fn atomic_order(&self, order: &OrderRequest) -> DbResult<SaleRecord> {
        validate_order_quantity(order.quantity)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.db.pool().begin().await?;

        let (row, period) = {
            let mut inventory = InventoryRepository::new(&mut tx);
            let row = inventory
                .find_with_stock(&order.item)
                .await?
                .ok_or_else(|| CoreError::UnknownItem(order.item.clone()))?;
            let period = inventory.current_period().await?;
            (row, period)
        };

        let mut stock = row.to_entry()?.stock;
        stock.debit(&order.item, order.quantity)?;
        let record = order.to_sale_record(row.category)?;

        SaleRepository::new(&mut tx)
            .insert(row.id, period, &record)
            .await?;

        self.crash_point()?;
        tx.commit().await?;

        info!(
            item = %record.item,
            quantity = record.quantity,
            total = record.total.units(),
            remaining = stock.remaining(),
            user = %record.user,
            "Order committed"
        );
        Ok(record)
    }

    async fn sales_since(&self, start: DateTime<Utc>) -> DbResult<Vec<SaleRecord>> {
        let mut conn = self.db.pool().acquire().await?;
        SaleRepository::new(&mut conn).list_since(start).await
    }

    async fn restock(&self, item: &str, new_quantity: i64) -> DbResult<StockEntry> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.db.pool().begin().await?;

        let entry = {
            let mut inventory = InventoryRepository::new(&mut tx);
            let row = inventory
                .find_with_stock(item)
                .await?
                .ok_or_else(|| CoreError::UnknownItem(item.to_string()))?;
            let mut entry = row.to_entry()?;
            entry.stock.restock(item, new_quantity)?;
            inventory.set_quantity(row.id, new_quantity).await?;
            entry
        };

        tx.commit().await?;
        info!(item, quantity = new_quantity, "Item restocked");
        Ok(entry)
    }

    async fn rollover_period(
        &self,
        records: &[SaleRecord],
        sink: &mut (dyn ArchiveSink + Send),
    ) -> DbResult<usize> {
        let _guard = self.write_lock.lock().await;

        let archived = drain_into_sink(records, sink)?;

        let mut tx = self.db.pool().begin().await?;
        let period = InventoryRepository::new(&mut tx)
            .advance_period(&format_timestamp(whole_seconds(Utc::now())))
            .await?;
        tx.commit().await?;

        info!(archived, period, "Period rolled over");
        Ok(archived)
    }

    async fn insert_user(&self, user: &User) -> DbResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.db.pool().acquire().await?;
        UserRepository::new(&mut conn).insert(user).await
    }

    async fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        let mut conn = self.db.pool().acquire().await?;
        UserRepository::new(&mut conn).find(username).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use hotel_core::Money;
    use std::sync::atomic::Ordering;

    fn order(item: &str, quantity: i64, price: i64) -> OrderRequest {
        OrderRequest {
            item: item.to_string(),
            quantity,
            unit_price: Money::from_units(price),
            user: "desk".to_string(),
            at: whole_seconds(Utc::now()),
        }
    }

    async fn sale_count(store: &SqliteStore) -> i64 {
        let mut conn = store.database().pool().acquire().await.unwrap();
        SaleRepository::new(&mut conn).count().await.unwrap()
    }

    #[tokio::test]
    async fn test_crash_before_commit_leaves_pre_call_state() {
        let store = SqliteStore::open(DbConfig::in_memory()).await.unwrap();
        store.restock("Burger", 10).await.unwrap();

        store.fail_before_commit.store(true, Ordering::SeqCst);
        let err = store.atomic_order(&order("Burger", 3, 120)).await.unwrap_err();
        assert!(matches!(err, DbError::PersistenceUnavailable(_)));
        store.fail_before_commit.store(false, Ordering::SeqCst);

        let entries = store.load_catalog_and_stock().await.unwrap();
        let burger = entries.iter().find(|e| e.item.name == "Burger").unwrap();
        assert_eq!(burger.stock.sold(), 0);
        assert_eq!(burger.stock.remaining(), 10);
        assert_eq!(sale_count(&store).await, 0);

        store.atomic_order(&order("Burger", 3, 120)).await.unwrap();
        assert_eq!(sale_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotel.db");
        std::fs::write(&path, b"this is not a sqlite database, just some text").unwrap();

        let store = SqliteStore::open(DbConfig::new(&path)).await.unwrap();
        let entries = store.load_catalog_and_stock().await.unwrap();
        assert_eq!(entries.len(), 6);
        assert!(entries.iter().all(|e| e.stock.quantity() == 0));
        assert!(dir.path().join("hotel.db.corrupt").exists());
    }

    #[tokio::test]
    async fn test_default_admin_is_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotel.db");

        let store = SqliteStore::open(DbConfig::new(&path)).await.unwrap();
        let admin = store.find_user(DEFAULT_ADMIN_USERNAME).await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        store
            .insert_user(&User::new("desk", Role::Staff))
            .await
            .unwrap();
        store.database().close().await;

        let reopened = SqliteStore::open(DbConfig::new(&path)).await.unwrap();
        assert!(reopened.find_user("desk").await.unwrap().is_some());
        assert_eq!(reopened.load_catalog_and_stock().await.unwrap().len(), 6);
    }
}
