//! # Order Processing
//!
//! Turns "3 × Burger for desk" into a committed sale and a receipt.
//!
//! ## Flow
//! ```text
//! place_order(item, qty, actor, now)
//!      │
//!      ├── qty ≤ 0?            → InvalidQuantity   (no store access)
//!      ├── item not in catalog → UnknownItem
//!      ├── atomic_order        → InsufficientStock { remaining } | SaleRecord
//!      ▼
//! Receipt (pure projection of the SaleRecord)
//! ```
//!
//! No retries and no queuing: a rejected order is final for that call.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::store::PersistenceStore;
use hotel_core::validation::{validate_order_quantity, validate_username};
use hotel_core::{
    whole_seconds, CoreError, ItemCatalog, OrderRequest, Receipt, StockEntry, User,
};

/// Places orders and takes in stock.
#[derive(Clone)]
pub struct OrderProcessor {
    store: Arc<dyn PersistenceStore>,
}

impl OrderProcessor {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        OrderProcessor { store }
    }

    /// The current catalog, in listing order.
    pub async fn catalog(&self) -> DbResult<ItemCatalog> {
        let entries = self.store.load_catalog_and_stock().await?;
        Ok(ItemCatalog::new(entries.into_iter().map(|e| e.item).collect()))
    }

    /// Sells `quantity` units of `item` on behalf of `actor`.
    ///
    /// The unit price is taken from the catalog at call time and frozen into
    /// the sale record.
    pub async fn place_order(
        &self,
        item: &str,
        quantity: i64,
        actor: &User,
        now: DateTime<Utc>,
    ) -> DbResult<Receipt> {
        debug!(item, quantity, user = %actor.username, "place_order");

        validate_order_quantity(quantity)?;
        validate_username(&actor.username).map_err(CoreError::from)?;

        let catalog = self.catalog().await?;
        let item = catalog.resolve(item)?;

        let order = OrderRequest {
            item: item.name.clone(),
            quantity,
            unit_price: item.price,
            user: actor.username.clone(),
            at: whole_seconds(now),
        };

        match self.store.atomic_order(&order).await {
            Ok(record) => {
                let receipt = Receipt::from(record);
                info!(
                    item = %receipt.item,
                    quantity = receipt.quantity,
                    total = receipt.total.units(),
                    "Order placed"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Some(remaining) = err.as_rejection().and_then(CoreError::remaining) {
                    info!(item = %order.item, requested = quantity, remaining, "Order exceeds stock");
                }
                Err(err)
            }
        }
    }

    /// Sets the total stocked quantity of `item`.
    pub async fn restock(&self, item: &str, quantity: i64) -> DbResult<StockEntry> {
        debug!(item, quantity, "restock");
        self.store.restock(item, quantity).await
    }
}
