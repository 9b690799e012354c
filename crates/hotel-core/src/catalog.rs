//! # Item Catalog
//!
//! The set of things the establishment sells.
//!
//! ## Ordering
//! Every listing in the system (menu, inventory report, daily totals) is
//! ordered by category, then by name. `ItemCatalog` keeps its items in that
//! order so callers never sort by hand.
//!
//! ## Default Catalog
//! ```text
//! ┌──────────────────┬────────┬───────────────┐
//! │ Item             │ Price  │ Category      │
//! ├──────────────────┼────────┼───────────────┤
//! │ Room             │  1200  │ accommodation │
//! │ Shake            │   120  │ drink         │
//! │ Burger           │   120  │ food          │
//! │ Chicken Roll     │   150  │ food          │
//! │ Noodles          │   140  │ food          │
//! │ Pasta            │   250  │ food          │
//! └──────────────────┴────────┴───────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, Item};

/// Built-in catalog used on first run and after a corrupt store is discarded.
pub fn default_items() -> Vec<Item> {
    vec![
        Item::new("Room", 1200, Category::Accommodation),
        Item::new("Pasta", 250, Category::Food),
        Item::new("Burger", 120, Category::Food),
        Item::new("Noodles", 140, Category::Food),
        Item::new("Shake", 120, Category::Drink),
        Item::new("Chicken Roll", 150, Category::Food),
    ]
}

/// Sort key shared by every listing: category, then name.
pub fn listing_order(a: &Item, b: &Item) -> std::cmp::Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| a.name.cmp(&b.name))
}

/// Read-only view of the sellable items, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    /// Builds a catalog, sorting items into listing order.
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_by(listing_order);
        ItemCatalog { items }
    }

    /// The built-in six-item catalog.
    pub fn default_catalog() -> Self {
        ItemCatalog::new(default_items())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by exact name.
    pub fn find(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Looks up an item by name, rejecting unknown names.
    pub fn resolve(&self, name: &str) -> CoreResult<&Item> {
        self.find(name)
            .ok_or_else(|| CoreError::UnknownItem(name.to_string()))
    }

    /// Category for a name found in a flat-file snapshot.
    ///
    /// The snapshot line has no category column; names from the default
    /// catalog keep their category and anything else is filed under food.
    pub fn category_for_name(&self, name: &str) -> Category {
        self.find(name)
            .map(|item| item.category)
            .unwrap_or(Category::Food)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_in_listing_order() {
        let catalog = ItemCatalog::default_catalog();
        let names: Vec<&str> = catalog.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Room", "Shake", "Burger", "Chicken Roll", "Noodles", "Pasta"]
        );
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_resolve() {
        let catalog = ItemCatalog::default_catalog();
        assert_eq!(catalog.resolve("Pasta").unwrap().price.units(), 250);
        assert_eq!(
            catalog.resolve("Lobster").unwrap_err(),
            CoreError::UnknownItem("Lobster".to_string())
        );
    }

    #[test]
    fn test_category_for_name() {
        let catalog = ItemCatalog::default_catalog();
        assert_eq!(catalog.category_for_name("Room"), Category::Accommodation);
        assert_eq!(catalog.category_for_name("Shake"), Category::Drink);
        assert_eq!(catalog.category_for_name("Soup"), Category::Food);
    }
}
