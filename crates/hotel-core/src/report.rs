//! # Reports
//!
//! Pure aggregation of sale records and stock into the figures shown to
//! management. No store access happens here; `hotel-db` feeds the inputs.
//!
//! ## Reporting Day
//! A reporting day is a UTC calendar day: `[00:00:00, 24:00:00)`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::StockEntry;
use crate::money::Money;
use crate::types::{Category, SaleRecord};

/// Start (inclusive) and end (exclusive) of the UTC day containing `now`.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Keeps the records that fall on `day`, preserving their order.
pub fn records_on_day(records: &[SaleRecord], day: NaiveDate) -> Vec<SaleRecord> {
    records
        .iter()
        .filter(|r| r.sold_at.date_naive() == day)
        .cloned()
        .collect()
}

// =============================================================================
// Daily Totals
// =============================================================================

/// Units and revenue for one item over a reporting day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTotal {
    pub item: String,
    pub category: Category,
    pub units_sold: i64,
    pub revenue: Money,
}

/// The daily sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub day: NaiveDate,
    /// One line per item sold that day, ordered by category then name.
    pub lines: Vec<ItemTotal>,
    pub total_revenue: Money,
}

impl DailyTotals {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Aggregates the records that fall on `day`.
///
/// Records from other days are ignored, so callers may pass a superset.
pub fn aggregate_daily(records: &[SaleRecord], day: NaiveDate) -> DailyTotals {
    let mut by_item: BTreeMap<(Category, &str), (i64, Money)> = BTreeMap::new();

    for record in records.iter().filter(|r| r.sold_at.date_naive() == day) {
        let slot = by_item
            .entry((record.category, record.item.as_str()))
            .or_insert((0, Money::zero()));
        slot.0 = slot.0.saturating_add(record.quantity);
        slot.1 += record.total;
    }

    let lines: Vec<ItemTotal> = by_item
        .into_iter()
        .map(|((category, item), (units_sold, revenue))| ItemTotal {
            item: item.to_string(),
            category,
            units_sold,
            revenue,
        })
        .collect();
    let total_revenue = lines.iter().map(|l| l.revenue).sum();

    DailyTotals {
        day,
        lines,
        total_revenue,
    }
}

// =============================================================================
// Inventory Snapshot
// =============================================================================

/// One row of the inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub item: String,
    pub price: Money,
    pub quantity: i64,
    pub sold: i64,
    pub remaining: i64,
    pub category: Category,
}

impl From<&StockEntry> for InventoryLine {
    fn from(entry: &StockEntry) -> Self {
        InventoryLine {
            item: entry.item.name.clone(),
            price: entry.item.price,
            quantity: entry.stock.quantity(),
            sold: entry.stock.sold(),
            remaining: entry.stock.remaining(),
            category: entry.item.category,
        }
    }
}

/// Inventory rows in listing order.
pub fn inventory_lines(entries: &[StockEntry]) -> Vec<InventoryLine> {
    let mut lines: Vec<InventoryLine> = entries.iter().map(InventoryLine::from).collect();
    lines.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.item.cmp(&b.item)));
    lines
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StockLedger;
    use chrono::TimeZone;

    fn sale(item: &str, category: Category, qty: i64, price: i64, at: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            item: item.to_string(),
            category,
            quantity: qty,
            unit_price: Money::from_units(price),
            total: Money::from_units(qty * price),
            user: "desk".to_string(),
            sold_at: at,
        }
    }

    #[test]
    fn test_day_bounds() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 17, 45, 12).unwrap();
        let (start, end) = day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_records_on_day_drops_next_day() {
        let day = Utc.with_ymd_and_hms(2026, 10, 16, 23, 59, 59).unwrap();
        let records = vec![
            sale("Burger", Category::Food, 1, 120, day),
            sale("Shake", Category::Drink, 2, 120, day + Duration::seconds(1)),
        ];

        let kept = records_on_day(&records, day.date_naive());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].item, "Burger");
    }

    #[test]
    fn test_aggregate_daily_groups_and_orders() {
        let day = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let yesterday = day - Duration::days(1);
        let records = vec![
            sale("Pasta", Category::Food, 1, 250, day),
            sale("Room", Category::Accommodation, 2, 1200, day),
            sale("Burger", Category::Food, 3, 120, day),
            sale("Burger", Category::Food, 1, 120, day + Duration::hours(2)),
            sale("Shake", Category::Drink, 5, 120, yesterday),
        ];

        let totals = aggregate_daily(&records, day.date_naive());
        let names: Vec<&str> = totals.lines.iter().map(|l| l.item.as_str()).collect();
        assert_eq!(names, vec!["Room", "Burger", "Pasta"]);
        assert_eq!(totals.lines[1].units_sold, 4);
        assert_eq!(totals.lines[1].revenue, Money::from_units(480));
        assert_eq!(totals.total_revenue, Money::from_units(2400 + 480 + 250));

        assert_eq!(aggregate_daily(&records, day.date_naive()), totals);
    }

    #[test]
    fn test_aggregate_huge_totals_saturate() {
        let day = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let mut big = sale("Room", Category::Accommodation, 1, 0, day);
        big.unit_price = Money::from_units(i64::MAX);
        big.total = Money::from_units(i64::MAX);
        let records = vec![big.clone(), big, sale("Burger", Category::Food, 1, 120, day)];

        let totals = aggregate_daily(&records, day.date_naive());
        assert_eq!(totals.lines[0].units_sold, 2);
        assert_eq!(totals.lines[0].revenue, Money::from_units(i64::MAX));
        assert_eq!(totals.total_revenue, Money::from_units(i64::MAX));
    }

    #[test]
    fn test_aggregate_empty_day() {
        let totals = aggregate_daily(&[], NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert!(totals.is_empty());
        assert!(totals.total_revenue.is_zero());
    }

    #[test]
    fn test_inventory_lines() {
        let mut ledger = StockLedger::bootstrap();
        ledger.restock("Room", 10).unwrap();
        ledger.debit("Room", 4).unwrap();

        let lines = inventory_lines(ledger.entries());
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].item, "Room");
        assert_eq!((lines[0].quantity, lines[0].sold, lines[0].remaining), (10, 4, 6));
        assert_eq!(lines[1].category, Category::Drink);
    }
}
