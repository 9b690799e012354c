//! Text rendering for command results.
//!
//! Every renderer returns a `String`; `main` decides where it goes.

use hotel_core::{DailyTotals, InventoryLine, Receipt, StockEntry, User};
use std::fmt::Write;
use std::path::Path;

pub fn receipt(receipt: &Receipt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", receipt.confirmation());
    let _ = writeln!(out);
    let _ = writeln!(out, "Bill");
    let _ = writeln!(out, "====");
    let _ = writeln!(out, "Item:            {}", receipt.item);
    let _ = writeln!(out, "Quantity:        {}", receipt.quantity);
    let _ = writeln!(out, "Price per item:  {}", receipt.unit_price);
    let _ = writeln!(out, "Total:           {}", receipt.total);
    let _ = writeln!(out, "Time (UTC):      {}", hotel_core::format_timestamp(receipt.sold_at));
    out
}

pub fn restocked(entry: &StockEntry) -> String {
    format!(
        "{}: quantity {}, sold {}, remaining {}\n",
        entry.item.name,
        entry.stock.quantity(),
        entry.stock.sold(),
        entry.stock.remaining()
    )
}

pub fn inventory(lines: &[InventoryLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<14} {:>8} {:>8} {:>6} {:>9}",
        "Item", "Category", "Price", "Had", "Sold", "Remaining"
    );
    for line in lines {
        let _ = writeln!(
            out,
            "{:<16} {:<14} {:>8} {:>8} {:>6} {:>9}",
            line.item,
            line.category.as_str(),
            line.price.units(),
            line.quantity,
            line.sold,
            line.remaining
        );
    }
    out
}

pub fn daily_totals(totals: &DailyTotals) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sales for {}", totals.day);
    if totals.is_empty() {
        let _ = writeln!(out, "No sales recorded.");
        return out;
    }
    let _ = writeln!(out, "{:<16} {:<14} {:>6} {:>10}", "Item", "Category", "Units", "Revenue");
    for line in &totals.lines {
        let _ = writeln!(
            out,
            "{:<16} {:<14} {:>6} {:>10}",
            line.item,
            line.category.as_str(),
            line.units_sold,
            line.revenue.units()
        );
    }
    let _ = writeln!(out, "Total collection: {}", totals.total_revenue);
    out
}

pub fn rollover(archived: Option<usize>, path: Option<&Path>) -> String {
    match (archived, path) {
        (None, _) => "Nothing done. Pass --confirm to archive today's sales and reset counters.\n"
            .to_string(),
        (Some(count), Some(path)) => format!(
            "Archived {} sale(s) to {}. Sold counters reset.\n",
            count,
            path.display()
        ),
        (Some(count), None) => format!("Archived {} sale(s). Sold counters reset.\n", count),
    }
}

pub fn user_added(user: &User) -> String {
    format!("Added user '{}' with role {}\n", user.username, user.role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hotel_core::{Category, ItemTotal, Money};

    #[test]
    fn test_receipt_has_confirmation_and_bill() {
        let r = Receipt {
            item: "Burger".to_string(),
            category: Category::Food,
            quantity: 3,
            unit_price: Money::from_units(120),
            total: Money::from_units(360),
            sold_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
        };
        let text = receipt(&r);
        assert!(text.starts_with("3 Burger is the order!\n"));
        assert!(text.contains("Price per item:  120"));
        assert!(text.contains("Total:           360"));
        assert!(text.contains("2024-03-10 12:00:00"));
    }

    #[test]
    fn test_empty_day() {
        let totals = DailyTotals {
            day: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            lines: vec![],
            total_revenue: Money::zero(),
        };
        assert_eq!(daily_totals(&totals), "Sales for 2024-03-10\nNo sales recorded.\n");
    }

    #[test]
    fn test_daily_totals_collection_line() {
        let totals = DailyTotals {
            day: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            lines: vec![ItemTotal {
                item: "Shake".to_string(),
                category: Category::Drink,
                units_sold: 2,
                revenue: Money::from_units(240),
            }],
            total_revenue: Money::from_units(240),
        };
        let text = daily_totals(&totals);
        assert!(text.contains("Shake"));
        assert!(text.ends_with("Total collection: 240\n"));
    }

    #[test]
    fn test_rollover_messages() {
        assert!(rollover(None, None).contains("--confirm"));
        assert_eq!(
            rollover(Some(2), Some(Path::new("/tmp/sales_report_20240310.csv"))),
            "Archived 2 sale(s) to /tmp/sales_report_20240310.csv. Sold counters reset.\n"
        );
    }
}
