//! # Domain Types
//!
//! Core domain types used throughout Hotel POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │   SaleRecord    │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (key)     │   │  item           │   │  username       │       │
//! │  │  price          │   │  quantity       │   │  role           │       │
//! │  │  category       │   │  unit_price     │   └─────────────────┘       │
//! │  └─────────────────┘   │  total          │                             │
//! │                        │  user, sold_at  │   ┌─────────────────┐       │
//! │  ┌─────────────────┐   └─────────────────┘   │    Receipt      │       │
//! │  │    Category     │                         │  (projection of │       │
//! │  │  Accommodation  │   ┌─────────────────┐   │   a SaleRecord) │       │
//! │  │  Drink, Food    │   │  OrderRequest   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Items are keyed by their unique display name. The SQLite backend keeps a
//! surrogate integer id internally, but it never leaves the database layer.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// Timestamp layout shared by the flat-file log and the archive export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Truncates a timestamp to whole seconds.
///
/// Both backends persist second precision, so every stored timestamp passes
/// through here first.
pub fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}

/// Renders a timestamp in `TIMESTAMP_FORMAT`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a `TIMESTAMP_FORMAT` string as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Category
// =============================================================================

/// What kind of thing an item is.
///
/// Variant order is alphabetical so that sorting by `Category` agrees with
/// `ORDER BY category` on the TEXT column in SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Rooms.
    Accommodation,
    /// Shakes and other beverages.
    Drink,
    /// Kitchen items.
    Food,
}

impl Category {
    /// Lowercase storage name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Accommodation => "accommodation",
            Category::Drink => "drink",
            Category::Food => "food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accommodation" => Ok(Category::Accommodation),
            "drink" => Ok(Category::Drink),
            "food" => Ok(Category::Food),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: vec![
                    "accommodation".to_string(),
                    "drink".to_string(),
                    "food".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique display name, also the item's identity.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    /// Accommodation, food or drink.
    pub category: Category,
}

impl Item {
    /// Creates an item.
    pub fn new(name: impl Into<String>, price_units: i64, category: Category) -> Self {
        Item {
            name: name.into(),
            price: Money::from_units(price_units),
            category,
        }
    }
}

// =============================================================================
// Role & User
// =============================================================================

/// Access level of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May run rollover and manage users.
    Admin,
    /// Front desk / counter staff.
    Staff,
}

impl Role {
    /// Lowercase storage name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "staff".to_string()],
            }),
        }
    }
}

/// A staff account, and the acting user of every operation.
///
/// Authentication happens outside this crate; by the time a `User` reaches
/// the core it is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        User {
            username: username.into(),
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Rejects non-admin actors for the named operation.
    pub fn require_admin(&self, operation: &str) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                operation: operation.to_string(),
                role: self.role,
            })
        }
    }
}

// =============================================================================
// Orders & Sale Records
// =============================================================================

/// Everything a store needs to perform one atomic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Item name.
    pub item: String,
    /// Units ordered (> 0).
    pub quantity: i64,
    /// Catalog price observed when the order was accepted.
    pub unit_price: Money,
    /// Acting username.
    pub user: String,
    /// Order time, whole seconds.
    pub at: DateTime<Utc>,
}

impl OrderRequest {
    /// Line total, rejecting quantities whose total would overflow.
    pub fn total(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or(CoreError::InvalidQuantity {
                requested: self.quantity,
            })
    }

    /// Builds the sale record this order produces once committed.
    pub fn to_sale_record(&self, category: Category) -> CoreResult<SaleRecord> {
        Ok(SaleRecord {
            item: self.item.clone(),
            category,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total: self.total()?,
            user: self.user.clone(),
            sold_at: self.at,
        })
    }
}

/// One committed sale. Append-only.
///
/// Uses the snapshot pattern: `unit_price` is frozen at the time of sale and
/// never recomputed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub item: String,
    pub category: Category,
    pub quantity: i64,
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub total: Money,
    pub user: String,
    pub sold_at: DateTime<Utc>,
}

// =============================================================================
// Receipt
// =============================================================================

/// Bill shown to the guest after a successful order.
///
/// A pure projection of the committed `SaleRecord`; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub item: String,
    pub category: Category,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
    pub sold_at: DateTime<Utc>,
}

impl Receipt {
    /// Confirmation line, phrased for rooms vs. counter orders.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use hotel_core::{Category, Money, Receipt};
    ///
    /// let receipt = Receipt {
    ///     item: "Room".to_string(),
    ///     category: Category::Accommodation,
    ///     quantity: 2,
    ///     unit_price: Money::from_units(1200),
    ///     total: Money::from_units(2400),
    ///     sold_at: Utc::now(),
    /// };
    /// assert_eq!(receipt.confirmation(), "2 Room(s) have been allotted to you");
    /// ```
    pub fn confirmation(&self) -> String {
        match self.category {
            Category::Accommodation => {
                format!("{} {}(s) have been allotted to you", self.quantity, self.item)
            }
            Category::Food | Category::Drink => {
                format!("{} {} is the order!", self.quantity, self.item)
            }
        }
    }
}

impl From<SaleRecord> for Receipt {
    fn from(record: SaleRecord) -> Self {
        Receipt {
            item: record.item,
            category: record.category,
            quantity: record.quantity,
            unit_price: record.unit_price,
            total: record.total,
            sold_at: record.sold_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_category_round_trip_and_order() {
        for category in [Category::Accommodation, Category::Drink, Category::Food] {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!(Category::Accommodation < Category::Drink);
        assert!(Category::Drink < Category::Food);
        assert!("dessert".parse::<Category>().is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" staff ".parse::<Role>().unwrap(), Role::Staff);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_admin() {
        assert!(User::new("admin", Role::Admin).require_admin("Rollover").is_ok());
        let err = User::new("desk", Role::Staff)
            .require_admin("Rollover")
            .unwrap_err();
        assert!(matches!(err, CoreError::PermissionDenied { role: Role::Staff, .. }));
    }

    #[test]
    fn test_order_to_sale_record() {
        let order = OrderRequest {
            item: "Burger".to_string(),
            quantity: 3,
            unit_price: Money::from_units(120),
            user: "desk".to_string(),
            at: at(),
        };
        let record = order.to_sale_record(Category::Food).unwrap();
        assert_eq!(record.total, Money::from_units(360));
        assert_eq!(record.sold_at, at());

        let receipt = Receipt::from(record);
        assert_eq!(receipt.confirmation(), "3 Burger is the order!");
    }

    #[test]
    fn test_order_total_overflow_is_rejected() {
        let order = OrderRequest {
            item: "Room".to_string(),
            quantity: i64::MAX,
            unit_price: Money::from_units(1200),
            user: "desk".to_string(),
            at: at(),
        };
        assert!(matches!(
            order.total(),
            Err(CoreError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_whole_seconds() {
        let precise = at() + chrono::Duration::milliseconds(750);
        assert_eq!(whole_seconds(precise), at());
    }

    #[test]
    fn test_timestamp_text() {
        assert_eq!(format_timestamp(at()), "2026-10-16 09:30:00");
        assert_eq!(parse_timestamp("2026-10-16 09:30:00"), Some(at()));
        assert_eq!(parse_timestamp("16/10/2026"), None);
    }
}
