//! # Validation Module
//!
//! Input validation utilities for Hotel POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Type validation (integers, enums)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services                                                     │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage                                                      │
//! │  ├── SQLite CHECK / UNIQUE constraints                                 │
//! │  └── Flat-file field rules (no commas, no newlines)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hotel_core::validation::{validate_item_name, validate_order_quantity};
//!
//! validate_item_name("Chicken Roll").unwrap();
//! validate_order_quantity(2).unwrap();
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::MAX_USERNAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn reject_separators(field: &str, value: &str, allow_spaces: bool) -> ValidationResult<()> {
    if value.contains(',') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain commas".to_string(),
        });
    }

    let bad_whitespace = if allow_spaces {
        value.chars().any(|c| c == '\n' || c == '\r')
    } else {
        value.chars().any(char::is_whitespace)
    };
    if bad_whitespace {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: if allow_spaces {
                "must not contain line breaks".to_string()
            } else {
                "must not contain whitespace".to_string()
            },
        });
    }

    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
/// - No commas or line breaks (they would split a flat-file record)
///
/// ## Example
/// ```rust
/// use hotel_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Chicken Roll").is_ok());
/// assert!(validate_item_name("").is_err());
/// assert!(validate_item_name("Fish, Chips").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "item name".to_string(),
            max: 200,
        });
    }

    reject_separators("item name", name, true)
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_USERNAME_LEN` characters
/// - No commas and no whitespace
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    reject_separators("username", username, false)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Place Order                                                            │
/// │                                                                         │
/// │  Staff enters quantity: 3                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_order_quantity(3) ← THIS FUNCTION                            │
/// │       │                                                                 │
/// │       ├── qty <= 0? → InvalidQuantity                                  │
/// │       │                                                                 │
/// │       └── OK → catalog lookup, stock check, commit                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_order_quantity(qty: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(CoreError::InvalidQuantity { requested: qty });
    }
    Ok(())
}

/// Validates a price in smallest currency units. Zero is allowed.
pub fn validate_price_units(units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a stocked quantity. Zero is allowed.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Chicken Roll").is_ok());
        assert!(validate_item_name("Room").is_ok());

        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name("Fish,Chips").is_err());
        assert!(validate_item_name("Two\nLines").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("night_desk").is_ok());

        assert_eq!(
            validate_username(""),
            Err(ValidationError::Required {
                field: "username".to_string()
            })
        );
        assert!(validate_username("front desk").is_err());
        assert!(validate_username("a,b").is_err());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LEN)).is_ok());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_order_quantity() {
        assert!(validate_order_quantity(1).is_ok());
        assert!(validate_order_quantity(10_000).is_ok());
        assert_eq!(
            validate_order_quantity(0),
            Err(CoreError::InvalidQuantity { requested: 0 })
        );
        assert!(validate_order_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_price_units(0).is_ok());
        assert!(validate_price_units(1200).is_ok());
        assert!(validate_price_units(-1).is_err());

        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-5).is_err());
    }
}
