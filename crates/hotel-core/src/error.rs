//! # Error Types
//!
//! Domain-specific error types for hotel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hotel-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  hotel-db errors (separate crate)                                      │
//! │  └── DbError          - Persistence failures (wraps CoreError)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CLI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, counts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is a rejection that leaves stock and sale history untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Order quantity is zero or negative.
    #[error("Invalid quantity {requested}: orders must be for at least one unit")]
    InvalidQuantity { requested: i64 },

    /// Item name is not in the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Not enough stock left to fill the order.
    ///
    /// ## User Workflow
    /// ```text
    /// Order Room × 5
    ///      │
    ///      ▼
    /// remaining(Room) = 2
    ///      │
    ///      ▼
    /// InsufficientStock { item: "Room", remaining: 2, requested: 5 }
    ///      │
    ///      ▼
    /// CLI shows: "Only 2 Room remaining"
    /// ```
    #[error("Insufficient stock for {item}: {remaining} remaining, {requested} requested")]
    InsufficientStock {
        item: String,
        remaining: i64,
        requested: i64,
    },

    /// Restock would push remaining stock below zero.
    #[error("Cannot set {item} quantity to {requested}: {sold} already sold this period")]
    InvalidRestock {
        item: String,
        sold: i64,
        requested: i64,
    },

    /// The acting user's role does not allow the operation.
    #[error("{operation} requires the admin role (current role: {role})")]
    PermissionDenied { operation: String, role: Role },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Remaining stock carried by an `InsufficientStock` rejection.
    pub fn remaining(&self) -> Option<i64> {
        match self {
            CoreError::InsufficientStock { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a comma inside a flat-file field).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
