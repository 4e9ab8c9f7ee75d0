//! # Error Types
//!
//! Domain-specific error types for gelato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gelato-core errors (this file)                                        │
//! │  ├── CoreError        - Cart, order and checkout rule violations       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gelato-store errors (separate crate)                                  │
//! │  └── StorageError     - Persistence adapter failures                   │
//! │                                                                         │
//! │  pdv app errors                                                        │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant's `Display` output is a message that can be shown to the
//! cashier as-is.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Order id is not among the open orders.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding items to a completed sale
    /// - Finalizing an order twice
    #[error("Order {order_id} is {current_status}, cannot perform operation")]
    InvalidOrderStatus {
        order_id: String,
        current_status: String,
    },

    /// Cart has reached the maximum number of lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// A cart line index that does not exist.
    #[error("Cart line {0} does not exist")]
    LineNotFound(usize),

    /// Product was added through the wrong cart operation, e.g. a
    /// weight-priced product without a weight.
    #[error("{product} is a {actual} product and cannot be sold as {expected}")]
    WrongProductKind {
        product: String,
        actual: String,
        expected: String,
    },

    /// Trying to finalize an order with no items.
    #[error("Order has no items")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
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

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// More sub-options chosen than the product allows.
    #[error("At most {max} {group} can be chosen ({selected} selected)")]
    TooManySelections {
        group: String,
        max: u8,
        selected: usize,
    },

    /// Cash tendered does not cover the order total.
    #[error("Insufficient cash: total {total}, tendered {tendered}")]
    InsufficientCash { total: Money, tendered: Money },

    /// Duplicate value (e.g. product id already in the catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_cash_message() {
        let err = ValidationError::InsufficientCash {
            total: Money::from_cents(2100),
            tendered: Money::from_cents(2000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient cash: total R$ 21,00, tendered R$ 20,00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer name".to_string(),
        };
        assert_eq!(err.to_string(), "customer name is required");

        let err = ValidationError::TooManySelections {
            group: "frutas".to_string(),
            max: 2,
            selected: 3,
        };
        assert_eq!(err.to_string(), "At most 2 frutas can be chosen (3 selected)");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "password".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "password is required");
    }
}
