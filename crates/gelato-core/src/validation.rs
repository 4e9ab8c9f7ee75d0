//! # Validation Module
//!
//! Input validation utilities for Gelato PDV.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: App command (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart / checkout rules (cart.rs, checkout.rs)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is a [`ValidationError`] whose message is shown to the
//! cashier unchanged.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ItemOptions, OptionLimits};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_WEIGHT_GRAMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest customer name accepted on a comanda.
const MAX_CUSTOMER_NAME_LEN: usize = 80;

/// Longest product name accepted in the catalog.
const MAX_PRODUCT_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a comanda customer name and returns it trimmed.
///
/// ```rust
/// use gelato_core::validation::validate_customer_name;
///
/// assert_eq!(validate_customer_name("  Ana ").unwrap(), "Ana");
/// assert!(validate_customer_name("").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates that a login password was typed. Whitespace-only counts as empty.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product category.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Zero is allowed (courtesy items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a scale reading in grams.
pub fn validate_weight_grams(grams: u32) -> ValidationResult<()> {
    if grams == 0 {
        return Err(ValidationError::MustBePositive {
            field: "weight".to_string(),
        });
    }

    if grams > MAX_WEIGHT_GRAMS {
        return Err(ValidationError::OutOfRange {
            field: "weight".to_string(),
            min: 1,
            max: i64::from(MAX_WEIGHT_GRAMS),
        });
    }

    Ok(())
}

/// Validates sub-option selections against a selectable product's limits.
///
/// Groups the limits do not know about are accepted as-is.
///
/// ```rust
/// use gelato_core::types::{ItemOptions, OptionLimits, FRUITS_GROUP};
/// use gelato_core::validation::validate_option_selection;
///
/// let mut options = ItemOptions::new();
/// options.insert(FRUITS_GROUP.to_string(), vec!["morango".into(), "kiwi".into()]);
///
/// assert!(validate_option_selection(&options, &OptionLimits::new(2, 1, 3)).is_ok());
/// assert!(validate_option_selection(&options, &OptionLimits::new(1, 1, 3)).is_err());
/// ```
pub fn validate_option_selection(
    options: &ItemOptions,
    limits: &OptionLimits,
) -> ValidationResult<()> {
    for (group, selected) in options {
        if let Some(max) = limits.limit_for(group) {
            if selected.len() > usize::from(max) {
                return Err(ValidationError::TooManySelections {
                    group: group.clone(),
                    max,
                    selected: selected.len(),
                });
            }
        }
    }

    Ok(())
}

/// Validates that cash handed over covers the total.
pub fn validate_cash_tendered(total: Money, tendered: Money) -> ValidationResult<()> {
    if tendered < total {
        return Err(ValidationError::InsufficientCash { total, tendered });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed. Empty is allowed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
