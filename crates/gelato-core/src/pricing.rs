//! # Total Calculator
//!
//! Computes the monetary total of a sale line and of an order.
//!
//! ## Line Total
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       calculate_item_total                              │
//! │                                                                         │
//! │  product.kind == Weight && weight_grams present?                       │
//! │       │ yes                          │ no                               │
//! │       ▼                              ▼                                  │
//! │  base = price × grams / 1000     base = price × (quantity ?? 1)        │
//! │       │                              │                                  │
//! │       └──────────────┬───────────────┘                                  │
//! │                      ▼                                                  │
//! │  total = base + Σ addon.price × (quantity ?? 1)                        │
//! │                                                                         │
//! │  Add-ons are never weighed: a 500 g cup with syrup pays the syrup      │
//! │  once, not per kilo.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A weight-priced line without a weight is priced as `price × quantity`.
//!
//! Neither function fails: inputs are validated when lines are added to a
//! cart (see [`crate::cart`]).

use crate::money::Money;
use crate::types::{ProductKind, SaleItem};

/// Computes the total of a single sale line.
///
/// ## Example
/// ```rust
/// use gelato_core::money::Money;
/// use gelato_core::pricing::calculate_item_total;
/// use gelato_core::types::{Product, ProductKind, SaleItem};
///
/// let scoop = Product::new(1, "Bola", Money::from_cents(450), "Sorvetes", ProductKind::Unit);
/// assert_eq!(calculate_item_total(&SaleItem::unit(scoop, 2)).cents(), 900);
///
/// let self_service = Product::new(2, "Self-service", Money::from_cents(4700), "Sorvetes", ProductKind::Weight);
/// assert_eq!(calculate_item_total(&SaleItem::weighed(self_service, 500)).cents(), 2350);
/// ```
pub fn calculate_item_total(item: &SaleItem) -> Money {
    let multiplier = item.effective_quantity();

    let base = match (item.product.kind, item.weight_grams) {
        (ProductKind::Weight, Some(grams)) => item.product.price.multiply_weight_grams(grams),
        _ => item.product.price * multiplier,
    };

    let addons: Money = item.addons.iter().map(|addon| addon.price * multiplier).sum();

    base + addons
}

/// Computes the total of an order as the sum of its line totals.
///
/// An empty item list totals zero.
pub fn calculate_order_total(items: &[SaleItem]) -> Money {
    items.iter().map(calculate_item_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
