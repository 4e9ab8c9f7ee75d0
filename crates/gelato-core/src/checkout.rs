//! # Checkout
//!
//! Turns an open order into a completed sale.
//!
//! ## Finalization Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          finalize_order                                 │
//! │                                                                         │
//! │  Open order ──► has items? ──► settle(total, payment) ──► Completed    │
//! │                    │ no               │ cash short                      │
//! │                    ▼                  ▼                                  │
//! │               EmptyOrder       InsufficientCash                         │
//! │                                                                         │
//! │  On success the order carries: total, payment_method,                  │
//! │  amount_tendered, change, completed_at, status = Completed             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Card and Pix payments are always exact. Cash without a tendered amount
//! is treated as exact as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Order, OrderStatus, PaymentMethod};
use crate::validation::validate_cash_tendered;

/// What the customer pays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub method: PaymentMethod,
    /// Cash handed over. Ignored for non-cash methods.
    #[serde(default)]
    pub amount_tendered: Option<Money>,
}

impl Payment {
    pub fn cash(amount_tendered: Money) -> Self {
        Payment {
            method: PaymentMethod::Cash,
            amount_tendered: Some(amount_tendered),
        }
    }

    pub fn exact(method: PaymentMethod) -> Self {
        Payment {
            method,
            amount_tendered: None,
        }
    }
}

/// Outcome of settling a total against a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub total: Money,
    pub amount_tendered: Option<Money>,
    pub change: Option<Money>,
}

/// Settles `total` against a payment without touching any order.
///
/// ```rust
/// use gelato_core::checkout::{settle, Payment};
/// use gelato_core::Money;
///
/// let s = settle(Money::from_cents(2100), &Payment::cash(Money::from_cents(5000))).unwrap();
/// assert_eq!(s.change, Some(Money::from_cents(2900)));
/// ```
pub fn settle(total: Money, payment: &Payment) -> CoreResult<Settlement> {
    match (payment.method, payment.amount_tendered) {
        (PaymentMethod::Cash, Some(tendered)) => {
            validate_cash_tendered(total, tendered)?;
            Ok(Settlement {
                total,
                amount_tendered: Some(tendered),
                change: Some(tendered - total),
            })
        }
        (PaymentMethod::Cash, None) => Ok(Settlement {
            total,
            amount_tendered: Some(total),
            change: Some(Money::zero()),
        }),
        _ => Ok(Settlement {
            total,
            amount_tendered: None,
            change: None,
        }),
    }
}

/// Completes an open order.
///
/// The total is computed from the items and frozen on the order. On error
/// the order is left untouched.
pub fn finalize_order(order: &mut Order, payment: &Payment, now: DateTime<Utc>) -> CoreResult<Settlement> {
    order.ensure_open()?;
    if order.items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let settlement = settle(order.computed_total(), payment)?;

    order.status = OrderStatus::Completed;
    order.payment_method = Some(payment.method);
    order.total = Some(settlement.total);
    order.amount_tendered = settlement.amount_tendered;
    order.change = settlement.change;
    order.completed_at = Some(now);
    order.updated_at = now;

    Ok(settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{Product, ProductKind, SaleItem};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap()
    }

    fn order_of_2100() -> Order {
        let scoop = Product::new(1, "Bola", Money::from_cents(450), "Sorvetes", ProductKind::Unit);
        let syrup = Product::new(10, "Calda", Money::from_cents(300), "Adicionais", ProductKind::Addon);
        let mut item = SaleItem::unit(scoop, 2);
        item.addons = vec![syrup.clone(), syrup];

        let mut order = Order::open_comanda("Ana", now()).unwrap();
        order.items.push(item);
        order
    }

    #[test]
    fn test_cash_payment_gives_change() {
        let mut order = order_of_2100();
        let s = finalize_order(&mut order, &Payment::cash(Money::from_cents(5000)), now()).unwrap();

        assert_eq!(s.change, Some(Money::from_cents(2900)));
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total, Some(Money::from_cents(2100)));
        assert_eq!(order.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(order.completed_at, Some(now()));
    }

    #[test]
    fn test_insufficient_cash_leaves_order_open() {
        let mut order = order_of_2100();
        let err = finalize_order(&mut order, &Payment::cash(Money::from_cents(2000)), now()).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InsufficientCash { .. })
        ));
        assert!(order.is_open());
        assert_eq!(order.total, None);
    }

    #[test]
    fn test_card_payment_has_no_change() {
        let mut order = order_of_2100();
        let s = finalize_order(&mut order, &Payment::exact(PaymentMethod::Credit), now()).unwrap();
        assert_eq!(s.change, None);
        assert_eq!(order.amount_tendered, None);
    }

    #[test]
    fn test_cash_without_tendered_is_exact() {
        let s = settle(Money::from_cents(1200), &Payment::exact(PaymentMethod::Cash)).unwrap();
        assert_eq!(s.amount_tendered, Some(Money::from_cents(1200)));
        assert_eq!(s.change, Some(Money::zero()));
    }

    #[test]
    fn test_empty_order_cannot_be_finalized() {
        let mut order = Order::direct_sale(now());
        let err = finalize_order(&mut order, &Payment::exact(PaymentMethod::Pix), now()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyOrder));
    }

    #[test]
    fn test_cannot_finalize_twice() {
        let mut order = order_of_2100();
        finalize_order(&mut order, &Payment::exact(PaymentMethod::Pix), now()).unwrap();
        let err = finalize_order(&mut order, &Payment::exact(PaymentMethod::Pix), now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrderStatus { .. }));
    }
}
