//! # Cart / Order Builder
//!
//! Accumulates the products a customer picks into the line items of a
//! pending order.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action             Cart Method              Effect             │
//! │  ──────────────             ───────────              ──────             │
//! │                                                                         │
//! │  Tap a scoop ─────────────► add_unit() ────────────► merge or push     │
//! │                                                                         │
//! │  Read the scale ──────────► add_weighed() ─────────► push weighed line │
//! │                                                                         │
//! │  Build an açaí cup ───────► add_customized() ──────► push with options │
//! │                                                                         │
//! │  Change quantity ─────────► update_quantity() ─────► items[i].qty = n  │
//! │                                                                         │
//! │  Remove a line ───────────► remove() ──────────────► items.remove(i)   │
//! │                                                                         │
//! │  Finalize ────────────────► into_items() ──────────► Order.items       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Plain unit lines are unique by product id (adding again bumps quantity)
//! - Weighed and customized lines are never merged
//! - At most `MAX_CART_ITEMS` lines, each quantity at most `MAX_ITEM_QUANTITY`

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::calculate_order_total;
use crate::types::{ItemOptions, Product, ProductKind, SaleItem};
use crate::validation::{validate_option_selection, validate_quantity, validate_weight_grams};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The in-progress selection for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<SaleItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Resumes editing the items of an existing open order.
    pub fn from_items(items: Vec<SaleItem>) -> Self {
        Cart { items }
    }

    /// Adds a unit-priced (or add-on) product.
    ///
    /// ## Behavior
    /// - A plain line for the same product exists: its quantity grows
    /// - Otherwise a new line is pushed
    ///
    /// Returns the index of the affected line.
    pub fn add_unit(&mut self, product: &Product, quantity: u32) -> CoreResult<usize> {
        validate_quantity(quantity)?;

        match product.kind {
            ProductKind::Unit | ProductKind::Addon => {}
            ProductKind::Weight => return Err(wrong_kind(product, "a unit")),
            ProductKind::Selectable { .. } => return Err(wrong_kind(product, "a plain unit")),
        }

        if let Some(index) = self
            .items
            .iter()
            .position(|i| i.product.id == product.id && i.is_plain())
        {
            let line = &mut self.items[index];
            let new_qty = line.effective_quantity() + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = Some(new_qty);
            return Ok(index);
        }

        self.push(SaleItem::unit(product.clone(), quantity))
    }

    /// Adds a weight-priced product read from the scale.
    pub fn add_weighed(&mut self, product: &Product, weight_grams: u32) -> CoreResult<usize> {
        if !product.is_weighed() {
            return Err(wrong_kind(product, "by weight"));
        }
        validate_weight_grams(weight_grams)?;

        self.push(SaleItem::weighed(product.clone(), weight_grams))
    }

    /// Adds a product with sub-option choices and add-ons.
    ///
    /// ## Rules
    /// - Selections must respect the product's option limits
    /// - Every add-on must be an `Addon` product
    /// - Weighed products still need a weight: use `add_weighed` first and
    ///   attach add-ons with `attach_addons`
    pub fn add_customized(
        &mut self,
        product: &Product,
        quantity: u32,
        options: ItemOptions,
        addons: Vec<Product>,
    ) -> CoreResult<usize> {
        validate_quantity(quantity)?;

        if product.is_weighed() {
            return Err(wrong_kind(product, "a customized unit"));
        }
        if let Some(limits) = product.option_limits() {
            validate_option_selection(&options, &limits)?;
        }
        ensure_addons(&addons)?;

        self.push(SaleItem {
            product: product.clone(),
            quantity: Some(quantity),
            weight_grams: None,
            options,
            addons,
        })
    }

    /// Appends add-ons to an existing line.
    pub fn attach_addons(&mut self, index: usize, addons: Vec<Product>) -> CoreResult<()> {
        ensure_addons(&addons)?;
        let line = self
            .items
            .get_mut(index)
            .ok_or(CoreError::LineNotFound(index))?;
        line.addons.extend(addons);
        Ok(())
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, index: usize, quantity: u32) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(index).map(|_| ());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let line = self
            .items
            .get_mut(index)
            .ok_or(CoreError::LineNotFound(index))?;
        line.quantity = Some(quantity);
        Ok(())
    }

    /// Removes a line and returns it.
    pub fn remove(&mut self, index: usize) -> CoreResult<SaleItem> {
        if index >= self.items.len() {
            return Err(CoreError::LineNotFound(index));
        }
        Ok(self.items.remove(index))
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across plain and customized lines.
    /// Weighed lines count once.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.effective_quantity()).sum()
    }

    /// Current total of every line.
    pub fn total(&self) -> Money {
        calculate_order_total(&self.items)
    }

    pub fn into_items(self) -> Vec<SaleItem> {
        self.items
    }

    fn push(&mut self, item: SaleItem) -> CoreResult<usize> {
        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }
}

fn wrong_kind(product: &Product, expected: &str) -> CoreError {
    CoreError::WrongProductKind {
        product: product.name.clone(),
        actual: product.kind.to_string(),
        expected: expected.to_string(),
    }
}

fn ensure_addons(addons: &[Product]) -> CoreResult<()> {
    match addons.iter().find(|a| !a.is_addon()) {
        Some(product) => Err(wrong_kind(product, "an add-on")),
        None => Ok(()),
    }
}
