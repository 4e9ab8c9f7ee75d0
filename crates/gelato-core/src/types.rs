//! # Domain Types
//!
//! Core domain types used throughout Gelato PDV.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    SaleItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │◄──│  product (copy) │◄──│  id (UUID)      │       │
//! │  │  name           │   │  quantity?      │   │  customer_name  │       │
//! │  │  price          │   │  weight_grams?  │   │  items          │       │
//! │  │  category       │   │  options        │   │  status         │       │
//! │  │  kind           │   │  addons         │   │  payment/total  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductKind    │   │  OrderStatus    │   │ PaymentMethod   │       │
//! │  │  Unit           │   │  Open           │   │  Cash           │       │
//! │  │  Weight         │   │  Completed      │   │  Credit / Debit │       │
//! │  │  Selectable     │   └─────────────────┘   │  Pix            │       │
//! │  │  Addon          │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `SaleItem` embeds a full copy of its `Product`. Editing or removing a
//! catalog entry never changes an order that already sold it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{calculate_item_total, calculate_order_total};

/// Option group name for fruit selections.
pub const FRUITS_GROUP: &str = "frutas";
/// Option group name for cream selections.
pub const CREAMS_GROUP: &str = "cremes";
/// Option group name for topping selections.
pub const TOPPINGS_GROUP: &str = "acompanhamentos";

/// Customer name recorded on counter sales that never had a comanda.
pub const DIRECT_SALE_CUSTOMER: &str = "Balcão";

// =============================================================================
// Product
// =============================================================================

/// How many sub-options a selectable product (e.g. an açaí cup) allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionLimits {
    pub fruits: u8,
    pub creams: u8,
    pub toppings: u8,
}

impl OptionLimits {
    pub const fn new(fruits: u8, creams: u8, toppings: u8) -> Self {
        OptionLimits {
            fruits,
            creams,
            toppings,
        }
    }

    /// Limit for a named option group. Unknown groups are unrestricted.
    pub fn limit_for(&self, group: &str) -> Option<u8> {
        match group {
            FRUITS_GROUP => Some(self.fruits),
            CREAMS_GROUP => Some(self.creams),
            TOPPINGS_GROUP => Some(self.toppings),
            _ => None,
        }
    }
}

/// How a product is priced and sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductKind {
    /// Priced per unit (a scoop, a popsicle, a drink).
    Unit,
    /// Priced per kilogram; the line carries a weight in grams.
    Weight,
    /// A cup or bowl the customer builds from sub-options.
    #[serde(rename = "option")]
    Selectable {
        #[serde(default)]
        limits: OptionLimits,
    },
    /// Extra charged on top of another line (syrup, topping, cone upgrade).
    Addon,
}

impl ProductKind {
    /// Short machine name, matches the serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Unit => "unit",
            ProductKind::Weight => "weight",
            ProductKind::Selectable { .. } => "option",
            ProductKind::Addon => "addon",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: u32,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price, or price per kilogram for `ProductKind::Weight`.
    pub price: Money,

    /// Free-form category ("Sorvetes", "Açaí", "Bebidas", ...).
    pub category: String,

    /// Pricing/selling variant.
    pub kind: ProductKind,
}

impl Product {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
        kind: ProductKind,
    ) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            category: category.into(),
            kind,
        }
    }

    #[inline]
    pub fn is_weighed(&self) -> bool {
        matches!(self.kind, ProductKind::Weight)
    }

    #[inline]
    pub fn is_addon(&self) -> bool {
        matches!(self.kind, ProductKind::Addon)
    }

    /// Option limits when the product is selectable.
    pub fn option_limits(&self) -> Option<OptionLimits> {
        match self.kind {
            ProductKind::Selectable { limits } => Some(limits),
            _ => None,
        }
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// Named lists of chosen sub-options, e.g. `"frutas" → ["morango", "kiwi"]`.
pub type ItemOptions = BTreeMap<String, Vec<String>>;

/// A line in an order.
///
/// ## Invariants
/// - Weight-priced lines should carry `weight_grams`
/// - Unit-priced lines use `quantity` (absent means 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    /// Product snapshot at the time it was added.
    pub product: Product,

    #[serde(default)]
    pub quantity: Option<u32>,

    #[serde(default)]
    pub weight_grams: Option<u32>,

    #[serde(default)]
    pub options: ItemOptions,

    #[serde(default)]
    pub addons: Vec<Product>,
}

impl SaleItem {
    /// A plain line: product × quantity.
    pub fn unit(product: Product, quantity: u32) -> Self {
        SaleItem {
            product,
            quantity: Some(quantity),
            weight_grams: None,
            options: ItemOptions::new(),
            addons: Vec::new(),
        }
    }

    /// A weighed line.
    pub fn weighed(product: Product, weight_grams: u32) -> Self {
        SaleItem {
            product,
            quantity: None,
            weight_grams: Some(weight_grams),
            options: ItemOptions::new(),
            addons: Vec::new(),
        }
    }

    /// Quantity with the default of 1 applied.
    #[inline]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Whether this line carries nothing beyond product and quantity.
    pub fn is_plain(&self) -> bool {
        self.weight_grams.is_none() && self.options.is_empty() && self.addons.is_empty()
    }

    /// Monetary total of this line.
    #[inline]
    pub fn total(&self) -> Money {
        calculate_item_total(self)
    }
}

// =============================================================================
// Order Status / Origin / Payment Method
// =============================================================================

/// Lifecycle of an order: open while items are added, completed once paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Open,
    Completed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Open => f.write_str("open"),
            OrderStatus::Completed => f.write_str("completed"),
        }
    }
}

/// Where an order started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderOrigin {
    /// A named tab kept open while the customer orders.
    #[default]
    Comanda,
    /// A counter sale paid immediately.
    DirectSale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; change may be due.
    Cash,
    Credit,
    Debit,
    Pix,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Pix => "pix",
        }
    }

    /// Label printed on receipts.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Credit => "Cartão de crédito",
            PaymentMethod::Debit => "Cartão de débito",
            PaymentMethod::Pix => "Pix",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "credit" | "credito" | "crédito" => Ok(PaymentMethod::Credit),
            "debit" | "debito" | "débito" => Ok(PaymentMethod::Debit),
            "pix" => Ok(PaymentMethod::Pix),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }
            .into()),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An open comanda or a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// UUID v4 generated at creation.
    pub id: String,
    pub customer_name: String,
    #[serde(default)]
    pub origin: OrderOrigin,
    pub items: Vec<SaleItem>,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Frozen at finalization.
    #[serde(default)]
    pub total: Option<Money>,
    /// Cash handed over by the customer.
    #[serde(default)]
    pub amount_tendered: Option<Money>,
    #[serde(default)]
    pub change: Option<Money>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates an empty open order with a fresh id.
    pub fn new(customer_name: impl Into<String>, origin: OrderOrigin, now: DateTime<Utc>) -> Self {
        Order {
            id: Uuid::new_v4().to_string(),
            customer_name: customer_name.into(),
            origin,
            items: Vec::new(),
            status: OrderStatus::Open,
            payment_method: None,
            total: None,
            amount_tendered: None,
            change: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Opens a comanda for a named customer.
    pub fn open_comanda(customer_name: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        let name = crate::validation::validate_customer_name(customer_name)?;
        Ok(Order::new(name, OrderOrigin::Comanda, now))
    }

    /// Starts a counter sale.
    pub fn direct_sale(now: DateTime<Utc>) -> Self {
        Order::new(DIRECT_SALE_CUSTOMER, OrderOrigin::DirectSale, now)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Fails unless the order still accepts changes.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::InvalidOrderStatus {
                order_id: self.id.clone(),
                current_status: self.status.to_string(),
            })
        }
    }

    /// Replaces the item list of an open order.
    pub fn set_items(&mut self, items: Vec<SaleItem>, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_open()?;
        self.items = items;
        self.updated_at = now;
        Ok(())
    }

    /// Timestamp reports bucket this order under.
    #[inline]
    pub fn effective_timestamp(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.created_at)
    }

    /// Total computed from the current items.
    #[inline]
    pub fn computed_total(&self) -> Money {
        calculate_order_total(&self.items)
    }

    /// The frozen total when present, otherwise the computed one.
    pub fn recorded_total(&self) -> Money {
        self.total.unwrap_or_else(|| self.computed_total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
