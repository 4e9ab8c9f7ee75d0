//! # gelato-core: Pure Business Logic for Gelato PDV
//!
//! Everything the ice-cream shop's point of sale decides (prices, totals,
//! cart rules, checkout, reports, receipts) lives here as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gelato PDV Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (web)                              │   │
//! │  │    Catalog ──► Comanda ──► Payment ──► Receipt ──► Reports      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON DTOs                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/pdv commands                            │   │
//! │  │    open_comanda, add_item, finalize_order, sales_report, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gelato-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │ pricing │ │  cart   │ │checkout │ │ report  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                gelato-store (Persistence Layer)                 │   │
//! │  │          Storage adapters, catalog / order / sales stores       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleItem, Order, PaymentMethod)
//! - [`money`] - Money type with integer centavos
//! - [`pricing`] - Item and order totals
//! - [`cart`] - Order builder
//! - [`checkout`] - Payment and finalization
//! - [`catalog`] - Product search and the default catalog
//! - [`report`] - Sales report aggregation
//! - [`receipt`] - Printable receipt rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use gelato_core::{Cart, Money, Product, ProductKind};
//!
//! let scoop = Product::new(1, "Bola de sorvete", Money::from_cents(450), "Sorvetes", ProductKind::Unit);
//! let kilo = Product::new(2, "Sorvete a quilo", Money::from_cents(4700), "Sorvetes", ProductKind::Weight);
//!
//! let mut cart = Cart::new();
//! cart.add_unit(&scoop, 2).unwrap();
//! cart.add_weighed(&kilo, 500).unwrap();
//!
//! assert_eq!(cart.total().cents(), 900 + 2350);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use checkout::{finalize_order, Payment, Settlement};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{calculate_item_total, calculate_order_total};
pub use report::{generate_sales_report, DateRange, ReportOptions, SalesReport, TopProduct};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches a mistyped "100" when the cashier meant "10".
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Heaviest scale reading accepted for one line (10 kg).
pub const MAX_WEIGHT_GRAMS: u32 = 10_000;

/// Highest catalog price (R$ 10.000,00). Keeps any line total, add-ons
/// included, far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000;

/// How many products the report ranks by default.
pub const DEFAULT_TOP_PRODUCTS: usize = 10;

/// Longest window, in local days, a report is built over.
pub const MAX_REPORT_DAYS: u32 = 366;
