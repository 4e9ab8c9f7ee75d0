//! # Sales Report Aggregator
//!
//! Pure aggregation over completed sales for a date range.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      generate_sales_report                              │
//! │                                                                         │
//! │  sales history ──► filter_orders_by_range ──► matching orders           │
//! │                                                   │                     │
//! │            ┌──────────────┬───────────────┬───────┴──────┬──────────┐  │
//! │            ▼              ▼               ▼              ▼          ▼  │
//! │     count/revenue   by payment     by category      by hour     top N  │
//! │     avg ticket      (revenue)      (quantity)       (revenue)  (revenue)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - An order belongs to the range when `completed_at` (or `created_at` when
//!   absent) lies in `[start, end]`, both ends inclusive
//! - Order revenue is the frozen `total`, recomputed from items when absent
//! - Sales with no payment method land in the `"outros"` bucket
//! - Hours are taken in the shop's local offset
//! - Top products keep first-seen order on equal revenue
//! - A range with `start > end` yields the zero report

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Order;
use crate::{DEFAULT_TOP_PRODUCTS, MAX_REPORT_DAYS};

/// Bucket for sales recorded without a payment method.
pub const UNKNOWN_PAYMENT_BUCKET: &str = "outros";

// =============================================================================
// Inputs
// =============================================================================

/// Inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    /// `false` when start is after end.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// One calendar day in the shop's local time.
    pub fn for_local_day(date: NaiveDate, offset: FixedOffset) -> Self {
        // Saturates at the edges of the representable calendar
        let local_midnight = date.and_time(NaiveTime::MIN);
        let start = Utc
            .from_utc_datetime(&local_midnight)
            .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = start
            .checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        DateRange { start, end }
    }

    /// The last `days` local days, today included, ending at `now`.
    ///
    /// `days` is clamped to `1..=MAX_REPORT_DAYS`.
    pub fn last_days(now: DateTime<Utc>, days: u32, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        let back = days.clamp(1, MAX_REPORT_DAYS) - 1;
        let first = today.checked_sub_days(Days::new(u64::from(back))).unwrap_or(NaiveDate::MIN);
        let start = DateRange::for_local_day(first, offset).start;
        DateRange { start, end: now }
    }
}

/// Knobs for report generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// How many products to rank.
    pub top_n: usize,
    /// Shop offset from UTC, used for hour-of-day buckets.
    pub utc_offset_minutes: i32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            top_n: DEFAULT_TOP_PRODUCTS,
            utc_offset_minutes: 0,
        }
    }
}

impl ReportOptions {
    /// The configured offset; out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }
}

// =============================================================================
// Output
// =============================================================================

/// A product's ranking entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub product_id: u32,
    pub name: String,
    pub quantity: u64,
    pub revenue: Money,
}

/// Aggregated view of the sales in a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub range: DateRange,
    pub total_sales: usize,
    pub total_revenue: Money,
    pub average_ticket: Money,
    /// Revenue per payment method (`cash`, `pix`, ..., `outros`).
    pub by_payment_method: BTreeMap<String, Money>,
    /// Units sold per product category.
    pub by_category: BTreeMap<String, u64>,
    /// Revenue per local hour of day, only hours with sales.
    pub by_hour: BTreeMap<u32, Money>,
    pub top_products: Vec<TopProduct>,
}

impl SalesReport {
    /// The zero report: no sales, empty groupings.
    pub fn empty(range: DateRange) -> Self {
        SalesReport {
            range,
            total_sales: 0,
            total_revenue: Money::zero(),
            average_ticket: Money::zero(),
            by_payment_method: BTreeMap::new(),
            by_category: BTreeMap::new(),
            by_hour: BTreeMap::new(),
            top_products: Vec::new(),
        }
    }
}

// =============================================================================
// Aggregators
// =============================================================================

/// Builds the full report for `range`.
pub fn generate_sales_report(orders: &[Order], range: DateRange, options: &ReportOptions) -> SalesReport {
    let matching = filter_orders_by_range(orders, &range);
    if matching.is_empty() {
        return SalesReport::empty(range);
    }

    let total_revenue: Money = matching.iter().map(|o| o.recorded_total()).sum();

    SalesReport {
        range,
        total_sales: matching.len(),
        total_revenue,
        average_ticket: total_revenue.average_over(matching.len()),
        by_payment_method: sales_by_payment_method(&matching),
        by_category: sales_by_category(&matching),
        by_hour: sales_by_hour(&matching, options.offset()),
        top_products: top_products(&matching, options.top_n),
    }
}

/// Orders whose effective timestamp falls inside `range`, in input order.
pub fn filter_orders_by_range<'a>(orders: &'a [Order], range: &DateRange) -> Vec<&'a Order> {
    if !range.is_valid() {
        return Vec::new();
    }
    orders
        .iter()
        .filter(|o| range.contains(o.effective_timestamp()))
        .collect()
}

pub fn sales_by_payment_method(orders: &[&Order]) -> BTreeMap<String, Money> {
    let mut totals = BTreeMap::new();
    for order in orders {
        let key = order
            .payment_method
            .map_or(UNKNOWN_PAYMENT_BUCKET, |m| m.as_str());
        *totals.entry(key.to_string()).or_insert_with(Money::zero) += order.recorded_total();
    }
    totals
}

pub fn sales_by_category(orders: &[&Order]) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for item in orders.iter().flat_map(|o| o.items.iter()) {
        *totals.entry(item.product.category.clone()).or_insert(0) += u64::from(item.effective_quantity());
    }
    totals
}

pub fn sales_by_hour(orders: &[&Order], offset: FixedOffset) -> BTreeMap<u32, Money> {
    let mut totals = BTreeMap::new();
    for order in orders {
        let hour = order.effective_timestamp().with_timezone(&offset).hour();
        *totals.entry(hour).or_insert_with(Money::zero) += order.recorded_total();
    }
    totals
}

/// Ranks products by revenue, highest first.
///
/// Quantity and revenue accumulate per product id over every line of every
/// order. The reported name is the one seen first.
pub fn top_products(orders: &[&Order], limit: usize) -> Vec<TopProduct> {
    let mut ranking: Vec<TopProduct> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();

    for item in orders.iter().flat_map(|o| o.items.iter()) {
        let slot = *index.entry(item.product.id).or_insert_with(|| {
            ranking.push(TopProduct {
                product_id: item.product.id,
                name: item.product.name.clone(),
                quantity: 0,
                revenue: Money::zero(),
            });
            ranking.len() - 1
        });

        let entry = &mut ranking[slot];
        entry.quantity += u64::from(item.effective_quantity());
        entry.revenue += item.total();
    }

    // Vec::sort_by is stable
    ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}

// =============================================================================
// Unit Tests
// =============================================================================
