//! # Report Commands
//!
//! Sales history and the aggregated report. Days and hours are the shop's
//! local ones (`store.utc_offset_minutes`).

use chrono::{DateTime, Utc};
use gelato_core::report::filter_orders_by_range;
use gelato_core::{DateRange, Order, SalesReport, MAX_REPORT_DAYS};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Report over an explicit range. An inverted range gives the zero report.
pub async fn sales_report(state: &AppState, start: DateTime<Utc>, end: DateTime<Utc>) -> ApiResult<SalesReport> {
    debug!(%start, %end, "sales_report command");
    state.session.require_auth()?;

    let options = state.config.report_options();
    Ok(state.sales.read().await.report(DateRange::new(start, end), &options))
}

/// Report for the current local day.
pub async fn today_report(state: &AppState) -> ApiResult<SalesReport> {
    last_days_report(state, 1).await
}

/// Report for the last `days` local days, today included.
pub async fn last_days_report(state: &AppState, days: u32) -> ApiResult<SalesReport> {
    debug!(days, "last_days_report command");
    state.session.require_auth()?;

    if days == 0 || days > MAX_REPORT_DAYS {
        return Err(ApiError::validation(format!("days must be between 1 and {}", MAX_REPORT_DAYS)));
    }

    let options = state.config.report_options();
    let range = DateRange::last_days(Utc::now(), days, options.offset());
    Ok(state.sales.read().await.report(range, &options))
}

/// Completed sales, newest first, optionally limited to a range.
pub async fn list_sales(state: &AppState, range: Option<DateRange>) -> ApiResult<Vec<Order>> {
    state.session.require_auth()?;

    let sales = state.sales.read().await;
    let mut listed: Vec<Order> = match range {
        Some(range) => filter_orders_by_range(sales.list(), &range).into_iter().cloned().collect(),
        None => sales.list().to_vec(),
    };
    listed.sort_by(|a, b| b.effective_timestamp().cmp(&a.effective_timestamp()));
    Ok(listed)
}

pub async fn get_sale(state: &AppState, sale_id: String) -> ApiResult<Order> {
    state.session.require_auth()?;
    Ok(state.sales.read().await.get(&sale_id)?.clone())
}

/// Deletes one sale from the history.
pub async fn delete_sale(state: &AppState, sale_id: String) -> ApiResult<Order> {
    debug!(sale_id = %sale_id, "delete_sale command");
    state.session.require_auth()?;

    let mut sales = state.sales.write().await;
    let removed = sales.remove(&sale_id).await?;
    if let Some(error) = sales.last_error() {
        warn!(error, "Sale deletion kept in memory but not saved");
    }

    info!(sale_id = %removed.id, total = removed.recorded_total().cents(), "Sale deleted");
    Ok(removed)
}

/// Clears the whole history.
pub async fn reset_sales(state: &AppState) -> ApiResult<()> {
    state.session.require_auth()?;

    let mut sales = state.sales.write().await;
    sales.reset().await;
    if let Some(error) = sales.last_error() {
        warn!(error, "Sales reset kept in memory but not saved");
    }
    Ok(())
}
