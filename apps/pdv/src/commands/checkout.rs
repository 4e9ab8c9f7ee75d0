//! # Checkout Commands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    finalize_order                                       │
//! │                                                                         │
//! │  1. Pre-check (read lock)   open? has items? cash covers total?        │
//! │  2. Checkout delay          no locks held, teardown ──► CANCELLED      │
//! │  3. Complete (write locks)  re-read order, freeze total, move it from  │
//! │                             open orders to the sales history           │
//! │  4. Print                   receipt HTML to the printer, failures are  │
//! │                             logged and never undo the sale             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use gelato_core::checkout::settle;
use gelato_core::receipt::render_receipt_html;
use gelato_core::{finalize_order as complete_order, CoreError, Money, Order, Payment, PaymentMethod, Settlement};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::{join_store_errors, AppState, DelayOutcome};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    /// Cash handed over. Absent for cash means the exact amount.
    #[serde(default)]
    pub amount_tendered_cents: Option<i64>,
}

impl From<PaymentRequest> for Payment {
    fn from(req: PaymentRequest) -> Self {
        Payment {
            method: req.method,
            amount_tendered: req.amount_tendered_cents.map(Money::from_cents),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub total_cents: i64,
    pub amount_tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
}

impl From<Settlement> for SettlementResponse {
    fn from(settlement: Settlement) -> Self {
        SettlementResponse {
            total_cents: settlement.total.cents(),
            amount_tendered_cents: settlement.amount_tendered.map(|m| m.cents()),
            change_cents: settlement.change.map(|m| m.cents()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub sale: Order,
    pub settlement: SettlementResponse,
    /// Where the receipt was written, when printing succeeded.
    pub receipt_path: Option<String>,
    /// Set when the sale was recorded in memory but could not be saved.
    pub storage_error: Option<String>,
}

/// Shows the total and change for a payment without completing anything.
pub async fn preview_settlement(state: &AppState, order_id: String, payment: PaymentRequest) -> ApiResult<SettlementResponse> {
    state.session.require_auth()?;

    let total = state.orders.read().await.get(&order_id)?.computed_total();
    Ok(settle(total, &payment.into())?.into())
}

/// Takes payment for an open order and records the sale.
pub async fn finalize_order(state: &AppState, order_id: String, payment: PaymentRequest) -> ApiResult<CheckoutResponse> {
    debug!(order_id = %order_id, method = %payment.method, "finalize_order command");
    state.session.require_auth()?;

    let payment: Payment = payment.into();

    {
        let orders = state.orders.read().await;
        let order = orders.get(&order_id)?;
        order.ensure_open()?;
        if order.items.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }
        settle(order.computed_total(), &payment)?;
    }

    if state.session.delay(state.config.checkout_delay()).wait().await == DelayOutcome::Cancelled {
        info!(order_id = %order_id, "Sale completion cancelled by teardown");
        return Err(ApiError::cancelled("Sale completion"));
    }

    let (sale, settlement, storage_error) = {
        let mut orders = state.orders.write().await;
        let mut sales = state.sales.write().await;

        // The order may have changed during the delay
        let mut order = orders.get(&order_id)?.clone();
        let settlement = complete_order(&mut order, &payment, Utc::now())?;

        orders.remove(&order_id).await?;
        sales.append(order.clone()).await?;

        let storage_error = join_store_errors([orders.last_error(), sales.last_error()]);
        if let Some(error) = &storage_error {
            warn!(error = %error, order_id = %order_id, "Sale kept in memory but not saved");
        }
        (order, settlement, storage_error)
    };

    info!(
        order_id = %sale.id,
        customer = %sale.customer_name,
        method = %payment.method,
        total = settlement.total.cents(),
        change = ?settlement.change.map(|m| m.cents()),
        "Sale completed"
    );

    let receipt_path = print_receipt(state, &sale).await;

    Ok(CheckoutResponse {
        settlement: settlement.into(),
        sale,
        receipt_path,
        storage_error,
    })
}

/// Receipt HTML for an open order (conference slip) or a completed sale.
pub async fn preview_receipt(state: &AppState, order_id: String) -> ApiResult<String> {
    state.session.require_auth()?;

    let order = find_any_order(state, &order_id).await?;
    Ok(render_receipt_html(&order, &state.config.receipt_header()))
}

/// Sends a completed sale's receipt to the printer again.
pub async fn reprint_receipt(state: &AppState, order_id: String) -> ApiResult<String> {
    debug!(order_id = %order_id, "reprint_receipt command");
    state.session.require_auth()?;

    let sale = state.sales.read().await.get(&order_id)?.clone();
    print_receipt(state, &sale)
        .await
        .ok_or_else(|| ApiError::internal("Receipt could not be printed"))
}

async fn find_any_order(state: &AppState, order_id: &str) -> ApiResult<Order> {
    if let Ok(order) = state.orders.read().await.get(order_id) {
        return Ok(order.clone());
    }
    Ok(state.sales.read().await.get(order_id)?.clone())
}

/// Runs the printer on the blocking pool; it does file or device I/O.
async fn print_receipt(state: &AppState, sale: &Order) -> Option<String> {
    let printer = state.printer.clone()?;
    let html = render_receipt_html(sale, &state.config.receipt_header());
    let order_id = sale.id.clone();

    let printed = tokio::task::spawn_blocking(move || printer.print(&order_id, &html)).await;
    match printed {
        Ok(Ok(path)) => Some(path.display().to_string()),
        Ok(Err(e)) => {
            warn!(order_id = %sale.id, error = %e, "Failed to print receipt");
            None
        }
        Err(e) => {
            warn!(order_id = %sale.id, error = %e, "Receipt printer task failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use gelato_core::OrderStatus;
    use gelato_store::{MemoryStorage, SharedStorage};

    use super::*;
    use crate::commands::comanda::{add_unit_item, add_weighed_item, open_comanda, start_direct_sale};
    use crate::commands::session::session_status;
    use crate::commands::test_support::{instant_config, logged_in_state, UnwritableStorage};
    use crate::error::ErrorCode;
    use crate::state::{FileReceiptPrinter, ReceiptPrinter};

    #[derive(Default)]
    struct RecordingPrinter {
        printed: Mutex<Vec<String>>,
    }

    impl ReceiptPrinter for RecordingPrinter {
        fn print(&self, order_id: &str, html: &str) -> std::io::Result<std::path::PathBuf> {
            self.printed.lock().unwrap().push(html.to_string());
            Ok(std::path::PathBuf::from(format!("{}.html", order_id)))
        }
    }

    struct BrokenPrinter;

    impl ReceiptPrinter for BrokenPrinter {
        fn print(&self, _: &str, _: &str) -> std::io::Result<std::path::PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "out of paper"))
        }
    }

    fn cash(cents: i64) -> PaymentRequest {
        PaymentRequest {
            method: PaymentMethod::Cash,
            amount_tendered_cents: Some(cents),
        }
    }

    #[tokio::test]
    async fn test_cash_sale_with_change() {
        let printer = Arc::new(RecordingPrinter::default());
        let state = logged_in_state(Some(printer.clone())).await;
        let order = open_comanda(&state, "Ana".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 1, 2).await.unwrap();

        let preview = preview_settlement(&state, order.id.clone(), cash(2000)).await.unwrap();
        assert_eq!(preview.change_cents, Some(400));

        let response = finalize_order(&state, order.id.clone(), cash(2000)).await.unwrap();

        assert_eq!(response.settlement.total_cents, 1600);
        assert_eq!(response.settlement.change_cents, Some(400));
        assert_eq!(response.sale.status, OrderStatus::Completed);
        assert_eq!(response.receipt_path, Some(format!("{}.html", order.id)));
        assert_eq!(response.storage_error, None);

        assert!(state.orders.read().await.list().is_empty());
        assert_eq!(state.sales.read().await.list().len(), 1);

        let printed = printer.printed.lock().unwrap();
        assert!(printed[0].contains("Troco"));
        assert!(printed[0].contains("Ana"));
    }

    #[tokio::test]
    async fn test_insufficient_cash_keeps_order_open() {
        let state = logged_in_state(None).await;
        let order = open_comanda(&state, "Bia".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 3, 1).await.unwrap();

        let err = finalize_order(&state, order.id.clone(), cash(1000)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentError);
        assert!(state.orders.read().await.get(&order.id).unwrap().is_open());
        assert!(state.sales.read().await.list().is_empty());
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let state = logged_in_state(None).await;
        let order = start_direct_sale(&state).await.unwrap();

        let err = finalize_order(&state, order.id, PaymentRequest {
            method: PaymentMethod::Pix,
            amount_tendered_cents: None,
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_card_sale_has_no_change_and_printer_failure_is_harmless() {
        let state = logged_in_state(Some(Arc::new(BrokenPrinter))).await;
        let order = start_direct_sale(&state).await.unwrap();
        add_weighed_item(&state, order.id.clone(), 13, 300).await.unwrap();

        let response = finalize_order(&state, order.id.clone(), PaymentRequest {
            method: PaymentMethod::Debit,
            amount_tendered_cents: None,
        })
        .await
        .unwrap();

        // R$ 54,90/kg × 300 g = R$ 16,47
        assert_eq!(response.settlement.total_cents, 1647);
        assert_eq!(response.settlement.change_cents, None);
        assert_eq!(response.receipt_path, None);
        assert_eq!(state.sales.read().await.list().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_twice_fails() {
        let state = logged_in_state(None).await;
        let order = open_comanda(&state, "Caio".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 31, 1).await.unwrap();

        let pix = PaymentRequest {
            method: PaymentMethod::Pix,
            amount_tendered_cents: None,
        };
        finalize_order(&state, order.id.clone(), pix).await.unwrap();

        let err = finalize_order(&state, order.id.clone(), pix).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let html = preview_receipt(&state, order.id).await.unwrap();
        assert!(html.contains("Água mineral"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_delay_drops_completion() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let mut config = instant_config();
        config.session.checkout_delay_ms = 500;
        let state = Arc::new(crate::state::AppState::new(config, storage, None).await);
        state.session.login("x").await.unwrap();

        let order = open_comanda(&state, "Duda".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 2, 1).await.unwrap();

        let pending = {
            let state = state.clone();
            let id = order.id.clone();
            tokio::spawn(async move { finalize_order(&state, id, cash(2000)).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        state.session.teardown();

        let err = pending.await.unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);
        assert!(state.orders.read().await.get(&order.id).unwrap().is_open());
        assert!(state.sales.read().await.list().is_empty());
    }

    #[tokio::test]
    async fn test_unsaved_sale_reports_storage_error() {
        let storage = Arc::new(UnwritableStorage::default());
        let state = crate::state::AppState::new(instant_config(), storage.clone(), None).await;
        state.session.login("x").await.unwrap();

        let order = open_comanda(&state, "Fabi".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 1, 1).await.unwrap();

        storage.fail_writes(true);
        let response = finalize_order(&state, order.id.clone(), cash(800)).await.unwrap();

        assert!(response.storage_error.unwrap().contains("disk full"));
        assert_eq!(state.sales.read().await.get(&order.id).unwrap().id, order.id);
        assert!(session_status(&state).await.storage_error.unwrap().contains("disk full"));

        storage.fail_writes(false);
        let next = start_direct_sale(&state).await.unwrap();
        add_unit_item(&state, next.id.clone(), 1, 1).await.unwrap();
        let response = finalize_order(&state, next.id, cash(800)).await.unwrap();

        assert_eq!(response.storage_error, None);
        assert_eq!(session_status(&state).await.storage_error, None);
    }

    #[tokio::test]
    async fn test_file_printer_and_reprint() {
        let dir = tempfile::tempdir().unwrap();
        let printer: Arc<dyn ReceiptPrinter> = Arc::new(FileReceiptPrinter::new(dir.path()));
        let state = logged_in_state(Some(printer)).await;

        let order = open_comanda(&state, "Enzo".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 30, 1).await.unwrap();
        let response = finalize_order(&state, order.id.clone(), cash(1800)).await.unwrap();

        let path = response.receipt_path.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Milkshake 400ml"));

        std::fs::remove_file(&path).unwrap();
        assert_eq!(reprint_receipt(&state, order.id).await.unwrap(), path);
        assert!(std::path::Path::new(&path).exists());
    }
}
