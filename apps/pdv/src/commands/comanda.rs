//! # Comanda Commands
//!
//! Open orders: named comandas and counter sales waiting for payment.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Lifecycle                                      │
//! │                                                                         │
//! │  open_comanda("Ana") ──┐                                               │
//! │                        ├──► Open ──► add_*_item / update / remove ──┐   │
//! │  start_direct_sale() ──┘      ▲                                     │   │
//! │                               └─────────────────────────────────────┘   │
//! │                               │                                         │
//! │                      finalize_order (checkout.rs)                       │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                  Completed, moved to the sales history                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every item edit works on a copy of the order's lines through a [`Cart`],
//! then replaces the stored order in one write.

use chrono::Utc;
use gelato_core::{Cart, CoreResult, ItemOptions, Order, OrderOrigin, Product};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub customer_name: String,
    pub origin: OrderOrigin,
    pub item_count: usize,
    pub total_cents: i64,
    pub created_at: String,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            id: order.id.clone(),
            customer_name: order.customer_name.clone(),
            origin: order.origin,
            item_count: order.items.len(),
            total_cents: order.computed_total().cents(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizedItem {
    pub product_id: u32,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub options: ItemOptions,
    #[serde(default)]
    pub addon_ids: Vec<u32>,
}

fn one() -> u32 {
    1
}

pub async fn list_open_orders(state: &AppState) -> ApiResult<Vec<OrderSummary>> {
    state.session.require_auth()?;
    Ok(state.orders.read().await.list().iter().map(OrderSummary::from).collect())
}

pub async fn get_order(state: &AppState, order_id: String) -> ApiResult<Order> {
    state.session.require_auth()?;
    Ok(state.orders.read().await.get(&order_id)?.clone())
}

/// Opens a comanda. The name is trimmed and must not be empty.
pub async fn open_comanda(state: &AppState, customer_name: String) -> ApiResult<Order> {
    debug!(customer = %customer_name, "open_comanda command");
    state.session.require_auth()?;

    let mut orders = state.orders.write().await;
    let order = orders.create(&customer_name, Utc::now()).await?;
    log_store_error(orders.last_error());
    Ok(order)
}

/// Starts a counter sale, kept with the open orders until it is paid.
pub async fn start_direct_sale(state: &AppState) -> ApiResult<Order> {
    debug!("start_direct_sale command");
    state.session.require_auth()?;

    let order = Order::direct_sale(Utc::now());
    let mut orders = state.orders.write().await;
    orders.insert(order.clone()).await;
    log_store_error(orders.last_error());

    info!(order_id = %order.id, "Direct sale started");
    Ok(order)
}

pub async fn add_unit_item(state: &AppState, order_id: String, product_id: u32, quantity: u32) -> ApiResult<Order> {
    debug!(order_id = %order_id, product_id, quantity, "add_unit_item command");
    state.session.require_auth()?;

    let product = lookup_product(state, product_id).await?;
    edit_items(state, &order_id, |cart| cart.add_unit(&product, quantity).map(|_| ())).await
}

/// Adds a weight-priced product with the scale reading in grams.
pub async fn add_weighed_item(state: &AppState, order_id: String, product_id: u32, weight_grams: u32) -> ApiResult<Order> {
    debug!(order_id = %order_id, product_id, weight_grams, "add_weighed_item command");
    state.session.require_auth()?;

    let product = lookup_product(state, product_id).await?;
    edit_items(state, &order_id, |cart| cart.add_weighed(&product, weight_grams).map(|_| ())).await
}

/// Adds a cup built from sub-options and add-ons.
pub async fn add_customized_item(state: &AppState, order_id: String, item: CustomizedItem) -> ApiResult<Order> {
    debug!(order_id = %order_id, product_id = item.product_id, "add_customized_item command");
    state.session.require_auth()?;

    let product = lookup_product(state, item.product_id).await?;
    let addons = lookup_products(state, &item.addon_ids).await?;
    edit_items(state, &order_id, |cart| {
        cart.add_customized(&product, item.quantity, item.options, addons)
            .map(|_| ())
    })
    .await
}

pub async fn attach_addons(state: &AppState, order_id: String, line: usize, addon_ids: Vec<u32>) -> ApiResult<Order> {
    debug!(order_id = %order_id, line, "attach_addons command");
    state.session.require_auth()?;

    let addons = lookup_products(state, &addon_ids).await?;
    edit_items(state, &order_id, |cart| cart.attach_addons(line, addons)).await
}

/// Sets a line's quantity; zero removes the line.
pub async fn update_item_quantity(state: &AppState, order_id: String, line: usize, quantity: u32) -> ApiResult<Order> {
    debug!(order_id = %order_id, line, quantity, "update_item_quantity command");
    state.session.require_auth()?;
    edit_items(state, &order_id, |cart| cart.update_quantity(line, quantity)).await
}

pub async fn remove_item(state: &AppState, order_id: String, line: usize) -> ApiResult<Order> {
    debug!(order_id = %order_id, line, "remove_item command");
    state.session.require_auth()?;
    edit_items(state, &order_id, |cart| cart.remove(line).map(|_| ())).await
}

/// Drops an open order without recording a sale.
pub async fn cancel_order(state: &AppState, order_id: String) -> ApiResult<Order> {
    debug!(order_id = %order_id, "cancel_order command");
    state.session.require_auth()?;

    let mut orders = state.orders.write().await;
    let removed = orders.remove(&order_id).await?;
    log_store_error(orders.last_error());

    info!(order_id = %removed.id, customer = %removed.customer_name, "Order cancelled");
    Ok(removed)
}

async fn lookup_product(state: &AppState, id: u32) -> ApiResult<Product> {
    Ok(state.catalog.read().await.get(id)?.clone())
}

async fn lookup_products(state: &AppState, ids: &[u32]) -> ApiResult<Vec<Product>> {
    let catalog = state.catalog.read().await;
    let products = ids
        .iter()
        .map(|id| catalog.get(*id).cloned())
        .collect::<CoreResult<Vec<_>>>()?;
    Ok(products)
}

/// Applies `edit` to the order's lines and stores the result. On error the
/// stored order is left as it was.
async fn edit_items<F>(state: &AppState, order_id: &str, edit: F) -> ApiResult<Order>
where
    F: FnOnce(&mut Cart) -> CoreResult<()>,
{
    let mut orders = state.orders.write().await;

    let mut order = orders.get(order_id)?.clone();
    order.ensure_open()?;

    let mut cart = Cart::from_items(std::mem::take(&mut order.items));
    edit(&mut cart)?;
    order.set_items(cart.into_items(), Utc::now())?;

    orders.update(order.clone()).await?;
    log_store_error(orders.last_error());

    debug!(order_id = %order.id, items = order.items.len(), total = order.computed_total().cents(), "Order updated");
    Ok(order)
}

fn log_store_error(error: Option<&str>) {
    if let Some(error) = error {
        warn!(error, "Order change kept in memory but not saved");
    }
}

#[cfg(test)]
mod tests {
    use gelato_core::types::{FRUITS_GROUP, TOPPINGS_GROUP};
    use gelato_core::DIRECT_SALE_CUSTOMER;

    use super::*;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_open_comanda_validates_name() {
        let state = logged_in_state(None).await;

        let err = open_comanda(&state, "   ".into()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let order = open_comanda(&state, "  Ana  ".into()).await.unwrap();
        assert_eq!(order.customer_name, "Ana");
        assert!(order.is_open());

        let listed = list_open_orders(&state).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_name, "Ana");
    }

    #[tokio::test]
    async fn test_unit_and_addon_lines_total() {
        let state = logged_in_state(None).await;
        let order = open_comanda(&state, "Bruno".into()).await.unwrap();

        // 2 × R$ 8,00 scoop, then the same product merges into the line
        add_unit_item(&state, order.id.clone(), 1, 1).await.unwrap();
        let order = add_unit_item(&state, order.id.clone(), 1, 1).await.unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, Some(2));

        // + Calda (R$ 3,00) on that line: 2 × (8 + 3) = 22,00
        let order = attach_addons(&state, order.id.clone(), 0, vec![20]).await.unwrap();
        assert_eq!(order.computed_total().cents(), 2200);

        let stored = get_order(&state, order.id.clone()).await.unwrap();
        assert_eq!(stored, order);
    }

    #[tokio::test]
    async fn test_weighed_item() {
        let state = logged_in_state(None).await;
        let order = start_direct_sale(&state).await.unwrap();
        assert_eq!(order.customer_name, DIRECT_SALE_CUSTOMER);

        // R$ 59,90/kg × 500 g = R$ 29,95
        let order = add_weighed_item(&state, order.id.clone(), 4, 500).await.unwrap();
        assert_eq!(order.computed_total().cents(), 2995);

        let err = add_weighed_item(&state, order.id.clone(), 4, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_unit_item(&state, order.id.clone(), 4, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_customized_item_respects_limits() {
        let state = logged_in_state(None).await;
        let order = open_comanda(&state, "Carla".into()).await.unwrap();

        let mut options = ItemOptions::new();
        options.insert(FRUITS_GROUP.into(), vec!["morango".into(), "kiwi".into(), "manga".into()]);
        let err = add_customized_item(
            &state,
            order.id.clone(),
            CustomizedItem {
                product_id: 11,
                quantity: 1,
                options: options.clone(),
                addon_ids: vec![],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_order(&state, order.id.clone()).await.unwrap().items.is_empty());

        options.insert(FRUITS_GROUP.into(), vec!["morango".into(), "kiwi".into()]);
        options.insert(TOPPINGS_GROUP.into(), vec!["granola".into()]);
        let order = add_customized_item(
            &state,
            order.id.clone(),
            CustomizedItem {
                product_id: 11,
                quantity: 1,
                options,
                addon_ids: vec![22],
            },
        )
        .await
        .unwrap();

        // Açaí 500ml 22,00 + Nutella 6,00
        assert_eq!(order.computed_total().cents(), 2800);
        assert_eq!(order.items[0].addons[0].name, "Nutella");
    }

    #[tokio::test]
    async fn test_update_remove_and_cancel() {
        let state = logged_in_state(None).await;
        let order = open_comanda(&state, "Davi".into()).await.unwrap();
        add_unit_item(&state, order.id.clone(), 5, 1).await.unwrap();
        add_unit_item(&state, order.id.clone(), 31, 1).await.unwrap();

        let order = update_item_quantity(&state, order.id.clone(), 0, 3).await.unwrap();
        assert_eq!(order.items[0].quantity, Some(3));

        let order = update_item_quantity(&state, order.id.clone(), 1, 0).await.unwrap();
        assert_eq!(order.items.len(), 1);

        let err = remove_item(&state, order.id.clone(), 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        let order = remove_item(&state, order.id.clone(), 0).await.unwrap();
        assert!(order.items.is_empty());

        cancel_order(&state, order.id.clone()).await.unwrap();
        let err = get_order(&state, order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let state = logged_in_state(None).await;
        let order = open_comanda(&state, "Eva".into()).await.unwrap();

        let err = add_unit_item(&state, order.id, 999, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
