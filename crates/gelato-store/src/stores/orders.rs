//! Open comandas, persisted under [`ORDERS_KEY`].

use chrono::{DateTime, Utc};
use gelato_core::{CoreError, CoreResult, Order};
use tracing::info;

use super::{load_collection, persist_collection};
use crate::storage::{SharedStorage, ORDERS_KEY};

pub struct OrderStore {
    storage: SharedStorage,
    orders: Vec<Order>,
    last_error: Option<String>,
}

impl OrderStore {
    pub async fn load(storage: SharedStorage) -> Self {
        let (stored, last_error) = load_collection::<Order>(storage.as_ref(), ORDERS_KEY).await;
        OrderStore {
            storage,
            orders: stored.unwrap_or_default(),
            last_error,
        }
    }

    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> CoreResult<&Order> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Opens a comanda for a named customer.
    pub async fn create(&mut self, customer_name: &str, now: DateTime<Utc>) -> CoreResult<Order> {
        let order = Order::open_comanda(customer_name, now)?;
        self.insert(order.clone()).await;
        info!(order_id = %order.id, customer = %order.customer_name, "Comanda opened");
        Ok(order)
    }

    /// Keeps an externally built open order (e.g. a counter sale put on
    /// hold).
    pub async fn insert(&mut self, order: Order) {
        let mut next = self.orders.clone();
        next.push(order);
        self.replace(next).await;
    }

    /// Replaces the stored order with the same id.
    pub async fn update(&mut self, order: Order) -> CoreResult<()> {
        let index = self.position(&order.id)?;

        let mut next = self.orders.clone();
        next[index] = order;
        self.replace(next).await;
        Ok(())
    }

    pub async fn remove(&mut self, id: &str) -> CoreResult<Order> {
        let index = self.position(id)?;

        let mut next = self.orders.clone();
        let removed = next.remove(index);
        self.replace(next).await;
        Ok(removed)
    }

    /// Drops every open order.
    pub async fn reset(&mut self) {
        self.replace(Vec::new()).await;
    }

    fn position(&self, id: &str) -> CoreResult<usize> {
        self.orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    async fn replace(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.last_error = persist_collection(self.storage.as_ref(), ORDERS_KEY, &self.orders).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use gelato_core::{Money, Product, ProductKind, SaleItem};

    use super::*;
    use crate::memory::MemoryStorage;
    use crate::stores::test_support::FlakyStorage;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_update_remove() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = OrderStore::load(storage.clone()).await;

        let mut order = store.create("Ana", now()).await.unwrap();
        let scoop = Product::new(1, "Bola", Money::from_cents(450), "Sorvetes", ProductKind::Unit);
        order.set_items(vec![SaleItem::unit(scoop, 2)], now()).unwrap();
        store.update(order.clone()).await.unwrap();

        let reloaded = OrderStore::load(storage).await;
        assert_eq!(reloaded.get(&order.id).unwrap().computed_total().cents(), 900);

        let removed = store.remove(&order.id).await.unwrap();
        assert_eq!(removed.id, order.id);
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let mut store = OrderStore::load(Arc::new(MemoryStorage::new())).await;
        assert!(store.create("  ", now()).await.is_err());
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let mut store = OrderStore::load(Arc::new(MemoryStorage::new())).await;
        assert!(matches!(store.get("nope"), Err(CoreError::OrderNotFound(_))));
        let ghost = Order::direct_sale(now());
        assert!(store.update(ghost).await.is_err());
        assert!(store.remove("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_write_failure_recorded() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = OrderStore::load(storage.clone()).await;

        storage.fail_writes(true);
        let order = store.create("Bia", now()).await.unwrap();
        assert_eq!(store.list().len(), 1);
        assert!(store.last_error().is_some());

        storage.fail_writes(false);
        store.remove(&order.id).await.unwrap();
        assert!(store.last_error().is_none());
    }
}
