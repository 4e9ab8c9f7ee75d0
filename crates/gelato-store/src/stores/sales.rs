//! Completed sales history, persisted under [`SALES_KEY`].

use gelato_core::report::{generate_sales_report, DateRange, ReportOptions, SalesReport};
use gelato_core::{CoreError, CoreResult, Order};
use tracing::info;

use super::{load_collection, persist_collection};
use crate::storage::{SharedStorage, SALES_KEY};

pub struct SalesStore {
    storage: SharedStorage,
    sales: Vec<Order>,
    last_error: Option<String>,
}

impl SalesStore {
    pub async fn load(storage: SharedStorage) -> Self {
        let (stored, last_error) = load_collection::<Order>(storage.as_ref(), SALES_KEY).await;
        SalesStore {
            storage,
            sales: stored.unwrap_or_default(),
            last_error,
        }
    }

    pub fn list(&self) -> &[Order] {
        &self.sales
    }

    pub fn get(&self, id: &str) -> CoreResult<&Order> {
        self.sales
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records a completed sale. Open orders are rejected.
    pub async fn append(&mut self, sale: Order) -> CoreResult<()> {
        if sale.is_open() {
            return Err(CoreError::InvalidOrderStatus {
                order_id: sale.id,
                current_status: sale.status.to_string(),
            });
        }

        info!(
            order_id = %sale.id,
            total = sale.recorded_total().cents(),
            "Sale recorded"
        );

        let mut next = self.sales.clone();
        next.push(sale);
        self.replace(next).await;
        Ok(())
    }

    /// Appends many completed sales in one write.
    pub async fn extend(&mut self, sales: Vec<Order>) -> CoreResult<()> {
        if let Some(open) = sales.iter().find(|s| s.is_open()) {
            return Err(CoreError::InvalidOrderStatus {
                order_id: open.id.clone(),
                current_status: open.status.to_string(),
            });
        }

        let mut next = self.sales.clone();
        next.extend(sales);
        self.replace(next).await;
        Ok(())
    }

    pub async fn remove(&mut self, id: &str) -> CoreResult<Order> {
        let index = self
            .sales
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;

        let mut next = self.sales.clone();
        let removed = next.remove(index);
        self.replace(next).await;
        Ok(removed)
    }

    /// Empties the history.
    pub async fn reset(&mut self) {
        self.replace(Vec::new()).await;
        info!("Sales history cleared");
    }

    /// Report over the stored history.
    pub fn report(&self, range: DateRange, options: &ReportOptions) -> SalesReport {
        generate_sales_report(&self.sales, range, options)
    }

    async fn replace(&mut self, sales: Vec<Order>) {
        self.sales = sales;
        self.last_error = persist_collection(self.storage.as_ref(), SALES_KEY, &self.sales).await;
    }
}
