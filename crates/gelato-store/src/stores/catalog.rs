//! Product catalog store, persisted under [`PRODUCTS_KEY`].

use gelato_core::catalog::{default_catalog, find_product, next_product_id, search_products, validate_product};
use gelato_core::{CoreError, CoreResult, Product};
use tracing::info;

use super::{load_collection, persist_collection};
use crate::storage::{SharedStorage, PRODUCTS_KEY};

pub struct CatalogStore {
    storage: SharedStorage,
    products: Vec<Product>,
    last_error: Option<String>,
}

impl CatalogStore {
    /// Loads the persisted catalog. A first run seeds and saves the default
    /// catalog.
    pub async fn load(storage: SharedStorage) -> Self {
        let (stored, load_error) = load_collection::<Product>(storage.as_ref(), PRODUCTS_KEY).await;

        let mut store = CatalogStore {
            storage,
            products: Vec::new(),
            last_error: load_error,
        };

        match stored {
            Some(products) => store.products = products,
            None => {
                info!("No catalog stored, installing default catalog");
                store.replace(default_catalog()).await;
            }
        }
        store
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: u32) -> CoreResult<&Product> {
        find_product(&self.products, id)
    }

    /// Case-insensitive search on name and category.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        search_products(&self.products, query)
    }

    /// Last persistence failure, cleared by the next successful write.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Adds a product. An id of 0 is replaced by the next free id.
    pub async fn add(&mut self, mut product: Product) -> CoreResult<Product> {
        if product.id == 0 {
            product.id = next_product_id(&self.products);
        }
        validate_product(&product, &self.products, None)?;

        let mut next = self.products.clone();
        next.push(product.clone());
        self.replace(next).await;

        info!(product_id = product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Replaces the product with the same id.
    pub async fn update(&mut self, product: Product) -> CoreResult<()> {
        let index = self.position(product.id)?;
        validate_product(&product, &self.products, Some(product.id))?;

        let mut next = self.products.clone();
        next[index] = product;
        self.replace(next).await;
        Ok(())
    }

    /// Removes a product. Orders keep their own snapshot copies.
    pub async fn remove(&mut self, id: u32) -> CoreResult<Product> {
        let index = self.position(id)?;

        let mut next = self.products.clone();
        let removed = next.remove(index);
        self.replace(next).await;

        info!(product_id = id, "Product removed");
        Ok(removed)
    }

    /// Restores the default catalog.
    pub async fn reset(&mut self) {
        self.replace(default_catalog()).await;
        info!(count = self.products.len(), "Catalog reset to defaults");
    }

    fn position(&self, id: u32) -> CoreResult<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))
    }

    async fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.last_error = persist_collection(self.storage.as_ref(), PRODUCTS_KEY, &self.products).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gelato_core::{Money, ProductKind};

    use super::*;
    use crate::memory::MemoryStorage;
    use crate::storage::{load_json, Storage};
    use crate::stores::test_support::FlakyStorage;

    fn cone() -> Product {
        Product::new(0, "Casquinha", Money::from_cents(500), "Sorvetes", ProductKind::Unit)
    }

    #[tokio::test]
    async fn test_first_load_installs_default_catalog() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CatalogStore::load(storage.clone()).await;

        assert_eq!(store.products(), default_catalog().as_slice());
        let saved: Option<Vec<Product>> = load_json(storage.as_ref(), PRODUCTS_KEY).await.unwrap();
        assert_eq!(saved.unwrap().len(), store.products().len());
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CatalogStore::load(storage.clone()).await;

        let added = store.add(cone()).await.unwrap();
        assert_eq!(added.id, 33);

        let reloaded = CatalogStore::load(storage).await;
        assert_eq!(reloaded.get(33).unwrap().name, "Casquinha");
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let mut store = CatalogStore::load(Arc::new(MemoryStorage::new())).await;

        let mut scoop = store.get(1).unwrap().clone();
        scoop.price = Money::from_cents(900);
        store.update(scoop).await.unwrap();
        assert_eq!(store.get(1).unwrap().price.cents(), 900);

        store.remove(1).await.unwrap();
        assert!(matches!(store.get(1), Err(CoreError::ProductNotFound(1))));
        assert!(store.remove(1).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let mut store = CatalogStore::load(Arc::new(MemoryStorage::new())).await;
        let mut dup = cone();
        dup.id = 1;
        assert!(store.add(dup).await.is_err());
        assert_eq!(store.products().len(), default_catalog().len());
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let mut store = CatalogStore::load(Arc::new(MemoryStorage::new())).await;
        store.remove(1).await.unwrap();
        store.add(cone()).await.unwrap();

        store.reset().await;
        assert_eq!(store.products(), default_catalog().as_slice());
    }

    #[tokio::test]
    async fn test_search() {
        let store = CatalogStore::load(Arc::new(MemoryStorage::new())).await;
        assert_eq!(store.search("").len(), store.products().len());
        assert_eq!(store.search("NUTELLA").len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = CatalogStore::load(storage.clone()).await;
        assert!(store.last_error().is_none());

        storage.fail_writes(true);
        let added = store.add(cone()).await.unwrap();
        assert!(store.get(added.id).is_ok());
        assert!(store.last_error().unwrap().contains("disk full"));

        storage.fail_writes(false);
        store.remove(added.id).await.unwrap();
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(PRODUCTS_KEY, "{not json").await.unwrap();

        let store = CatalogStore::load(storage).await;
        assert!(store.products().is_empty());
        assert!(store.last_error().is_some());
    }
}
