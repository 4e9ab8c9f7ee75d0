//! # Catalog Commands
//!
//! Product search for the sale screen and catalog maintenance for the
//! manager screen.

use gelato_core::catalog::{categories, products_by_category};
use gelato_core::validation::validate_search_query;
use gelato_core::{Money, Product, ProductKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub name: String,
    pub product_count: usize,
}

/// Payload for a new product. The id is assigned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub kind: ProductKind,
}

pub async fn list_products(state: &AppState) -> ApiResult<Vec<Product>> {
    state.session.require_auth()?;
    Ok(state.catalog.read().await.products().to_vec())
}

/// Case-insensitive substring search on name and category. An empty query
/// returns the whole catalog.
pub async fn search_products(state: &AppState, query: String) -> ApiResult<Vec<Product>> {
    debug!(query = %query, "search_products command");
    state.session.require_auth()?;

    let query = validate_search_query(&query)?;
    let catalog = state.catalog.read().await;
    Ok(catalog.search(&query).into_iter().cloned().collect())
}

pub async fn get_product(state: &AppState, id: u32) -> ApiResult<Product> {
    state.session.require_auth()?;
    Ok(state.catalog.read().await.get(id)?.clone())
}

/// Categories in catalog order with their product counts.
pub async fn list_categories(state: &AppState) -> ApiResult<Vec<CategoryDto>> {
    state.session.require_auth()?;

    let catalog = state.catalog.read().await;
    let products = catalog.products();
    Ok(categories(products)
        .into_iter()
        .map(|name| CategoryDto {
            name: name.to_string(),
            product_count: products_by_category(products, name).len(),
        })
        .collect())
}

pub async fn create_product(state: &AppState, product: NewProduct) -> ApiResult<Product> {
    debug!(name = %product.name, "create_product command");
    state.session.require_auth()?;

    let product = Product::new(
        0,
        product.name.trim(),
        Money::from_cents(product.price_cents),
        product.category.trim(),
        product.kind,
    );

    let mut catalog = state.catalog.write().await;
    let added = catalog.add(product).await?;
    log_store_error(catalog.last_error());
    Ok(added)
}

pub async fn update_product(state: &AppState, product: Product) -> ApiResult<Product> {
    debug!(product_id = product.id, "update_product command");
    state.session.require_auth()?;

    let mut catalog = state.catalog.write().await;
    catalog.update(product.clone()).await?;
    log_store_error(catalog.last_error());
    Ok(product)
}

/// Removes a product. Open comandas keep their own copy of it.
pub async fn delete_product(state: &AppState, id: u32) -> ApiResult<Product> {
    debug!(product_id = id, "delete_product command");
    state.session.require_auth()?;

    let mut catalog = state.catalog.write().await;
    let removed = catalog.remove(id).await?;
    log_store_error(catalog.last_error());
    Ok(removed)
}

pub async fn reset_catalog(state: &AppState) -> ApiResult<Vec<Product>> {
    state.session.require_auth()?;

    let mut catalog = state.catalog.write().await;
    catalog.reset().await;
    log_store_error(catalog.last_error());
    info!("Catalog reset by operator");
    Ok(catalog.products().to_vec())
}

fn log_store_error(error: Option<&str>) {
    if let Some(error) = error {
        warn!(error, "Catalog change kept in memory but not saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let state = logged_in_state(None).await;

        let results = search_products(&state, "AÇAÍ".into()).await.unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|p| p.name.to_lowercase().contains("açaí")
            || p.category.to_lowercase().contains("açaí")));

        let all = search_products(&state, "   ".into()).await.unwrap();
        assert_eq!(all.len(), list_products(&state).await.unwrap().len());
    }

    #[tokio::test]
    async fn test_requires_login() {
        let state = logged_in_state(None).await;
        state.session.logout().await;

        let err = list_products(&state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_product_maintenance() {
        let state = logged_in_state(None).await;

        let added = create_product(
            &state,
            NewProduct {
                name: " Milkshake ".into(),
                price_cents: 1500,
                category: "Bebidas".into(),
                kind: ProductKind::Unit,
            },
        )
        .await
        .unwrap();
        assert_eq!(added.id, 33);
        assert_eq!(added.name, "Milkshake");

        let mut changed = added.clone();
        changed.price = Money::from_cents(1600);
        update_product(&state, changed).await.unwrap();
        assert_eq!(get_product(&state, 33).await.unwrap().price.cents(), 1600);

        delete_product(&state, 33).await.unwrap();
        let err = get_product(&state, 33).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_product() {
        let state = logged_in_state(None).await;

        let err = create_product(
            &state,
            NewProduct {
                name: "".into(),
                price_cents: 100,
                category: "Bebidas".into(),
                kind: ProductKind::Unit,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_product(
            &state,
            NewProduct {
                name: "Brinde".into(),
                price_cents: -1,
                category: "Bebidas".into(),
                kind: ProductKind::Unit,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_product(
            &state,
            NewProduct {
                name: "Taça gigante".into(),
                price_cents: i64::MAX / 2 + 1,
                category: "Sorvetes".into(),
                kind: ProductKind::Unit,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list_products(&state).await.unwrap().iter().all(|p| p.name != "Taça gigante"));
    }

    #[tokio::test]
    async fn test_categories_and_reset() {
        let state = logged_in_state(None).await;
        delete_product(&state, 31).await.unwrap();

        let cats = list_categories(&state).await.unwrap();
        assert_eq!(cats[0].name, "Sorvetes");
        let drinks = cats.iter().find(|c| c.name == "Bebidas").unwrap();
        assert_eq!(drinks.product_count, 2);

        let restored = reset_catalog(&state).await.unwrap();
        assert!(restored.iter().any(|p| p.id == 31));
    }
}
