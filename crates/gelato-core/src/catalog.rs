//! # Catalog Helpers
//!
//! Search, lookup and the built-in default catalog. The mutable catalog
//! itself lives in `gelato-store`.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{OptionLimits, Product, ProductKind};
use crate::validation::{validate_category, validate_price, validate_product_name};

/// Case-insensitive substring search over name and category.
///
/// An empty (or whitespace-only) query returns every product, in catalog
/// order.
///
/// ```rust
/// use gelato_core::catalog::{default_catalog, search_products};
///
/// let catalog = default_catalog();
/// assert_eq!(search_products(&catalog, "").len(), catalog.len());
/// assert!(search_products(&catalog, "AÇAÍ").iter().all(|p| p.category == "Açaí" || p.name.contains("Açaí")));
/// ```
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn find_product(products: &[Product], id: u32) -> CoreResult<&Product> {
    products
        .iter()
        .find(|p| p.id == id)
        .ok_or(CoreError::ProductNotFound(id))
}

/// Next free id: one past the highest in use.
pub fn next_product_id(products: &[Product]) -> u32 {
    products.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(&product.category);
        }
    }
    seen
}

pub fn products_by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| p.category == category).collect()
}

/// Checks a product before it enters the catalog.
///
/// `existing` is the current catalog; an id already present is rejected
/// unless it belongs to the product being replaced (`replacing`).
pub fn validate_product(product: &Product, existing: &[Product], replacing: Option<u32>) -> CoreResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price(product.price)?;

    let clash = existing
        .iter()
        .any(|p| p.id == product.id && Some(p.id) != replacing);
    if clash {
        return Err(ValidationError::Duplicate {
            field: "product id".to_string(),
            value: product.id.to_string(),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Default Catalog
// =============================================================================

/// The catalog a fresh install starts with.
pub fn default_catalog() -> Vec<Product> {
    let brl = Money::from_major_minor;
    let cup = |fruits, creams, toppings| ProductKind::Selectable {
        limits: OptionLimits::new(fruits, creams, toppings),
    };

    vec![
        // Sorvetes
        Product::new(1, "Sorvete 1 bola", brl(8, 0), "Sorvetes", ProductKind::Unit),
        Product::new(2, "Sorvete 2 bolas", brl(14, 0), "Sorvetes", ProductKind::Unit),
        Product::new(3, "Sorvete 3 bolas", brl(19, 0), "Sorvetes", ProductKind::Unit),
        Product::new(4, "Sorvete self-service (kg)", brl(59, 90), "Sorvetes", ProductKind::Weight),
        Product::new(5, "Picolé de fruta", brl(6, 0), "Picolés", ProductKind::Unit),
        Product::new(6, "Picolé cremoso", brl(8, 50), "Picolés", ProductKind::Unit),
        // Açaí
        Product::new(10, "Açaí 300ml", brl(16, 0), "Açaí", cup(1, 1, 2)),
        Product::new(11, "Açaí 500ml", brl(22, 0), "Açaí", cup(2, 1, 3)),
        Product::new(12, "Açaí 700ml", brl(28, 0), "Açaí", cup(3, 2, 4)),
        Product::new(13, "Açaí self-service (kg)", brl(54, 90), "Açaí", ProductKind::Weight),
        // Adicionais
        Product::new(20, "Calda de chocolate", brl(3, 0), "Adicionais", ProductKind::Addon),
        Product::new(21, "Leite condensado", brl(3, 0), "Adicionais", ProductKind::Addon),
        Product::new(22, "Nutella", brl(6, 0), "Adicionais", ProductKind::Addon),
        Product::new(23, "Casquinha extra", brl(2, 0), "Adicionais", ProductKind::Addon),
        // Bebidas
        Product::new(30, "Milkshake 400ml", brl(18, 0), "Bebidas", ProductKind::Unit),
        Product::new(31, "Água mineral", brl(4, 0), "Bebidas", ProductKind::Unit),
        Product::new(32, "Refrigerante lata", brl(6, 0), "Bebidas", ProductKind::Unit),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = default_catalog();

        let hits = search_products(&catalog, "SORVETE");
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|p| p.name.to_lowercase().contains("sorvete")));

        let hits = search_products(&catalog, "bebidas");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_empty_query_matches_all() {
        let catalog = default_catalog();
        assert_eq!(search_products(&catalog, "").len(), catalog.len());
        assert_eq!(search_products(&catalog, "   ").len(), catalog.len());
    }

    #[test]
    fn test_search_no_match() {
        let catalog = default_catalog();
        assert!(search_products(&catalog, "pizza").is_empty());
    }

    #[test]
    fn test_default_catalog_ids_are_unique() {
        let catalog = default_catalog();
        let mut ids: Vec<u32> = catalog.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_next_product_id() {
        assert_eq!(next_product_id(&[]), 1);
        assert_eq!(next_product_id(&default_catalog()), 33);
    }

    #[test]
    fn test_find_product() {
        let catalog = default_catalog();
        assert_eq!(find_product(&catalog, 11).unwrap().name, "Açaí 500ml");
        assert!(matches!(find_product(&catalog, 999), Err(CoreError::ProductNotFound(999))));
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let catalog = default_catalog();
        assert_eq!(
            categories(&catalog),
            vec!["Sorvetes", "Picolés", "Açaí", "Adicionais", "Bebidas"]
        );
        assert_eq!(products_by_category(&catalog, "Adicionais").len(), 4);
    }

    #[test]
    fn test_validate_product_rejects_duplicate_id() {
        let catalog = default_catalog();
        let dup = Product::new(1, "Outro", Money::from_cents(100), "Sorvetes", ProductKind::Unit);
        assert!(validate_product(&dup, &catalog, None).is_err());
        assert!(validate_product(&dup, &catalog, Some(1)).is_ok());

        let nameless = Product::new(99, " ", Money::from_cents(100), "Sorvetes", ProductKind::Unit);
        assert!(validate_product(&nameless, &catalog, None).is_err());
    }
}
