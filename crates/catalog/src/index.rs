//! The in-memory catalog and its loaders.
//!
//! A `Catalog` holds the normalized product list in API order plus lookup
//! tables for categories and seasons. It is built once per page load and
//! then only read; the filter pipeline borrows its product slice.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Normalized catalog data
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    product_index: HashMap<ProductId, usize>,
    categories: HashMap<CategoryId, Category>,
    seasons: HashMap<SeasonId, Season>,
}

/// On-disk bundle layout: `{"products": [...], "categories": [...], "seasons": [...]}`
#[derive(Deserialize)]
struct Bundle {
    #[serde(default)]
    products: Option<serde_json::Value>,
    #[serde(default)]
    categories: Option<serde_json::Value>,
    #[serde(default)]
    seasons: Option<serde_json::Value>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-normalized parts.
    ///
    /// If two products share an id, lookups by id resolve to the first one;
    /// both stay in the product list.
    pub fn from_parts(
        products: Vec<Product>,
        categories: Vec<Category>,
        seasons: Vec<Season>,
    ) -> Self {
        let mut product_index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            product_index.entry(product.id).or_insert(pos);
        }
        Self {
            products,
            product_index,
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            seasons: seasons.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// Build a catalog from raw JSON arrays as returned by the API.
    pub fn from_raw(
        products: Vec<serde_json::Value>,
        categories: Vec<serde_json::Value>,
        seasons: Vec<serde_json::Value>,
    ) -> Self {
        Self::from_parts(
            parser::normalize_products(products),
            parser::normalize_categories(categories),
            parser::normalize_seasons(seasons),
        )
    }

    /// Parse a catalog document.
    ///
    /// The document is either a bare array of products or a bundle object
    /// with `products`, `categories` and `seasons` arrays (all optional).
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CatalogError::ParseError {
                origin: "catalog".to_string(),
                reason: e.to_string(),
            })?;

        if value.is_array() {
            let products = parser::expect_array(value, "products")?;
            return Ok(Self::from_raw(products, Vec::new(), Vec::new()));
        }

        let bundle: Bundle =
            serde_json::from_value(value).map_err(|e| CatalogError::ParseError {
                origin: "catalog".to_string(),
                reason: e.to_string(),
            })?;
        let section = |value: Option<serde_json::Value>, what: &str| match value {
            Some(v) => parser::expect_array(v, what),
            None => Ok(Vec::new()),
        };
        Ok(Self::from_raw(
            section(bundle.products, "products")?,
            section(bundle.categories, "categories")?,
            section(bundle.seasons, "seasons")?,
        ))
    }

    /// Load a catalog document from disk (see [`Catalog::from_json`]).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        let catalog = Self::from_json(&text)?;
        let (products, categories, seasons) = catalog.counts();
        info!(
            "Loaded catalog from {}: {} products, {} categories, {} seasons",
            path.display(),
            products,
            categories,
            seasons
        );
        Ok(catalog)
    }

    /// All products in API order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.product_index.get(&id).map(|&pos| &self.products[pos])
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn get_season(&self, id: SeasonId) -> Option<&Season> {
        self.seasons.get(&id)
    }

    /// Categories sorted by id
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.values().collect();
        categories.sort_by_key(|c| c.id);
        categories
    }

    /// Seasons sorted by id
    pub fn seasons(&self) -> Vec<&Season> {
        let mut seasons: Vec<&Season> = self.seasons.values().collect();
        seasons.sort_by_key(|s| s.id);
        seasons
    }

    /// (products, categories, seasons)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.products.len(),
            self.categories.len(),
            self.seasons.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array_document() {
        let catalog = Catalog::from_json(r#"[{"id": 1, "price": 5}, {"id": "2"}]"#).unwrap();
        assert_eq!(catalog.counts(), (2, 0, 0));
        assert!(catalog.get_product(ProductId::new(2)).is_some());
    }

    #[test]
    fn test_bundle_document() {
        let catalog = Catalog::from_json(
            r#"{
                "products": [{"id": 1, "category": 4}],
                "categories": [{"id": 4, "name": "Shoes"}, {"name": "no id"}],
                "seasons": [{"id": "1", "name": "Summer"}]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.counts(), (1, 1, 1));
        assert_eq!(catalog.get_category(CategoryId::new(4)).unwrap().name, "Shoes");
        assert_eq!(catalog.get_season(SeasonId::new(1)).unwrap().name, "Summer");
    }

    #[test]
    fn test_bundle_section_must_be_array() {
        let err = Catalog::from_json(r#"{"products": {"id": 1}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::NotAnArray { .. }));
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let catalog = Catalog::from_parts(
            vec![Product::new(1, "first"), Product::new(1, "second")],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(catalog.products().len(), 2);
        assert_eq!(catalog.get_product(ProductId::new(1)).unwrap().name, "first");
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load_from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }
}
