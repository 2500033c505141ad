//! Filter to keep products in the selected categories.

use crate::state::FilterState;
use crate::traits::Filter;
use anyhow::Result;
use catalog::{CategoryId, Product};
use std::collections::HashSet;

/// Keeps products whose category is one of `state.categories`.
///
/// ## Algorithm
/// 1. Empty selection: return the input unchanged
/// 2. Otherwise build a HashSet of the selected ids for O(1) lookups
/// 3. Keep products with a category in the set; uncategorized products are dropped
pub struct CategoryFilter;

impl Filter for CategoryFilter {
    fn name(&self) -> &str {
        "CategoryFilter"
    }

    fn apply(&self, products: Vec<Product>, state: &FilterState) -> Result<Vec<Product>> {
        if state.categories.is_empty() {
            return Ok(products);
        }
        let selected: HashSet<CategoryId> = state.categories.iter().copied().collect();
        let filtered: Vec<Product> = products
            .into_iter()
            .filter(|product| product.category.is_some_and(|c| selected.contains(&c)))
            .collect();
        Ok(filtered)
    }
}
