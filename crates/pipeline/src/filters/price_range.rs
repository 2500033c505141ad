//! Filter to keep products inside an inclusive price range.

use crate::state::FilterState;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Product;

/// Keeps products priced within `[min_price, max_price]`.
///
/// ## Algorithm
/// 1. No bound set: return the input unchanged
/// 2. Otherwise keep products with a price satisfying every set bound
/// 3. Products without a valid price are dropped while any bound is active
///
/// A range with `min_price > max_price` matches nothing.
pub struct PriceRangeFilter;

impl Filter for PriceRangeFilter {
    fn name(&self) -> &str {
        "PriceRangeFilter"
    }

    fn apply(&self, products: Vec<Product>, state: &FilterState) -> Result<Vec<Product>> {
        if !state.has_price_bounds() {
            return Ok(products);
        }
        let filtered: Vec<Product> = products
            .into_iter()
            .filter(|product| match product.price {
                Some(price) => {
                    state.min_price.is_none_or(|min| price >= min)
                        && state.max_price.is_none_or(|max| price <= max)
                }
                None => false,
            })
            .collect();
        Ok(filtered)
    }
}
