//! Filter to keep products available in the selected color.
//!
//! Color tokens were split and lower-cased when the catalog was normalized,
//! so matching here is a plain token comparison.

use crate::state::FilterState;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Product;

/// Keeps products with at least one color token equal to the selected color.
pub struct ColorFilter;

impl Filter for ColorFilter {
    fn name(&self) -> &str {
        "ColorFilter"
    }

    fn apply(&self, products: Vec<Product>, state: &FilterState) -> Result<Vec<Product>> {
        let Some(color) = state.active_color() else {
            return Ok(products);
        };
        let filtered: Vec<Product> = products
            .into_iter()
            .filter(|product| product.colors.iter().any(|c| *c == color))
            .collect();
        Ok(filtered)
    }
}
