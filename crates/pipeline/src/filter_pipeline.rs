//! The FilterPipeline orchestrates the stages.
//!
//! This module provides the main FilterPipeline struct that chains
//! stages together using the builder pattern.

use crate::filters::{CategoryFilter, ColorFilter, PriceRangeFilter, SortStage};
use crate::state::FilterState;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Product;

/// Chains stages together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::standard();
/// let visible = pipeline.run(catalog.products(), &state)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The storefront listing pipeline: category, color, price, then sort.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(CategoryFilter)
            .add_filter(ColorFilter)
            .add_filter(PriceRangeFilter)
            .add_filter(SortStage)
    }

    /// Add a stage to the end of the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Stage names in application order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all stages in sequence, consuming the input list.
    ///
    /// # Returns
    /// * `Ok(Vec<Product>)` - The products after all stages
    /// * `Err` - If a custom stage fails; the standard stages never do
    pub fn apply(&self, products: Vec<Product>, state: &FilterState) -> Result<Vec<Product>> {
        let mut current = products;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, state)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }

    /// Derive the visible list from a borrowed base list.
    ///
    /// The base list is cloned, never mutated, so concurrent readers of the
    /// same catalog always see it whole.
    pub fn run(&self, base: &[Product], state: &FilterState) -> Result<Vec<Product>> {
        self.apply(base.to_vec(), state)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
