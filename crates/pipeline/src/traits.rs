//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! independently testable stages to be applied to a product list.

use crate::state::FilterState;
use anyhow::Result;
use catalog::Product;

/// Core trait for one pipeline stage.
///
/// All stages must implement this trait to be used in the FilterPipeline.
///
/// ## Contract
/// - A stage reads only the part of `FilterState` it owns; a neutral value
///   for that part returns the input untouched
/// - A stage never fails on bad product data: records missing the field it
///   needs are excluded
/// - Stages take ownership of the Vec and return a new one, so the caller's
///   base list is never mutated
pub trait Filter: Send + Sync {
    /// Returns the name of this stage (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this stage to a set of products.
    ///
    /// # Arguments
    /// * `products` - Output of the previous stage (takes ownership)
    /// * `state` - The shopper's current filter and sort selection
    fn apply(&self, products: Vec<Product>, state: &FilterState) -> Result<Vec<Product>>;
}
