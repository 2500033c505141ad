//! Stage implementations for the product pipeline.
//!
//! This module contains all the concrete stages that can be composed
//! into a FilterPipeline.

pub mod category;
pub mod color;
pub mod price_range;
pub mod sort;

// Re-export for convenience
pub use category::CategoryFilter;
pub use color::ColorFilter;
pub use price_range::PriceRangeFilter;
pub use sort::SortStage;
