//! Pipeline for filtering and sorting storefront product listings.
//!
//! This crate provides:
//! - Filter trait and the four listing stages
//! - FilterPipeline for composing stages
//! - FilterState, the typed filter and sort selection
//!
//! ## Architecture
//! The standard pipeline processes a product list in fixed stages:
//! 1. Category: keep products in the selected categories
//! 2. Color: keep products offered in the selected color
//! 3. Price range: keep products inside the inclusive bounds
//! 4. Sort: reorder (stable) by the selected criterion
//!
//! Each stage passes its input through untouched when its part of the
//! state is neutral, and the pipeline as a whole is a pure function of
//! (base list, state).
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, FilterState, SortOrder};
//!
//! let state = FilterState::new()
//!     .with_categories(&[1])
//!     .with_price_range("60", "200")
//!     .with_sort(SortOrder::PriceAsc);
//!
//! let visible = FilterPipeline::standard().run(catalog.products(), &state)?;
//! ```

pub mod traits;
pub mod state;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use state::{FilterState, SortOrder, parse_bound};
pub use filter_pipeline::FilterPipeline;
