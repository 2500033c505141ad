//! Storefront crate: the catalog page behind the CLI.
//!
//! This crate ties the pieces together: it fetches the catalog from the
//! product API, holds it in memory, and derives the visible listing and the
//! facet summaries from it.

pub mod facets;
pub mod orchestrator;

pub use facets::{CategoryFacet, ColorFacet, Facets};
pub use orchestrator::Storefront;
