//! # Catalog Crate
//!
//! Product, category and season records for the storefront, and the
//! normalization boundary that turns loosely typed API JSON into them.
//!
//! ## Main Components
//!
//! - **types**: Raw API shapes and the canonical `Product`, `Category`, `Season`
//! - **parser**: Coercion of prices, ids, categories and colors
//! - **index**: The in-memory `Catalog` and its loaders
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/catalog.json"))?;
//! for product in catalog.products() {
//!     println!("{} {:?}", product.name, product.price);
//! }
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{CatalogError, Result};
pub use index::Catalog;
pub use parser::{format_price, parse_price, price_from_scalar};
pub use types::{
    // Identifiers
    ProductId,
    CategoryId,
    SeasonId,
    // Raw shapes
    RawScalar,
    RawCategoryRef,
    RawProduct,
    RawSpec,
    // Canonical records
    Product,
    Category,
    Season,
};

/// Exact decimal type used for every amount in the workspace
pub use rust_decimal::Decimal;
