//! Final stage: reorder without filtering.

use crate::state::{FilterState, SortOrder};
use crate::traits::Filter;
use anyhow::Result;
use catalog::Product;
use std::cmp::Ordering;

/// Reorders products by `state.sort`.
///
/// Uses the stable `sort_by`, so products with equal keys keep the order
/// they had after the previous stages. Products missing the sort key go last
/// in every order.
pub struct SortStage;

/// Compare optional keys with `None` last, applying `cmp` to present keys.
fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Filter for SortStage {
    fn name(&self) -> &str {
        "SortStage"
    }

    fn apply(&self, mut products: Vec<Product>, state: &FilterState) -> Result<Vec<Product>> {
        match state.sort {
            SortOrder::Unsorted => {}
            SortOrder::PriceAsc => {
                products.sort_by(|a, b| missing_last(a.price, b.price, |x, y| x.cmp(&y)))
            }
            SortOrder::PriceDesc => {
                products.sort_by(|a, b| missing_last(a.price, b.price, |x, y| y.cmp(&x)))
            }
            SortOrder::Newest => products
                .sort_by(|a, b| missing_last(a.created_at, b.created_at, |x, y| y.cmp(&x))),
            SortOrder::NameAsc => {
                products.sort_by_cached_key(|p| p.name.to_lowercase());
            }
        }
        Ok(products)
    }
}
