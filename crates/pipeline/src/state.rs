//! Filter and sort selection.
//!
//! `FilterState` is the strongly typed form of what the shopper picked in the
//! listing UI. Loose inputs (query-string tokens, text boxes) are converted
//! here, once, so stages compare canonical values only.

use catalog::{CategoryId, Decimal, parse_price};
use std::fmt;

/// Sort criterion for the last pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep the order produced by the previous stages
    #[default]
    Unsorted,
    PriceAsc,
    PriceDesc,
    /// Most recently created first; undated products last
    Newest,
    /// Case-insensitive by name
    NameAsc,
}

impl SortOrder {
    /// Map a UI token to a sort order.
    ///
    /// Unknown or empty tokens mean "no sort" rather than an error.
    pub fn from_token(token: &str) -> Self {
        let normalized = token.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "price_asc" | "price_low_high" | "price" => Self::PriceAsc,
            "price_desc" | "price_high_low" => Self::PriceDesc,
            "newest" | "latest" | "created_desc" => Self::Newest,
            "name_asc" | "name" | "alpha" => Self::NameAsc,
            _ => Self::Unsorted,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Newest => "newest",
            Self::NameAsc => "name_asc",
        }
    }
}

impl From<&str> for SortOrder {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsorted => f.write_str("unsorted"),
            other => f.write_str(other.as_token()),
        }
    }
}

/// Parse a price bound typed by the shopper.
///
/// Blank input means unbounded. Input that is not a number is also treated as
/// unbounded, the same as any other unknown filter token.
pub fn parse_bound(text: &str) -> Option<Decimal> {
    parse_price(text)
}

/// The complete filter and sort selection for one listing render.
///
/// `FilterState::default()` is neutral: every stage passes through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Selected categories; empty means all categories
    pub categories: Vec<CategoryId>,
    /// Single selected color; `None` or blank means any color
    pub color: Option<String>,
    /// Inclusive lower bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound
    pub max_price: Option<Decimal>,
    pub sort: SortOrder,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, ids: &[i64]) -> Self {
        self.categories = ids.iter().copied().map(CategoryId::new).collect();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set both bounds from raw text, `""` leaving a side open.
    pub fn with_price_range(mut self, min: &str, max: &str) -> Self {
        self.min_price = parse_bound(min);
        self.max_price = parse_bound(max);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// The selected color, trimmed and lower-cased, if one is active.
    pub fn active_color(&self) -> Option<String> {
        self.color
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
    }

    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// True when no stage would change its input.
    pub fn is_neutral(&self) -> bool {
        self.categories.is_empty()
            && self.active_color().is_none()
            && !self.has_price_bounds()
            && self.sort == SortOrder::Unsorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_tokens() {
        assert_eq!(SortOrder::from_token("price_asc"), SortOrder::PriceAsc);
        assert_eq!(SortOrder::from_token("Price-Desc"), SortOrder::PriceDesc);
        assert_eq!(SortOrder::from_token("newest"), SortOrder::Newest);
        assert_eq!(SortOrder::from_token("popularity"), SortOrder::Unsorted);
        assert_eq!(SortOrder::from_token(""), SortOrder::Unsorted);
    }

    #[test]
    fn test_price_range_from_text() {
        let state = FilterState::new().with_price_range("", "200");
        assert_eq!(state.min_price, None);
        assert_eq!(state.max_price, Some(Decimal::from(200)));

        let state = FilterState::new().with_price_range("cheap", " ");
        assert!(!state.has_price_bounds());
    }

    #[test]
    fn test_neutral_state() {
        assert!(FilterState::default().is_neutral());
        assert!(FilterState::new().with_color("  ").is_neutral());
        assert!(!FilterState::new().with_categories(&[1]).is_neutral());
        assert!(!FilterState::new().with_sort(SortOrder::PriceAsc).is_neutral());
    }
}
