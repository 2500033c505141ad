//! Normalization of raw API records into canonical catalog types.
//!
//! This is the single place where duck-typed input is coerced:
//! - prices: JSON numbers or numeric strings → `Decimal`
//! - ids: numbers or numeric strings → `i64`
//! - categories: bare id or embedded object → `CategoryId`
//! - colors: the `color` spec's comma-joined value → lower-cased tokens
//!
//! Coercion never panics. A field that cannot be coerced becomes `None`, and
//! only a missing product id rejects a record outright.

use crate::error::{CatalogError, Result};
use crate::types::*;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use std::str::FromStr;
use tracing::{debug, warn};

/// Name of the spec that carries color values, compared case-insensitively.
pub const COLOR_SPEC_NAME: &str = "color";

/// Parse a price from text using standard numeric parsing.
///
/// Accepts plain decimals (`"29.99"`, `"-3"`, `" 10 "`) and scientific
/// notation (`"1e3"`). Everything else, including `"NaN"`, `"inf"` and the
/// empty string, yields `None`.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Coerce a raw scalar into a price.
pub fn price_from_scalar(raw: &RawScalar) -> Option<Decimal> {
    match raw {
        RawScalar::Number(n) => parse_price(&n.to_string()),
        RawScalar::Text(s) => parse_price(s),
    }
}

/// Coerce a raw scalar into an integer id.
///
/// `1`, `"1"`, `" 1 "` and `1.0` all map to `1`. Fractional or non-numeric
/// values yield `None`.
pub fn id_from_scalar(raw: &RawScalar) -> Option<i64> {
    match raw {
        RawScalar::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        RawScalar::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                let d = Decimal::from_str(s).ok()?;
                if d.fract().is_zero() {
                    i64::try_from(d).ok()
                } else {
                    None
                }
            })
        }
    }
}

/// Resolve a category reference to its id.
pub fn category_from_ref(raw: &RawCategoryRef) -> Option<CategoryId> {
    let id = match raw {
        RawCategoryRef::Id(id) => id,
        RawCategoryRef::Embedded { id, .. } => id,
    };
    id_from_scalar(id).map(CategoryId::new)
}

/// Split a comma-joined color value into trimmed, lower-cased tokens.
pub fn split_colors(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
}

/// Collect color tokens from every spec named `color`.
pub fn colors_from_specs(specs: &[RawSpec]) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();
    for spec in specs {
        let is_color = spec
            .spec_name()
            .is_some_and(|name| name.trim().eq_ignore_ascii_case(COLOR_SPEC_NAME));
        if !is_color {
            continue;
        }
        if let Some(value) = &spec.value {
            for token in split_colors(value) {
                if !colors.contains(&token) {
                    colors.push(token);
                }
            }
        }
    }
    colors
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalize one raw product.
///
/// # Errors
/// `MissingField` if the record has no usable id.
pub fn normalize_product(raw: RawProduct) -> Result<Product> {
    let id = raw
        .id
        .as_ref()
        .and_then(id_from_scalar)
        .ok_or_else(|| CatalogError::MissingField {
            entity: "product".to_string(),
            field: "id".to_string(),
        })?;

    Ok(Product {
        id: ProductId::new(id),
        name: raw.display_name().unwrap_or_default().to_string(),
        price: raw.price.as_ref().and_then(price_from_scalar),
        category: raw.category_ref().and_then(category_from_ref),
        colors: raw
            .specs
            .as_deref()
            .map(colors_from_specs)
            .unwrap_or_default(),
        created_at: raw.created_at_text().and_then(parse_timestamp),
        season: raw
            .season_ref()
            .and_then(id_from_scalar)
            .map(SeasonId::new),
    })
}

/// Normalize a JSON value that should hold one product.
pub fn normalize_product_value(value: serde_json::Value) -> Result<Product> {
    if !value.is_object() {
        return Err(CatalogError::InvalidValue {
            field: "product".to_string(),
            value: json_kind(&value).to_string(),
        });
    }
    let raw: RawProduct =
        serde_json::from_value(value).map_err(|e| CatalogError::InvalidValue {
            field: "product".to_string(),
            value: e.to_string(),
        })?;
    normalize_product(raw)
}

/// Normalize a list of product values, dropping records that cannot be
/// normalized. Output order follows input order.
pub fn normalize_products(values: Vec<serde_json::Value>) -> Vec<Product> {
    let total = values.len();
    let products: Vec<Product> = values
        .into_par_iter()
        .enumerate()
        .filter_map(|(idx, value)| match normalize_product_value(value) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!("Dropping product record {}: {}", idx, e);
                None
            }
        })
        .collect();
    debug!("Normalized {} of {} product records", products.len(), total);
    products
}

/// Normalize category or season records into `(id, name)` pairs.
fn normalize_named(values: Vec<serde_json::Value>, entity: &str) -> Vec<(i64, String)> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            let raw: RawNamed = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Dropping {} record {}: {}", entity, idx, e);
                    return None;
                }
            };
            match raw.id.as_ref().and_then(id_from_scalar) {
                Some(id) => Some((id, raw.name.or(raw.title).unwrap_or_default())),
                None => {
                    warn!("Dropping {} record {}: missing id", entity, idx);
                    None
                }
            }
        })
        .collect()
}

pub fn normalize_categories(values: Vec<serde_json::Value>) -> Vec<Category> {
    normalize_named(values, "category")
        .into_iter()
        .map(|(id, name)| Category {
            id: CategoryId::new(id),
            name,
        })
        .collect()
}

pub fn normalize_seasons(values: Vec<serde_json::Value>) -> Vec<Season> {
    normalize_named(values, "season")
        .into_iter()
        .map(|(id, name)| Season {
            id: SeasonId::new(id),
            name,
        })
        .collect()
}

/// Parse a JSON document whose top level must be an array.
///
/// # Arguments
/// * `text` - The JSON document
/// * `what` - What the array holds, for error messages ("products")
pub fn parse_json_array(text: &str, what: &str) -> Result<Vec<serde_json::Value>> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CatalogError::ParseError {
            origin: what.to_string(),
            reason: e.to_string(),
        })?;
    expect_array(value, what)
}

/// Unwrap a JSON array, or report what was found instead.
pub fn expect_array(value: serde_json::Value, what: &str) -> Result<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(items) => Ok(items),
        other => Err(CatalogError::NotAnArray {
            what: what.to_string(),
            found: json_kind(&other).to_string(),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Format an amount for display, rounded to cents.
///
/// Rounding happens here and nowhere else, so stored amounts never accumulate
/// rounding error.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
