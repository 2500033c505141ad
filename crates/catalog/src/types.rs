//! Core domain types for the product catalog.
//!
//! Two layers live here:
//! - `Raw*` types mirror what the remote API sends. Prices may be numbers or
//!   strings, categories may be a bare id or an embedded object, and any field
//!   may be missing or malformed.
//! - `Product`, `Category` and `Season` are the canonical records produced
//!   once by [`crate::parser`]. Downstream code never re-coerces types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Defines an `i64` newtype id with `Display`, `From` conversions and a
/// transparent serde representation.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a product within one list
    ProductId
);
define_id!(
    /// Category identifier, numeric-normalized (`"1"` and `1` are the same id)
    CategoryId
);
define_id!(
    /// Season (collection drop) identifier
    SeasonId
);

// =============================================================================
// Raw API shapes
// =============================================================================

/// A JSON scalar that should be a number but may arrive as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawScalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for RawScalar {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for RawScalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for RawScalar {
    /// Non-finite values have no JSON representation and become an empty
    /// string, which never parses as a price.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map_or_else(|| Self::Text(String::new()), Self::Number)
    }
}

/// A category reference: either the id itself or an embedded category object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCategoryRef {
    Id(RawScalar),
    Embedded {
        id: RawScalar,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Name of a spec when it is nested one level down (`{"spec": {"name": ..}}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSpecName {
    pub name: String,
}

/// One entry of a product's `specs` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSpec {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub spec: Option<RawSpecName>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

impl RawSpec {
    /// The spec name, wherever the API put it.
    pub fn spec_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.spec.as_ref().map(|s| s.name.as_str()))
    }
}

/// A product record exactly as the API delivered it.
///
/// Every field is optional and deserialized leniently: a field with the wrong
/// JSON type reads as `None` instead of failing the whole record. Alternate
/// spellings of one field (`category`, `categoryId`, `category_id`) each get
/// their own slot, since a backend may send several at once; the accessors
/// pick one in order of precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<RawCategoryRef>,
    #[serde(default, rename = "categoryId", deserialize_with = "lenient")]
    pub category_id: Option<RawCategoryRef>,
    #[serde(default, rename = "category_id", deserialize_with = "lenient")]
    pub category_id_snake: Option<RawCategoryRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub specs: Option<Vec<RawSpec>>,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, rename = "created_at", deserialize_with = "lenient")]
    pub created_at_snake: Option<String>,
    #[serde(default, rename = "seasonId", deserialize_with = "lenient")]
    pub season_id: Option<RawScalar>,
    #[serde(default, rename = "season_id", deserialize_with = "lenient")]
    pub season_id_snake: Option<RawScalar>,
}

impl RawProduct {
    /// `name`, else `title`
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.title.as_deref())
    }

    /// `category`, else `categoryId`, else `category_id`
    pub fn category_ref(&self) -> Option<&RawCategoryRef> {
        self.category
            .as_ref()
            .or(self.category_id.as_ref())
            .or(self.category_id_snake.as_ref())
    }

    pub fn created_at_text(&self) -> Option<&str> {
        self.created_at
            .as_deref()
            .or(self.created_at_snake.as_deref())
    }

    pub fn season_ref(&self) -> Option<&RawScalar> {
        self.season_id.as_ref().or(self.season_id_snake.as_ref())
    }
}

/// A category or season record as the API delivered it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNamed {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
}

/// Deserialize into `T`, reading any type mismatch as `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// =============================================================================
// Canonical records
// =============================================================================

/// A product after normalization.
///
/// `price` and `category` stay optional: a record missing them is still part
/// of the catalog, it is only excluded by the stage that needs the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Option<Decimal>,
    pub category: Option<CategoryId>,
    /// Lower-cased, trimmed color tokens
    pub colors: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub season: Option<SeasonId>,
}

impl Product {
    /// A product with nothing but an id and a name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price: None,
            category: None,
            colors: Vec::new(),
            created_at: None,
            season: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.category = Some(CategoryId::new(category));
        self
    }

    /// Set colors from raw spec values; each value may be comma-joined.
    pub fn with_colors(mut self, values: &[&str]) -> Self {
        self.colors = values
            .iter()
            .flat_map(|value| crate::parser::split_colors(value))
            .collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Case-insensitive check against the product's color tokens.
    pub fn has_color(&self, color: &str) -> bool {
        let wanted = color.trim().to_lowercase();
        self.colors.iter().any(|c| *c == wanted)
    }
}

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A season (a named collection of products)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
}
