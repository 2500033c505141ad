//! Cart line types.

use catalog::{Decimal, ProductId, RawScalar, price_from_scalar};
use serde::{Deserialize, Deserializer, Serialize};

/// Largest unit price (in either sign) a cart line may carry.
///
/// Keeps `quantity × unit_price` and the cart total far from `Decimal`'s
/// limits for any `u32` quantity.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Whether `price` is an acceptable unit price.
pub fn unit_price_in_range(price: Decimal) -> bool {
    price.abs() <= MAX_UNIT_PRICE
}

/// Build the cart identity for a product, optionally narrowed by a variant.
///
/// `variant_item_id(ProductId::new(12), Some("M"))` is `"12:M"`; without a
/// (non-blank) variant the id is the product id alone.
pub fn variant_item_id(product: ProductId, variant: Option<&str>) -> String {
    match variant.map(str::trim).filter(|v| !v.is_empty()) {
        Some(variant) => format!("{product}:{variant}"),
        None => product.to_string(),
    }
}

/// One row of the cart.
///
/// `name`, `unit_price` and `image_url` are captured when the item is first
/// added and are not re-synced from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub unit_price: Decimal,
    /// Always >= 1 while the line exists
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// `quantity × unit_price`, unrounded
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Accept prices written as strings (current format) or bare numbers.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawScalar::deserialize(deserializer)?;
    price_from_scalar(&raw).ok_or_else(|| serde::de::Error::custom("price is not a finite number"))
}

/// An "add to cart" event as raised by any UI surface.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub item_id: String,
    pub name: String,
    /// Number or numeric string; validated by the store
    pub price: RawScalar,
    pub image_url: Option<String>,
}

impl NewCartItem {
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<RawScalar>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            price: price.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_item_id() {
        let id = ProductId::new(12);
        assert_eq!(variant_item_id(id, Some("M")), "12:M");
        assert_eq!(variant_item_id(id, Some("  ")), "12");
        assert_eq!(variant_item_id(id, None), "12");
    }

    #[test]
    fn test_line_accepts_numeric_price() {
        let line: CartLine = serde_json::from_str(
            r#"{"itemId": "p1", "name": "Shirt", "unitPrice": 29.99, "quantity": 1}"#,
        )
        .unwrap();
        assert_eq!(line.unit_price, Decimal::new(2999, 2));
        assert_eq!(line.image_url, None);
    }

    #[test]
    fn test_line_rejects_non_numeric_price() {
        let result: Result<CartLine, _> = serde_json::from_str(
            r#"{"itemId": "p1", "name": "Shirt", "unitPrice": "free", "quantity": 1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_subtotal() {
        let line = CartLine {
            item_id: "p1".to_string(),
            name: "Shirt".to_string(),
            unit_price: Decimal::new(2999, 2),
            quantity: 3,
            image_url: None,
        };
        assert_eq!(line.subtotal(), Decimal::new(8997, 2));
    }
}
