//! Persisted cart format.
//!
//! The cart is stored under one key as JSON:
//!
//! ```json
//! {"version": 1, "lines": [{"itemId": "p1", "name": "Shirt", "unitPrice": "29.99", "quantity": 2}]}
//! ```
//!
//! A bare array of lines (the unversioned layout) is still read. Decoding is
//! forgiving per line: a line that does not parse, has quantity 0 or an empty
//! id is dropped, and duplicate ids are merged, so whatever is loaded upholds
//! the one-line-per-item invariant.

use crate::error::SnapshotError;
use crate::line::{CartLine, unit_price_in_range};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u64,
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            lines,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decode a stored snapshot.
    ///
    /// # Errors
    /// The text is not JSON, the top level holds no list of lines, or the
    /// version is not one this build understands.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SnapshotError::Malformed(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => {
                let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
                if version != SNAPSHOT_VERSION {
                    return Err(SnapshotError::UnsupportedVersion(version));
                }
                match map.remove("lines") {
                    Some(Value::Array(items)) => items,
                    Some(other) => return Err(SnapshotError::NotAList(kind(&other))),
                    None => return Err(SnapshotError::NotAList("missing lines")),
                }
            }
            other => return Err(SnapshotError::NotAList(kind(&other))),
        };

        Ok(Self::new(sanitize(items)))
    }
}

fn sanitize(items: Vec<Value>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let line: CartLine = match serde_json::from_value(item) {
            Ok(line) => line,
            Err(e) => {
                warn!("Dropping stored cart line {}: {}", idx, e);
                continue;
            }
        };
        if line.item_id.is_empty() || line.quantity == 0 {
            warn!("Dropping stored cart line {}: empty id or zero quantity", idx);
            continue;
        }
        if !unit_price_in_range(line.unit_price) {
            warn!("Dropping stored cart line {}: price out of range", idx);
            continue;
        }
        match lines.iter_mut().find(|l| l.item_id == line.item_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Decimal;

    fn line(id: &str, quantity: u32) -> CartLine {
        CartLine {
            item_id: id.to_string(),
            name: format!("Item {id}"),
            unit_price: Decimal::new(1050, 2),
            quantity,
            image_url: Some(format!("/img/{id}.png")),
        }
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let snapshot = CartSnapshot::new(vec![line("b", 2), line("a", 1), line("c", 5)]);
        let decoded = CartSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_reads_legacy_bare_array() {
        let decoded = CartSnapshot::from_json(
            r#"[{"itemId": "p1", "name": "Shirt", "unitPrice": "29.99", "quantity": 2}]"#,
        )
        .unwrap();
        assert_eq!(decoded.lines.len(), 1);
        assert_eq!(decoded.lines[0].quantity, 2);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = CartSnapshot::from_json(r#"{"version": 7, "lines": []}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_rejects_non_list() {
        assert!(matches!(
            CartSnapshot::from_json(r#""cart""#).unwrap_err(),
            SnapshotError::NotAList("string")
        ));
        assert!(matches!(
            CartSnapshot::from_json(r#"{"version": 1, "lines": {}}"#).unwrap_err(),
            SnapshotError::NotAList("object")
        ));
        assert!(matches!(
            CartSnapshot::from_json("{not json").unwrap_err(),
            SnapshotError::Malformed(_)
        ));
    }

    #[test]
    fn test_sanitizes_lines() {
        let decoded = CartSnapshot::from_json(
            r#"{"version": 1, "lines": [
                {"itemId": "a", "name": "A", "unitPrice": "1.00", "quantity": 1},
                {"itemId": "", "name": "blank", "unitPrice": "1.00", "quantity": 1},
                {"itemId": "z", "name": "Z", "unitPrice": "1.00", "quantity": 0},
                {"itemId": "n", "name": "N", "unitPrice": "NaN", "quantity": 1},
                "junk",
                {"itemId": "a", "name": "A again", "unitPrice": "9.00", "quantity": 2}
            ]}"#,
        )
        .unwrap();

        assert_eq!(decoded.lines.len(), 1);
        assert_eq!(decoded.lines[0].item_id, "a");
        assert_eq!(decoded.lines[0].name, "A");
        assert_eq!(decoded.lines[0].quantity, 3);
    }
}
