//! The cart state manager.
//!
//! `CartStore` exclusively owns the shopper's lines. It is seeded once from
//! the key-value store by [`CartStore::initialize`] and mirrors its full line
//! list back after every mutation. The in-memory lines are authoritative for
//! the session: load and write failures are logged, never surfaced.

use crate::error::InvalidItem;
use crate::line::{CartLine, NewCartItem, unit_price_in_range};
use crate::snapshot::CartSnapshot;
use crate::storage::KeyValueStore;
use catalog::{Decimal, format_price, price_from_scalar};
use tracing::{debug, warn};

/// Default key the cart is stored under
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Cart store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Result of an add-to-cart event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1
    Added,
    /// An existing line's quantity went up by one
    Incremented { quantity: u32 },
    /// The item was invalid; the cart is unchanged
    Rejected(InvalidItem),
}

/// Result of a decrement event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    Decremented { quantity: u32 },
    /// Quantity reached zero and the line was deleted
    Removed,
    /// No line with that id
    Missing,
}

/// Shopping cart backed by a key-value store.
///
/// Several `CartStore`s may share one storage (for instance through
/// `Arc<MemoryStore>`). They do not see each other's changes after
/// initialization and the last one to write wins.
pub struct CartStore<S: KeyValueStore> {
    storage: S,
    key: String,
    lines: Vec<CartLine>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Read the persisted cart and build the store.
    ///
    /// An absent, malformed, non-list or unsupported-version value yields an
    /// empty cart. This never fails.
    pub fn initialize(storage: S, config: CartConfig) -> Self {
        let key = config.storage_key;
        let lines = match storage.get(&key) {
            Ok(Some(text)) => match CartSnapshot::from_json(&text) {
                Ok(snapshot) => {
                    debug!("Loaded cart '{}' with {} lines", key, snapshot.lines.len());
                    snapshot.lines
                }
                Err(e) => {
                    warn!("Ignoring stored cart '{}': {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read cart '{}', starting empty: {}", key, e);
                Vec::new()
            }
        };
        Self { storage, key, lines }
    }

    /// Add one unit of an item.
    ///
    /// An existing line with the same `item_id` is incremented; its captured
    /// name, price and image are kept. Otherwise a new line is appended.
    pub fn add_item(&mut self, item: NewCartItem) -> AddOutcome {
        if item.item_id.trim().is_empty() {
            warn!("Rejected cart item with empty id");
            return AddOutcome::Rejected(InvalidItem::EmptyItemId);
        }
        let Some(unit_price) = price_from_scalar(&item.price) else {
            let shown = match &item.price {
                catalog::RawScalar::Number(n) => n.to_string(),
                catalog::RawScalar::Text(s) => s.clone(),
            };
            warn!("Rejected cart item '{}': bad price {:?}", item.item_id, shown);
            return AddOutcome::Rejected(InvalidItem::InvalidPrice(shown));
        };
        if !unit_price_in_range(unit_price) {
            warn!("Rejected cart item '{}': price {} out of range", item.item_id, unit_price);
            return AddOutcome::Rejected(InvalidItem::PriceOutOfRange(unit_price.to_string()));
        }

        let outcome = match self.lines.iter_mut().find(|l| l.item_id == item.item_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                AddOutcome::Incremented {
                    quantity: line.quantity,
                }
            }
            None => {
                self.lines.push(CartLine {
                    item_id: item.item_id,
                    name: item.name,
                    unit_price,
                    quantity: 1,
                    image_url: item.image_url,
                });
                AddOutcome::Added
            }
        };
        self.persist();
        outcome
    }

    /// Delete the line for `item_id`. Returns whether a line was removed.
    ///
    /// Removing an absent id is a no-op and does not touch storage.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        let removed = self.lines.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Take one unit off a line, deleting it when the quantity reaches zero.
    pub fn decrement_item(&mut self, item_id: &str) -> DecrementOutcome {
        let Some(pos) = self.lines.iter().position(|l| l.item_id == item_id) else {
            return DecrementOutcome::Missing;
        };
        let outcome = if self.lines[pos].quantity <= 1 {
            self.lines.remove(pos);
            DecrementOutcome::Removed
        } else {
            self.lines[pos].quantity -= 1;
            DecrementOutcome::Decremented {
                quantity: self.lines[pos].quantity,
            }
        };
        self.persist();
        outcome
    }

    /// Remove every line and persist the empty cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Lines in the order they were first added
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Exact sum of line subtotals; round only for display
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// `total()` rounded to cents
    pub fn formatted_total(&self) -> String {
        format_price(self.total())
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::new(self.lines.clone())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        let text = match self.snapshot().to_json() {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to encode cart '{}': {}", self.key, e);
                return;
            }
        };
        match self.storage.set(&self.key, &text) {
            Ok(()) => debug!("Persisted cart '{}' ({} lines)", self.key, self.lines.len()),
            Err(e) => warn!("Failed to persist cart '{}': {}", self.key, e),
        }
    }
}
