//! # Cart Crate
//!
//! The shopper's cart: one line per purchasable identity, persisted to a
//! key-value store after every change and read back once at startup.
//!
//! ## Components
//!
//! - **store**: `CartStore`, the sole mutator of cart lines, and its derived totals
//! - **line**: `CartLine`, the add-to-cart event `NewCartItem`, variant ids
//! - **snapshot**: The versioned JSON format written to storage
//! - **storage**: The `KeyValueStore` port with memory and file adapters
//! - **error**: Rejection reasons and storage/snapshot errors
//!
//! ## Example Usage
//!
//! ```ignore
//! use cart::{CartConfig, CartStore, FileStore, NewCartItem};
//!
//! let storage = FileStore::open(".storefront")?;
//! let mut cart = CartStore::initialize(storage, CartConfig::default());
//!
//! cart.add_item(NewCartItem::new("p1", "Shirt", "29.99"));
//! cart.add_item(NewCartItem::new("p1", "Shirt", "29.99"));
//!
//! assert_eq!(cart.count(), 2);
//! println!("Total: ${}", cart.formatted_total());
//! ```
//!
//! ## Known limitation
//!
//! Two carts sharing one storage do not merge: each writes its full line
//! list and the last write wins.

pub mod error;
pub mod line;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use error::{InvalidItem, SnapshotError, StorageError};
pub use line::{CartLine, MAX_UNIT_PRICE, NewCartItem, unit_price_in_range, variant_item_id};
pub use snapshot::{CartSnapshot, SNAPSHOT_VERSION};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{AddOutcome, CartConfig, CartStore, DecrementOutcome, DEFAULT_STORAGE_KEY};
