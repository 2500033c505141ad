//! Cart persistence across store instances and backends.

use cart::{
    AddOutcome, CartConfig, CartSnapshot, CartStore, FileStore, KeyValueStore, MemoryStore,
    NewCartItem, DEFAULT_STORAGE_KEY,
};
use catalog::{Decimal, ProductId};
use std::sync::Arc;

#[test]
fn test_file_backed_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = FileStore::open(dir.path()).unwrap();
        let mut cart = CartStore::initialize(storage, CartConfig::default());
        let shirt = cart::variant_item_id(ProductId::new(1), Some("M"));
        cart.add_item(NewCartItem::new(shirt.clone(), "Shirt", "29.99").with_image("/shirt.png"));
        cart.add_item(NewCartItem::new(shirt, "Shirt", "29.99"));
        cart.add_item(NewCartItem::new("2", "Cap", 12));
    }

    let storage = FileStore::open(dir.path()).unwrap();
    let cart = CartStore::initialize(storage, CartConfig::default());

    let ids: Vec<&str> = cart.lines().iter().map(|l| l.item_id.as_str()).collect();
    assert_eq!(ids, vec!["1:M", "2"]);
    assert_eq!(cart.count(), 3);
    assert_eq!(cart.total(), Decimal::new(7198, 2));
    assert_eq!(cart.line("1:M").unwrap().image_url.as_deref(), Some("/shirt.png"));
}

#[test]
fn test_persisted_value_is_versioned_snapshot() {
    let storage = Arc::new(MemoryStore::new());
    let mut cart = CartStore::initialize(Arc::clone(&storage), CartConfig::default());
    cart.add_item(NewCartItem::new("p1", "Shirt", "29.99"));

    let stored = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["lines"][0]["itemId"], "p1");
    assert_eq!(value["lines"][0]["quantity"], 1);

    let snapshot = CartSnapshot::from_json(&stored).unwrap();
    assert_eq!(snapshot, cart.snapshot());
}

#[test]
fn test_two_tabs_last_writer_wins() {
    let storage = Arc::new(MemoryStore::new());
    let mut tab_a = CartStore::initialize(Arc::clone(&storage), CartConfig::default());
    let mut tab_b = CartStore::initialize(Arc::clone(&storage), CartConfig::default());

    assert_eq!(tab_a.add_item(NewCartItem::new("a", "A", "1")), AddOutcome::Added);
    assert_eq!(tab_b.add_item(NewCartItem::new("b", "B", "2")), AddOutcome::Added);

    // tab_b never saw tab_a's line, and its write replaced it
    let reloaded = CartStore::initialize(Arc::clone(&storage), CartConfig::default());
    let ids: Vec<&str> = reloaded.lines().iter().map(|l| l.item_id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);

    // in-memory state of each tab is unaffected
    assert!(tab_a.line("a").is_some());
}
