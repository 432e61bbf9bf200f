// tests/cart_tests.rs
mod common;

use common::*;
use std::collections::HashSet;
use zahiala::CartStore;

#[test]
fn any_add_sequence_keeps_ids_unique_and_total_consistent() {
  setup_tracing();
  let cart = CartStore::new();

  // An arbitrary interleaving of adds: repeats, new ids, repeats again.
  let sequence = [
    ("sku-a", 1200_u32, 1_u32),
    ("sku-b", 900, 2),
    ("sku-a", 1200, 1),
    ("sku-c", 15000, 1),
    ("sku-b", 900, 3),
    ("sku-a", 1200, 4),
  ];
  for (id, price, quantity) in sequence {
    cart.add_item(cart_item(id, price, quantity));
  }

  let items = cart.items();
  let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
  assert_eq!(ids.len(), items.len(), "no two entries may share an id");

  let expected_total: u32 = items.iter().map(|i| i.price * i.quantity).sum();
  assert_eq!(cart.total_price(), expected_total);
  assert_eq!(cart.total_price(), 6 * 1200 + 5 * 900 + 15000);

  // Insertion order is preserved: first appearance wins the slot.
  let order: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
  assert_eq!(order, vec!["sku-a", "sku-b", "sku-c"]);
}

#[test]
fn removal_and_quantity_edits_keep_the_total_in_step() {
  setup_tracing();
  let cart = CartStore::new();
  cart.add_item(cart_item("sku-a", 1000, 2));
  cart.add_item(cart_item("sku-b", 500, 1));

  cart.set_quantity("sku-a", 5);
  assert_eq!(cart.total_price(), 5 * 1000 + 500);

  cart.remove_item("sku-b");
  assert_eq!(cart.total_price(), 5000);

  cart.clear();
  assert_eq!(cart.total_price(), 0);
  assert!(cart.is_empty());
}
