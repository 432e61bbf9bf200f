// core/src/cart.rs

//! The process-wide cart store.
//!
//! One `CartStore` is created at application start and cloned into every
//! view that needs it; all mutation goes through its methods. Items are
//! keyed by id (one entry per distinct id, quantity accumulates on repeat
//! add) and kept in insertion order.

use crate::shared::Shared;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One line in the cart. `price` is in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: String,
  pub name: String,
  pub price: u32,
  pub image: String,
  pub quantity: u32,
}

impl CartItem {
  /// Price x quantity, saturating: an absurd quantity must not panic the
  /// process, it just pins the line at `u32::MAX`.
  pub fn line_total(&self) -> u32 {
    self.price.saturating_mul(self.quantity)
  }
}

/// Clonable handle to the shared cart. Cheap to clone; all clones observe
/// the same underlying collection.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
  items: Shared<Vec<CartItem>>,
}

impl CartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an item. If an entry with the same id already exists its quantity
  /// is incremented by the incoming quantity; otherwise the item is
  /// appended. An incoming quantity of 0 is clamped to 1 so the
  /// `quantity >= 1` invariant holds at the store boundary.
  pub fn add_item(&self, item: CartItem) {
    let mut item = item;
    if item.quantity == 0 {
      item.quantity = 1;
    }
    let mut guard = self.items.write();
    if let Some(existing) = guard.iter_mut().find(|i| i.id == item.id) {
      existing.quantity += item.quantity;
      debug!(id = %existing.id, quantity = existing.quantity, "cart quantity accumulated");
    } else {
      debug!(id = %item.id, quantity = item.quantity, "cart item added");
      guard.push(item);
    }
  }

  /// Removes the line with the given id, if present.
  pub fn remove_item(&self, id: &str) {
    self.items.write().retain(|i| i.id != id);
  }

  /// Sets the quantity of an existing line. A quantity of 0 removes the
  /// line; an unknown id is a no-op.
  pub fn set_quantity(&self, id: &str, quantity: u32) {
    let mut guard = self.items.write();
    if quantity == 0 {
      guard.retain(|i| i.id != id);
      return;
    }
    if let Some(existing) = guard.iter_mut().find(|i| i.id == id) {
      existing.quantity = quantity;
    }
  }

  /// Empties the cart. Called by the checkout session immediately after a
  /// successful order creation.
  pub fn clear(&self) {
    self.items.write().clear();
  }

  /// Snapshot of the lines in insertion order.
  pub fn items(&self) -> Vec<CartItem> {
    self.items.read().clone()
  }

  /// Sum of price x quantity over all lines, saturating at `u32::MAX`.
  pub fn total_price(&self) -> u32 {
    self
      .items
      .read()
      .iter()
      .map(CartItem::line_total)
      .fold(0, u32::saturating_add)
  }

  pub fn len(&self) -> usize {
    self.items.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.read().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(id: &str, price: u32, quantity: u32) -> CartItem {
    CartItem {
      id: id.to_string(),
      name: format!("Product {id}"),
      price,
      image: format!("https://cdn.example.com/{id}.jpg"),
      quantity,
    }
  }

  #[test]
  fn repeated_add_accumulates_quantity_per_id() {
    let cart = CartStore::new();
    cart.add_item(item("sku-1", 1000, 1));
    cart.add_item(item("sku-2", 2500, 2));
    cart.add_item(item("sku-1", 1000, 3));

    let items = cart.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "sku-1");
    assert_eq!(items[0].quantity, 4);
    assert_eq!(items[1].id, "sku-2");
    assert_eq!(cart.total_price(), 4 * 1000 + 2 * 2500);
  }

  #[test]
  fn zero_quantity_add_is_clamped_to_one() {
    let cart = CartStore::new();
    cart.add_item(item("sku-1", 500, 0));
    assert_eq!(cart.items()[0].quantity, 1);
  }

  #[test]
  fn set_quantity_zero_removes_the_line() {
    let cart = CartStore::new();
    cart.add_item(item("sku-1", 500, 2));
    cart.set_quantity("sku-1", 0);
    assert!(cart.is_empty());
  }

  #[test]
  fn extreme_quantities_saturate_instead_of_overflowing() {
    let cart = CartStore::new();
    cart.add_item(item("sku-1", u32::MAX / 2, 1));
    cart.set_quantity("sku-1", u32::MAX);
    assert_eq!(cart.total_price(), u32::MAX);

    cart.add_item(item("sku-2", u32::MAX, 3));
    assert_eq!(cart.total_price(), u32::MAX);
  }

  #[test]
  fn clones_observe_the_same_cart() {
    let cart = CartStore::new();
    let view = cart.clone();
    cart.add_item(item("sku-9", 700, 1));
    assert_eq!(view.total_price(), 700);
    view.clear();
    assert!(cart.is_empty());
  }
}
