// core/src/catalog.rs

//! Read-only catalog shapes and the display rules derived from them:
//! discounted sale price, sold-out detection, gallery fallback, and the
//! "similar products" strip on a product page.

use crate::cart::CartItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog product as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  pub id: u64,
  pub name: String,
  /// List price in whole currency units, before any discount percent.
  pub price: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub old_price: Option<u32>,
  /// Discount percent (0-100). Absent or 0 means no discount.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discount: Option<u32>,
  #[serde(default)]
  pub description: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(default)]
  pub images: Vec<String>,
  pub sku: String,
  pub category: String,
  #[serde(default)]
  pub availability: String,
  #[serde(default)]
  pub supplier: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stock: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_sold_out: Option<bool>,
  /// Free-form detail rows (type, count, packaging, ...). Keys vary per
  /// category, so this stays a map rather than a struct.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub details: BTreeMap<String, String>,
}

impl Product {
  /// Effective unit price: a positive discount percent is applied to
  /// `price` and rounded to the nearest whole unit.
  pub fn sale_price(&self) -> u32 {
    match self.discount {
      Some(d) if d > 0 => {
        let reduced = f64::from(self.price) * f64::from(100 - d.min(100)) / 100.0;
        reduced.round() as u32
      }
      _ => self.price,
    }
  }

  /// The price to strike through next to a discounted sale price. When a
  /// discount percent is present the list price itself is the original;
  /// otherwise fall back to `old_price` if the backend supplied one.
  pub fn display_original_price(&self) -> Option<u32> {
    match self.discount {
      Some(d) if d > 0 => Some(self.price),
      _ => self.old_price,
    }
  }

  /// Explicit flag wins; otherwise a known non-positive stock means
  /// sold out. Unknown stock is assumed available.
  pub fn sold_out(&self) -> bool {
    self
      .is_sold_out
      .unwrap_or_else(|| matches!(self.stock, Some(s) if s <= 0))
  }

  /// Image gallery with fallback: `images` when non-empty, else the single
  /// `image`, else nothing.
  pub fn gallery(&self) -> Vec<String> {
    if !self.images.is_empty() {
      return self.images.clone();
    }
    self.image.clone().into_iter().collect()
  }

  /// Builds the cart line for this product: keyed by sku, priced at the
  /// sale price, illustrated with the first gallery image.
  pub fn cart_line(&self, quantity: u32) -> CartItem {
    CartItem {
      id: self.sku.clone(),
      name: self.name.clone(),
      price: self.sale_price(),
      image: self.gallery().into_iter().next().unwrap_or_default(),
      quantity,
    }
  }
}

/// Picks the "similar products" strip for a product page: same listing
/// minus the product itself, first four entries.
pub fn similar_products(same_category: &[Product], current_id: u64) -> Vec<Product> {
  same_category
    .iter()
    .filter(|p| p.id != current_id)
    .take(4)
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(id: u64, price: u32, discount: Option<u32>) -> Product {
    Product {
      id,
      name: format!("Product {id}"),
      price,
      old_price: None,
      discount,
      description: String::new(),
      image: Some(format!("https://cdn.example.com/{id}.jpg")),
      images: vec![],
      sku: format!("SKU-{id}"),
      category: "software".to_string(),
      availability: "in_stock".to_string(),
      supplier: "acme".to_string(),
      stock: None,
      is_sold_out: None,
      details: BTreeMap::new(),
    }
  }

  #[test]
  fn sale_price_applies_discount_percent_with_rounding() {
    let p = product(1, 10999, Some(15));
    // 10999 * 0.85 = 9349.15 -> 9349
    assert_eq!(p.sale_price(), 9349);
    assert_eq!(p.display_original_price(), Some(10999));

    let plain = product(2, 5000, None);
    assert_eq!(plain.sale_price(), 5000);
    assert_eq!(plain.display_original_price(), None);
  }

  #[test]
  fn sold_out_prefers_explicit_flag_over_stock() {
    let mut p = product(1, 100, None);
    assert!(!p.sold_out());
    p.stock = Some(0);
    assert!(p.sold_out());
    p.is_sold_out = Some(false);
    assert!(!p.sold_out());
  }

  #[test]
  fn gallery_falls_back_to_single_image() {
    let mut p = product(1, 100, None);
    assert_eq!(p.gallery(), vec![format!("https://cdn.example.com/1.jpg")]);
    p.images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
    assert_eq!(p.gallery().len(), 2);
  }

  #[test]
  fn cart_line_uses_sku_and_sale_price() {
    let p = product(7, 2000, Some(50));
    let line = p.cart_line(3);
    assert_eq!(line.id, "SKU-7");
    assert_eq!(line.price, 1000);
    assert_eq!(line.quantity, 3);
  }

  #[test]
  fn similar_products_excludes_self_and_caps_at_four() {
    let listing: Vec<Product> = (1..=6).map(|i| product(i, 100, None)).collect();
    let similar = similar_products(&listing, 2);
    assert_eq!(similar.len(), 4);
    assert!(similar.iter().all(|p| p.id != 2));
  }
}
