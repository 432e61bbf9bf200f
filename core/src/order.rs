// core/src/order.rs

//! Order and payment-payload shapes returned by the order service.

use serde::{Deserialize, Serialize};

/// Server-authoritative settlement state of an order.
///
/// The backend owns this value; the client never forces a transition except
/// for taking the initial value from the creation response. Unknown wire
/// values are preserved in `Other` so a backend rollout of a new status
/// cannot break deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Failed,
  Cancelled,
  #[serde(untagged)]
  Other(String),
}

impl OrderStatus {
  /// `paid` is the only value the payment poller treats as terminal.
  pub fn is_paid(&self) -> bool {
    matches!(self, OrderStatus::Paid)
  }
}

/// One bank/app deep link offered by QPay alongside the QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub logo: Option<String>,
  pub link: String,
}

/// The QPay payload attached to a freshly created order. Immutable once
/// received; used only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPayload {
  pub qr_image: String,
  pub qr_code: String,
  #[serde(default)]
  pub urls: Vec<PaymentLink>,
}

/// A created order as held by the checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub order_id: String,
  pub order_number: String,
  pub status: OrderStatus,
  /// Total in whole currency units (MNT has no minor unit in practice).
  pub total: u32,
  pub qpay: PaymentPayload,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_known_and_unknown_values() {
    let paid: OrderStatus = serde_json::from_str("\"paid\"").unwrap();
    assert!(paid.is_paid());

    let odd: OrderStatus = serde_json::from_str("\"refund_review\"").unwrap();
    assert_eq!(odd, OrderStatus::Other("refund_review".to_string()));
    assert!(!odd.is_paid());
  }
}
