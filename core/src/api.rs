// core/src/api.rs

//! The storefront's view of the backend: order creation, order status,
//! promo validation, and read-only catalog lookups.
//!
//! Everything behind this trait is an external collaborator. The checkout
//! session and the payment poller only ever talk to `Arc<dyn StorefrontApi>`
//! so tests can script the backend.

use crate::catalog::Product;
use crate::cart::CartItem;
use crate::error::StoreResult;
use crate::order::{OrderStatus, PaymentPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for order creation.
///
/// `delivery_address` carries the customer email: the shop sells digital
/// goods, so the license/code is delivered to that address and no physical
/// address is collected. `client_ref` is a fresh token per submission
/// attempt so the backend can deduplicate duplicate deliveries of a single
/// attempt; a manual resubmit generates a new one and creates a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderInput {
  pub customer_name: String,
  pub customer_phone: String,
  pub customer_email: String,
  pub delivery_method: String,
  pub delivery_address: String,
  pub items: Vec<CartItem>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub promo_code: Option<String>,
  pub client_ref: Uuid,
}

/// Response from order creation: the order identity plus the QPay payload
/// to display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
  pub order_id: String,
  pub order_number: String,
  pub status: OrderStatus,
  pub total: u32,
  pub qpay: PaymentPayload,
}

/// Slim order view returned by status polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
  pub status: OrderStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total: Option<u32>,
}

/// Wire response of promo validation. A business-invalid code comes back
/// as `valid: false` plus `error`; only transport failures are `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePromoResponse {
  pub valid: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discount_amount: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Catalog listing filter. All fields optional; empty filter lists
/// everything the backend is willing to page out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
  pub products: Vec<Product>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total: Option<u32>,
}

/// The thin API boundary the core consumes. Implementations must be cheap
/// to share (`Arc`) and safe to call from the polling task.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
  /// Creates an order from a cart snapshot. Fails with a descriptive error
  /// when the cart is invalid server-side, the promo code is no longer
  /// valid, or a field fails validation.
  async fn create_order(&self, input: CreateOrderInput) -> StoreResult<CreateOrderResponse>;

  /// Fetches the current settlement state of an order. Propagates
  /// not-found and transport errors; callers must tolerate failure without
  /// side effects.
  async fn get_order(&self, order_id: &str) -> StoreResult<OrderSnapshot>;

  /// Validates a promo code against the cart subtotal. Never errors for a
  /// business-invalid code; may error for transport failure.
  async fn validate_promo_code(&self, code: &str, cart_total: u32) -> StoreResult<ValidatePromoResponse>;

  /// Read-only catalog lookup, consumed only to populate display data.
  async fn get_product(&self, id: u64) -> StoreResult<Product>;

  /// Read-only catalog listing, consumed only to populate display data.
  async fn get_products(&self, filter: ProductFilter) -> StoreResult<ProductPage>;
}
