// core/examples/promo_codes.rs

//! Promo validation outcomes: accepted, rejected with a reason, and a
//! transport failure. Only the transport case is an error; a rejection is
//! a normal business outcome.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use zahiala::{
  CartStore, CheckoutSession, CreateOrderInput, CreateOrderResponse, OrderSnapshot, Product,
  ProductFilter, ProductPage, PromoOutcome, StoreError, StoreResult, StorefrontApi,
  ValidatePromoResponse,
};

struct PromoBackend;

#[async_trait]
impl StorefrontApi for PromoBackend {
  async fn create_order(&self, _input: CreateOrderInput) -> StoreResult<CreateOrderResponse> {
    Err(StoreError::Api { status: 501, message: "not used in this demo".to_string() })
  }

  async fn get_order(&self, _order_id: &str) -> StoreResult<OrderSnapshot> {
    Err(StoreError::Api { status: 501, message: "not used in this demo".to_string() })
  }

  async fn validate_promo_code(&self, code: &str, cart_total: u32) -> StoreResult<ValidatePromoResponse> {
    match code {
      "WELCOME" => Ok(ValidatePromoResponse {
        valid: true,
        code: Some(code.to_string()),
        discount_amount: Some(cart_total / 20), // 5% off
        error: None,
      }),
      "EXPIRED" => Ok(ValidatePromoResponse {
        valid: false,
        code: None,
        discount_amount: None,
        error: Some("This code expired on 2025-12-31.".to_string()),
      }),
      _ => Err(StoreError::Transport {
        context: "validate_promo_code".to_string(),
        source: anyhow::anyhow!("promo service unreachable"),
      }),
    }
  }

  async fn get_product(&self, id: u64) -> StoreResult<Product> {
    Err(StoreError::Api { status: 404, message: format!("product {} not found", id) })
  }

  async fn get_products(&self, _filter: ProductFilter) -> StoreResult<ProductPage> {
    Ok(ProductPage { products: vec![], total: Some(0) })
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Promo Codes Example ---");

  let api: Arc<dyn StorefrontApi> = Arc::new(PromoBackend);
  let cart = CartStore::new();
  cart.add_item(zahiala::CartItem {
    id: "SKU-OFFICE".to_string(),
    name: "Office suite license".to_string(),
    price: 10000,
    image: String::new(),
    quantity: 1,
  });

  let mut session = CheckoutSession::new(api, cart);

  match session.apply_promo("WELCOME").await {
    Ok(PromoOutcome::Applied(p)) => {
      info!(code = %p.code, discount = p.discount_amount, grand_total = session.grand_total(), "accepted");
    }
    other => warn!(?other, "unexpected"),
  }

  session.remove_promo();
  info!(grand_total = session.grand_total(), "promo removed, full total restored");

  match session.apply_promo("EXPIRED").await {
    Ok(PromoOutcome::Rejected { reason }) => info!(%reason, "rejected"),
    other => warn!(?other, "unexpected"),
  }

  match session.apply_promo("GHOST").await {
    Err(err) => warn!(%err, "transport failure, nothing applied"),
    other => warn!(?other, "unexpected"),
  }
  assert!(session.applied_promo().is_none());
}
