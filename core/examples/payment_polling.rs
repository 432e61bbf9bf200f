// core/examples/payment_polling.rs

//! Drives the payment poller directly: a flaky backend that errors on some
//! polls and settles on the fifth. Errors are swallowed and polling simply
//! continues, so the subscriber only ever sees real observations.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use zahiala::{
  poller, CreateOrderInput, CreateOrderResponse, OrderSnapshot, OrderStatus, Product,
  ProductFilter, ProductPage, StoreError, StoreResult, StorefrontApi, ValidatePromoResponse,
};

struct FlakyBackend {
  polls: AtomicUsize,
}

#[async_trait]
impl StorefrontApi for FlakyBackend {
  async fn create_order(&self, _input: CreateOrderInput) -> StoreResult<CreateOrderResponse> {
    Err(StoreError::Api { status: 501, message: "not used in this demo".to_string() })
  }

  async fn get_order(&self, order_id: &str) -> StoreResult<OrderSnapshot> {
    let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
    // Every other poll fails in transit.
    if polls % 2 == 0 {
      info!(polls, %order_id, "backend: simulated transport failure");
      return Err(StoreError::Transport {
        context: "get_order".to_string(),
        source: anyhow::anyhow!("connection reset by peer"),
      });
    }
    let status = if polls >= 5 { OrderStatus::Paid } else { OrderStatus::Pending };
    info!(polls, %order_id, ?status, "backend: status poll");
    Ok(OrderSnapshot { status, total: None })
  }

  async fn validate_promo_code(&self, _code: &str, _cart_total: u32) -> StoreResult<ValidatePromoResponse> {
    Ok(ValidatePromoResponse { valid: false, code: None, discount_amount: None, error: None })
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
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Payment Polling Example ---");

  let api: Arc<dyn StorefrontApi> = Arc::new(FlakyBackend { polls: AtomicUsize::new(0) });

  // Short interval so the demo finishes quickly; production uses the
  // 3-second DEFAULT_POLL_INTERVAL.
  let handle = poller::start(
    api,
    "ord_demo_2".to_string(),
    OrderStatus::Pending,
    Duration::from_millis(300),
  );

  let mut status_rx = handle.subscribe();
  while !status_rx.borrow().is_paid() {
    if status_rx.changed().await.is_err() {
      break;
    }
    let observed = status_rx.borrow().clone();
    info!(?observed, "subscriber: new observation");
  }

  info!(final_status = ?handle.status(), finished = handle.is_finished(), "done");
}
