// core/examples/checkout_flow.rs

//! The full happy path against an in-process mock backend: fill the cart,
//! apply a promo code, submit the order, then watch the payment settle.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use zahiala::{
  CartItem, CartStore, CheckoutSession, ContactDetails, CreateOrderInput, CreateOrderResponse,
  OrderSnapshot, OrderStatus, PaymentLink, PaymentPayload, Product, ProductFilter, ProductPage,
  StoreError, StoreResult, StorefrontApi, ValidatePromoResponse,
};

/// A backend that accepts every order and reports it paid after the second
/// status poll, as if the customer scanned the QR code while we waited.
struct DemoBackend {
  polls: AtomicUsize,
}

#[async_trait]
impl StorefrontApi for DemoBackend {
  async fn create_order(&self, input: CreateOrderInput) -> StoreResult<CreateOrderResponse> {
    info!(
      customer = %input.customer_name,
      items = input.items.len(),
      promo = ?input.promo_code,
      "backend: order received"
    );
    Ok(CreateOrderResponse {
      order_id: "ord_demo_1".to_string(),
      order_number: "1042".to_string(),
      status: OrderStatus::Pending,
      total: input.items.iter().map(|i| i.price * i.quantity).sum(),
      qpay: PaymentPayload {
        qr_image: "data:image/png;base64,AAAA".to_string(),
        qr_code: "0002010102121531...".to_string(),
        urls: vec![PaymentLink {
          name: "Khan bank".to_string(),
          logo: None,
          link: "khanbank://q?qPay_QRcode=...".to_string(),
        }],
      },
    })
  }

  async fn get_order(&self, _order_id: &str) -> StoreResult<OrderSnapshot> {
    let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
    let status = if polls >= 2 { OrderStatus::Paid } else { OrderStatus::Pending };
    info!(polls, ?status, "backend: status poll");
    Ok(OrderSnapshot { status, total: None })
  }

  async fn validate_promo_code(&self, code: &str, cart_total: u32) -> StoreResult<ValidatePromoResponse> {
    if code == "WELCOME" && cart_total >= 5000 {
      Ok(ValidatePromoResponse {
        valid: true,
        code: Some(code.to_string()),
        discount_amount: Some(500),
        error: None,
      })
    } else {
      Ok(ValidatePromoResponse {
        valid: false,
        code: None,
        discount_amount: None,
        error: Some("Code not applicable to this cart.".to_string()),
      })
    }
  }

  async fn get_product(&self, id: u64) -> StoreResult<Product> {
    Err(StoreError::Api {
      status: 404,
      message: format!("no catalog in this demo (product {})", id),
    })
  }

  async fn get_products(&self, _filter: ProductFilter) -> StoreResult<ProductPage> {
    Ok(ProductPage { products: vec![], total: Some(0) })
  }
}

#[tokio::main]
async fn main() -> Result<(), StoreError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Checkout Flow Example ---");

  let api: Arc<dyn StorefrontApi> = Arc::new(DemoBackend { polls: AtomicUsize::new(0) });
  let cart = CartStore::new();
  cart.add_item(CartItem {
    id: "SKU-OFFICE".to_string(),
    name: "Office suite license".to_string(),
    price: 8000,
    image: "https://cdn.example.com/office.jpg".to_string(),
    quantity: 1,
  });
  cart.add_item(CartItem {
    id: "SKU-AV".to_string(),
    name: "Antivirus, 1 year".to_string(),
    price: 2000,
    image: "https://cdn.example.com/av.jpg".to_string(),
    quantity: 1,
  });

  let mut session = CheckoutSession::new(api, cart.clone());
  session.set_contact(ContactDetails {
    name: "Bat-Erdene".to_string(),
    phone: "88888888".to_string(),
    email: "bat@example.mn".to_string(),
  });

  let outcome = session.apply_promo("WELCOME").await?;
  info!(?outcome, grand_total = session.grand_total(), "promo applied");

  let order = session.submit().await?.clone();
  info!(order_number = %order.order_number, total = order.total, "order created, cart cleared");
  assert!(cart.is_empty());

  // Watch the settlement. The poller fetches immediately and then every
  // 3 seconds; the demo backend settles on the second poll.
  let mut status_rx = session.start_payment_tracking()?.subscribe();
  while !status_rx.borrow().is_paid() {
    if status_rx.changed().await.is_err() {
      break;
    }
  }
  info!(status = ?session.payment_status(), "payment settled");

  session.stop_payment_tracking();
  Ok(())
}
