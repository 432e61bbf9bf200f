// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::Level;
use zahiala::{
  CartItem, CreateOrderInput, CreateOrderResponse, OrderSnapshot, OrderStatus, PaymentLink,
  PaymentPayload, Product, ProductFilter, ProductPage, StoreError, StoreResult, StorefrontApi,
  ValidatePromoResponse,
};

// --- Scripted mock backend ---

/// One scripted answer to a `get_order` poll.
#[derive(Debug, Clone)]
pub enum PollStep {
  Status(OrderStatus),
  Fail,
}

/// A `StorefrontApi` whose answers are scripted per test. Every test
/// builds its own instance, so there is no cross-test state.
pub struct MockStorefrontApi {
  create_order_script: Mutex<VecDeque<StoreResult<CreateOrderResponse>>>,
  poll_script: Mutex<VecDeque<PollStep>>,
  promo_script: Mutex<VecDeque<StoreResult<ValidatePromoResponse>>>,
  products: Mutex<Vec<Product>>,

  pub create_order_calls: AtomicUsize,
  pub get_order_calls: AtomicUsize,
  pub promo_calls: AtomicUsize,

  /// Last order-creation request body, for payload assertions.
  pub last_create_order_input: Mutex<Option<CreateOrderInput>>,
}

impl MockStorefrontApi {
  pub fn new() -> Self {
    Self {
      create_order_script: Mutex::new(VecDeque::new()),
      poll_script: Mutex::new(VecDeque::new()),
      promo_script: Mutex::new(VecDeque::new()),
      products: Mutex::new(Vec::new()),
      create_order_calls: AtomicUsize::new(0),
      get_order_calls: AtomicUsize::new(0),
      promo_calls: AtomicUsize::new(0),
      last_create_order_input: Mutex::new(None),
    }
  }

  pub fn push_create_order(self, result: StoreResult<CreateOrderResponse>) -> Self {
    self.create_order_script.lock().unwrap().push_back(result);
    self
  }

  /// Scripts the poll answers in order. When the script runs out, the last
  /// step repeats (a settled backend keeps answering `paid`).
  pub fn with_poll_script(self, steps: impl IntoIterator<Item = PollStep>) -> Self {
    self.poll_script.lock().unwrap().extend(steps);
    self
  }

  pub fn push_promo(self, result: StoreResult<ValidatePromoResponse>) -> Self {
    self.promo_script.lock().unwrap().push_back(result);
    self
  }

  pub fn with_products(self, products: Vec<Product>) -> Self {
    *self.products.lock().unwrap() = products;
    self
  }

  pub fn create_order_call_count(&self) -> usize {
    self.create_order_calls.load(Ordering::SeqCst)
  }

  pub fn get_order_call_count(&self) -> usize {
    self.get_order_calls.load(Ordering::SeqCst)
  }

  pub fn promo_call_count(&self) -> usize {
    self.promo_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl StorefrontApi for MockStorefrontApi {
  async fn create_order(&self, input: CreateOrderInput) -> StoreResult<CreateOrderResponse> {
    self.create_order_calls.fetch_add(1, Ordering::SeqCst);
    *self.last_create_order_input.lock().unwrap() = Some(input);
    self
      .create_order_script
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| {
        Err(StoreError::Api {
          status: 500,
          message: "mock: create_order not scripted".to_string(),
        })
      })
  }

  async fn get_order(&self, _order_id: &str) -> StoreResult<OrderSnapshot> {
    self.get_order_calls.fetch_add(1, Ordering::SeqCst);
    let step = {
      let mut script = self.poll_script.lock().unwrap();
      if script.len() > 1 {
        script.pop_front()
      } else {
        script.front().cloned() // repeat the final step forever
      }
    };
    match step {
      Some(PollStep::Status(status)) => Ok(OrderSnapshot { status, total: None }),
      Some(PollStep::Fail) => Err(StoreError::Transport {
        context: "get_order".to_string(),
        source: anyhow::anyhow!("mock: scripted transport failure"),
      }),
      None => Err(StoreError::Api {
        status: 404,
        message: "mock: order not found".to_string(),
      }),
    }
  }

  async fn validate_promo_code(&self, _code: &str, _cart_total: u32) -> StoreResult<ValidatePromoResponse> {
    self.promo_calls.fetch_add(1, Ordering::SeqCst);
    self.promo_script.lock().unwrap().pop_front().unwrap_or_else(|| {
      Ok(ValidatePromoResponse {
        valid: false,
        code: None,
        discount_amount: None,
        error: Some("mock: promo not scripted".to_string()),
      })
    })
  }

  async fn get_product(&self, id: u64) -> StoreResult<Product> {
    self
      .products
      .lock()
      .unwrap()
      .iter()
      .find(|p| p.id == id)
      .cloned()
      .ok_or_else(|| StoreError::Api {
        status: 404,
        message: format!("mock: product {} not found", id),
      })
  }

  async fn get_products(&self, filter: ProductFilter) -> StoreResult<ProductPage> {
    let products: Vec<Product> = self
      .products
      .lock()
      .unwrap()
      .iter()
      .filter(|p| filter.category.as_ref().map_or(true, |c| &p.category == c))
      .cloned()
      .collect();
    let total = Some(products.len() as u32);
    Ok(ProductPage { products, total })
  }
}

// --- Sample data builders ---

pub fn cart_item(id: &str, price: u32, quantity: u32) -> CartItem {
  CartItem {
    id: id.to_string(),
    name: format!("Product {id}"),
    price,
    image: format!("https://cdn.example.com/{id}.jpg"),
    quantity,
  }
}

pub fn qpay_payload() -> PaymentPayload {
  PaymentPayload {
    qr_image: "data:image/png;base64,AAAA".to_string(),
    qr_code: "0002010102121531...".to_string(),
    urls: vec![
      PaymentLink {
        name: "Khan bank".to_string(),
        logo: Some("https://qpay.mn/q/logo/khan.png".to_string()),
        link: "khanbank://q?qPay_QRcode=...".to_string(),
      },
      PaymentLink {
        name: "Social Pay".to_string(),
        logo: None,
        link: "socialpay-payment://q?qPay_QRcode=...".to_string(),
      },
    ],
  }
}

pub fn created_order(status: OrderStatus, total: u32) -> CreateOrderResponse {
  CreateOrderResponse {
    order_id: "ord_01".to_string(),
    order_number: "1042".to_string(),
    status,
    total,
    qpay: qpay_payload(),
  }
}

pub fn promo_accepted(code: &str, discount_amount: u32) -> ValidatePromoResponse {
  ValidatePromoResponse {
    valid: true,
    code: Some(code.to_string()),
    discount_amount: Some(discount_amount),
    error: None,
  }
}

pub fn promo_rejected(reason: &str) -> ValidatePromoResponse {
  ValidatePromoResponse {
    valid: false,
    code: None,
    discount_amount: None,
    error: Some(reason.to_string()),
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
