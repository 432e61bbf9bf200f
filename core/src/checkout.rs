// core/src/checkout.rs

//! The checkout session: the state machine driving order submission and
//! payment tracking for one storefront session.
//!
//! States run `Form -> Submitting -> Payment`; there is no transition back
//! to `Form` once an order exists (the cart is cleared immediately on
//! success, so resubmission requires a new session).

use crate::api::{CreateOrderInput, CreateOrderResponse, StorefrontApi};
use crate::cart::CartStore;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::order::{Order, OrderStatus};
use crate::poller::{self, PollHandle, DEFAULT_POLL_INTERVAL};
use crate::promo::{validate_promo, PromoApplication, PromoOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// Precondition messages, one per failing check, surfaced without any
// network call being made.
pub const MSG_EMPTY_CART: &str = "Your cart is empty. Add a product first.";
pub const MSG_NAME_REQUIRED: &str = "Please enter your name.";
pub const MSG_PHONE_REQUIRED: &str = "Please enter your phone number.";
pub const MSG_EMAIL_REQUIRED: &str = "Please enter the email address that will receive your code.";

/// Fallback when order creation fails without a server-provided message.
pub const MSG_SUBMISSION_FALLBACK: &str = "Failed to create the order. Please try again.";

/// Where the session is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
  /// Collecting contact details; submission is enabled.
  Form,
  /// An order-creation request is outstanding; submission is disabled.
  Submitting,
  /// An order exists; the session displays the QPay payload and tracks
  /// settlement.
  Payment,
}

/// Contact fields collected by the form. Email doubles as the delivery
/// channel for digital goods.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
  pub name: String,
  pub phone: String,
  pub email: String,
}

/// One checkout session. Owns the applied promo, the created order, and
/// the polling handle; shares the cart with the rest of the process.
pub struct CheckoutSession {
  api: Arc<dyn StorefrontApi>,
  cart: CartStore,
  contact: ContactDetails,
  delivery_method: String,
  poll_interval: Duration,
  state: CheckoutState,
  applied_promo: Option<PromoApplication>,
  promo_in_flight: bool,
  order: Option<Order>,
  poll: Option<PollHandle>,
}

impl CheckoutSession {
  pub fn new(api: Arc<dyn StorefrontApi>, cart: CartStore) -> Self {
    Self {
      api,
      cart,
      contact: ContactDetails::default(),
      delivery_method: "city".to_string(),
      poll_interval: DEFAULT_POLL_INTERVAL,
      state: CheckoutState::Form,
      applied_promo: None,
      promo_in_flight: false,
      order: None,
      poll: None,
    }
  }

  pub fn from_config(api: Arc<dyn StorefrontApi>, cart: CartStore, config: &StoreConfig) -> Self {
    let mut session = Self::new(api, cart);
    session.delivery_method = config.delivery_method.clone();
    session.poll_interval = config.poll_interval;
    session
  }

  pub fn set_contact(&mut self, contact: ContactDetails) {
    self.contact = contact;
  }

  pub fn contact(&self) -> &ContactDetails {
    &self.contact
  }

  pub fn state(&self) -> CheckoutState {
    self.state
  }

  pub fn cart(&self) -> &CartStore {
    &self.cart
  }

  /// The created order, once the session reached `Payment`.
  pub fn order(&self) -> Option<&Order> {
    self.order.as_ref()
  }

  pub fn applied_promo(&self) -> Option<&PromoApplication> {
    self.applied_promo.as_ref()
  }

  pub fn discount_amount(&self) -> u32 {
    self.applied_promo.as_ref().map_or(0, |p| p.discount_amount)
  }

  /// Cart subtotal minus the applied discount, floored at zero.
  pub fn grand_total(&self) -> u32 {
    self.cart.total_price().saturating_sub(self.discount_amount())
  }

  /// Validates `code` against the current cart subtotal and, on
  /// acceptance, holds the application until it is removed or the order is
  /// submitted. A rejection or a transport failure leaves no promo
  /// applied. At most one validation is in flight at a time.
  ///
  /// The application is NOT revalidated when the cart changes afterwards;
  /// the backend re-checks the code authoritatively at order creation.
  #[instrument(skip(self))]
  pub async fn apply_promo(&mut self, code: &str) -> StoreResult<PromoOutcome> {
    if self.promo_in_flight {
      return Err(StoreError::InvalidState(
        "a promo code check is already in flight".to_string(),
      ));
    }
    let code = code.trim();
    if code.is_empty() {
      return Err(StoreError::Validation("Enter a promo code.".to_string()));
    }
    if self.cart.is_empty() {
      return Err(StoreError::Validation(MSG_EMPTY_CART.to_string()));
    }

    self.promo_in_flight = true;
    let result = validate_promo(self.api.as_ref(), code, self.cart.total_price()).await;
    self.promo_in_flight = false;

    match result {
      Ok(PromoOutcome::Applied(application)) => {
        self.applied_promo = Some(application.clone());
        Ok(PromoOutcome::Applied(application))
      }
      Ok(rejected) => {
        self.applied_promo = None;
        Ok(rejected)
      }
      Err(err) => {
        self.applied_promo = None;
        warn!(error = %err, "promo validation failed in transit");
        Err(err)
      }
    }
  }

  /// Discards the applied promo, restoring the full total.
  pub fn remove_promo(&mut self) {
    self.applied_promo = None;
  }

  /// Submits the order. Preconditions are checked in a fixed order, each
  /// aborting with its own message before any network call: cart
  /// non-empty, then name, phone, and email present.
  ///
  /// On success the cart is cleared, the session moves to `Payment`, and
  /// the created order is returned. On failure the session stays in
  /// `Form` and submission is re-enabled; there is no automatic retry, and
  /// a manual resubmit creates a new order under a fresh `client_ref`.
  #[instrument(skip(self), fields(items = self.cart.len(), total = self.grand_total()))]
  pub async fn submit(&mut self) -> StoreResult<&Order> {
    match self.state {
      CheckoutState::Submitting => return Err(StoreError::SubmissionInFlight),
      CheckoutState::Payment => {
        return Err(StoreError::InvalidState(
          "an order has already been created for this session".to_string(),
        ))
      }
      CheckoutState::Form => {}
    }

    if self.cart.is_empty() {
      return Err(StoreError::Validation(MSG_EMPTY_CART.to_string()));
    }
    let name = self.contact.name.trim().to_string();
    if name.is_empty() {
      return Err(StoreError::Validation(MSG_NAME_REQUIRED.to_string()));
    }
    let phone = self.contact.phone.trim().to_string();
    if phone.is_empty() {
      return Err(StoreError::Validation(MSG_PHONE_REQUIRED.to_string()));
    }
    let email = self.contact.email.trim().to_string();
    if email.is_empty() {
      return Err(StoreError::Validation(MSG_EMAIL_REQUIRED.to_string()));
    }

    let input = CreateOrderInput {
      customer_name: name,
      customer_phone: phone,
      customer_email: email.clone(),
      delivery_method: self.delivery_method.clone(),
      // Digital goods: the license/code goes to the email address.
      delivery_address: email,
      items: self.cart.items(),
      promo_code: self.applied_promo.as_ref().map(|p| p.code.clone()),
      client_ref: Uuid::new_v4(),
    };

    self.state = CheckoutState::Submitting;
    let result = self.api.create_order(input).await;

    match result {
      Ok(response) => {
        let order = order_from_response(response);
        info!(order_number = %order.order_number, total = order.total, "order created");
        self.cart.clear();
        self.state = CheckoutState::Payment;
        Ok(self.order.insert(order))
      }
      Err(err) => {
        self.state = CheckoutState::Form;
        let message = submission_message(&err);
        warn!(error = %err, "order creation failed");
        Err(StoreError::Submission { message })
      }
    }
  }

  /// Starts (or restarts) settlement tracking for the created order. Any
  /// previous poller is cancelled first so exactly one is live per
  /// session. When the creation response was already `paid` the returned
  /// handle never queries the backend.
  pub fn start_payment_tracking(&mut self) -> StoreResult<&PollHandle> {
    let (order_id, initial_status) = match &self.order {
      Some(order) => (order.order_id.clone(), order.status.clone()),
      None => return Err(StoreError::InvalidState("no order to track yet".to_string())),
    };

    if let Some(mut previous) = self.poll.take() {
      previous.cancel();
    }

    let handle = poller::start(Arc::clone(&self.api), order_id, initial_status, self.poll_interval);
    Ok(self.poll.insert(handle))
  }

  /// The settlement status to display: the poller's latest observation
  /// when tracking is active, otherwise the status from the creation
  /// response.
  pub fn payment_status(&self) -> Option<OrderStatus> {
    if let Some(poll) = &self.poll {
      return Some(poll.status());
    }
    self.order.as_ref().map(|o| o.status.clone())
  }

  /// Stops settlement tracking. Called on teardown (the user navigates
  /// away); also happens implicitly when the session is dropped.
  pub fn stop_payment_tracking(&mut self) {
    if let Some(mut poll) = self.poll.take() {
      poll.cancel();
    }
  }
}

impl std::fmt::Debug for CheckoutSession {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CheckoutSession")
      .field("state", &self.state)
      .field("cart_len", &self.cart.len())
      .field("applied_promo", &self.applied_promo)
      .field("order", &self.order.as_ref().map(|o| &o.order_number))
      .finish_non_exhaustive()
  }
}

fn order_from_response(response: CreateOrderResponse) -> Order {
  Order {
    order_id: response.order_id,
    order_number: response.order_number,
    status: response.status,
    total: response.total,
    qpay: response.qpay,
  }
}

/// The user-facing submission failure text: the server's message verbatim
/// when it sent one, a generic fallback otherwise.
fn submission_message(err: &StoreError) -> String {
  match err {
    StoreError::Api { message, .. } if !message.is_empty() => message.clone(),
    StoreError::Validation(message) => message.clone(),
    _ => MSG_SUBMISSION_FALLBACK.to_string(),
  }
}
