// src/lib.rs

//! Zahiala: the cart, checkout, and payment-tracking core of a
//! digital-goods storefront.
//!
//! The crate covers the stateful slice of the storefront:
//!  - A process-wide cart store (items keyed by id, insertion order).
//!  - Promo-code validation with tagged accepted/rejected outcomes.
//!  - The checkout state machine (form -> submitting -> payment) with
//!    ordered local preconditions and single-submission-in-flight.
//!  - A cancellable payment poller that watches an order until QPay
//!    reports it settled.
//!  - The thin `StorefrontApi` boundary behind which the catalog, order,
//!    and promo services live, plus a reqwest/JSON implementation.

// Declare modules according to the planned structure
pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod order;
pub mod poller;
pub mod promo;
pub mod shared;

// --- Re-exports for the Public API ---

// Core data shapes users interact with frequently
pub use crate::cart::{CartItem, CartStore};
pub use crate::order::{Order, OrderStatus, PaymentLink, PaymentPayload};
pub use crate::promo::{PromoApplication, PromoOutcome};

// The checkout state machine and its states
pub use crate::checkout::{CheckoutSession, CheckoutState, ContactDetails};

// Payment tracking
pub use crate::poller::{PollHandle, DEFAULT_POLL_INTERVAL};

// The API boundary and its concrete HTTP implementation
pub use crate::api::{
  CreateOrderInput, CreateOrderResponse, OrderSnapshot, ProductFilter, ProductPage, StorefrontApi,
  ValidatePromoResponse,
};
pub use crate::catalog::Product;
pub use crate::http::HttpStorefrontApi;

pub use crate::config::StoreConfig;
pub use crate::error::{StoreError, StoreResult};
