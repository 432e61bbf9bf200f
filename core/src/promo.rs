// core/src/promo.rs

//! Promo-code validation. A single request/response call against the
//! backend; no caching, no retry.

use crate::api::StorefrontApi;
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A promo code the backend accepted for the current cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoApplication {
  pub code: String,
  pub discount_amount: u32,
}

/// Business outcome of a validation call. Transport failures are a
/// `StoreError::PromoTransport`, never a variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoOutcome {
  Applied(PromoApplication),
  Rejected { reason: String },
}

/// Message shown when the backend rejects a code without saying why.
pub const PROMO_REJECTED_FALLBACK: &str = "Promo code is not valid.";

/// Validates `code` against `cart_total`.
///
/// The wire response uses nullable fields (`valid` + optional
/// `discount_amount`/`error`); this maps them onto `PromoOutcome` so
/// callers never see a half-valid application. A `valid: true` response
/// missing its discount amount counts as a zero discount rather than a
/// rejection, matching the backend's own display rule.
pub async fn validate_promo(
  api: &dyn StorefrontApi,
  code: &str,
  cart_total: u32,
) -> StoreResult<PromoOutcome> {
  let response = api
    .validate_promo_code(code, cart_total)
    .await
    .map_err(|e| StoreError::PromoTransport {
      source: anyhow::Error::new(e),
    })?;

  if response.valid {
    let application = PromoApplication {
      // The backend may echo a canonicalized code; prefer it.
      code: response.code.unwrap_or_else(|| code.to_string()),
      discount_amount: response.discount_amount.unwrap_or(0),
    };
    info!(code = %application.code, discount = application.discount_amount, "promo code accepted");
    return Ok(PromoOutcome::Applied(application));
  }

  let reason = response
    .error
    .unwrap_or_else(|| PROMO_REJECTED_FALLBACK.to_string());
  debug!(code, %reason, "promo code rejected");
  Ok(PromoOutcome::Rejected { reason })
}
