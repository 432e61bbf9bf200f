// core/src/http.rs

//! The reqwest-backed `StorefrontApi` implementation.
//!
//! Transport format: JSON over the backend's `/api` routes. Non-success
//! responses are mapped to `StoreError::Api` carrying the server's
//! `error` field when the body has one, the raw body text otherwise.

use crate::api::{
  CreateOrderInput, CreateOrderResponse, OrderSnapshot, ProductFilter, ProductPage, StorefrontApi,
  ValidatePromoResponse,
};
use crate::catalog::Product;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
  client: reqwest::Client,
  base_url: String,
}

impl HttpStorefrontApi {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  pub fn from_config(config: &StoreConfig) -> Self {
    Self::new(config.api_base_url.clone())
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> StoreResult<T> {
    let response = self
      .client
      .get(self.url(path))
      .send()
      .await
      .map_err(|e| transport(context, e))?;
    decode(response, context).await
  }

  async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
    context: &str,
  ) -> StoreResult<T> {
    let response = self
      .client
      .post(self.url(path))
      .json(body)
      .send()
      .await
      .map_err(|e| transport(context, e))?;
    decode(response, context).await
  }
}

fn transport(context: &str, err: reqwest::Error) -> StoreError {
  StoreError::Transport {
    context: context.to_string(),
    source: anyhow::Error::new(err),
  }
}

/// Turns a response into `T`, or into `StoreError::Api` with the server's
/// error message for non-success statuses.
async fn decode<T: DeserializeOwned>(response: reqwest::Response, context: &str) -> StoreResult<T> {
  let status = response.status();
  if !status.is_success() {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
      .unwrap_or(body);
    debug!(context, status = status.as_u16(), %message, "API returned an error");
    return Err(StoreError::Api {
      status: status.as_u16(),
      message,
    });
  }
  response.json::<T>().await.map_err(|e| transport(context, e))
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
  async fn create_order(&self, input: CreateOrderInput) -> StoreResult<CreateOrderResponse> {
    self.post_json("/api/orders", &input, "create_order").await
  }

  async fn get_order(&self, order_id: &str) -> StoreResult<OrderSnapshot> {
    self
      .get_json(&format!("/api/orders/{}", order_id), "get_order")
      .await
  }

  async fn validate_promo_code(&self, code: &str, cart_total: u32) -> StoreResult<ValidatePromoResponse> {
    let body = json!({ "code": code, "cart_total": cart_total });
    self
      .post_json("/api/promo/validate", &body, "validate_promo_code")
      .await
  }

  async fn get_product(&self, id: u64) -> StoreResult<Product> {
    self
      .get_json(&format!("/api/products/{}", id), "get_product")
      .await
  }

  async fn get_products(&self, filter: ProductFilter) -> StoreResult<ProductPage> {
    let response = self
      .client
      .get(self.url("/api/products"))
      .query(&filter)
      .send()
      .await
      .map_err(|e| transport("get_products", e))?;
    decode(response, "get_products").await
  }
}
