// core/src/config.rs

use crate::error::{StoreError, StoreResult};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::poller::DEFAULT_POLL_INTERVAL;

#[derive(Debug, Clone)]
pub struct StoreConfig {
  /// Base URL of the storefront API, e.g. `https://shop.example.com`.
  pub api_base_url: String,
  /// Cadence of the payment-status poller.
  pub poll_interval: Duration,
  /// The single delivery method the backend expects for digital goods.
  pub delivery_method: String,
}

impl StoreConfig {
  pub fn new(api_base_url: impl Into<String>) -> Self {
    Self {
      api_base_url: api_base_url.into(),
      poll_interval: DEFAULT_POLL_INTERVAL,
      delivery_method: "city".to_string(),
    }
  }

  pub fn from_env() -> StoreResult<Self> {
    dotenv().ok(); // Load .env file if present

    let api_base_url = env::var("STORE_API_BASE_URL")
      .map_err(|e| StoreError::Config(format!("Missing environment variable 'STORE_API_BASE_URL': {}", e)))?;

    let poll_interval = match env::var("STORE_POLL_INTERVAL_MS") {
      Ok(raw) => {
        let ms = raw
          .parse::<u64>()
          .map_err(|e| StoreError::Config(format!("Invalid STORE_POLL_INTERVAL_MS: {}", e)))?;
        Duration::from_millis(ms)
      }
      Err(_) => DEFAULT_POLL_INTERVAL,
    };

    let delivery_method = env::var("STORE_DELIVERY_METHOD").unwrap_or_else(|_| "city".to_string());

    tracing::info!("Store configuration loaded successfully.");
    Ok(Self {
      api_base_url,
      poll_interval,
      delivery_method,
    })
  }
}
