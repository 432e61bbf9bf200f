// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  /// Local precondition failure (empty cart, blank contact field).
  /// No network call has been made when this is returned.
  #[error("{0}")]
  Validation(String),

  /// A second submit was attempted while one is still outstanding.
  #[error("An order submission is already in flight")]
  SubmissionInFlight,

  /// Order creation failed or was rejected. `message` is the server's
  /// error text verbatim when available, a generic fallback otherwise.
  #[error("Order submission failed: {message}")]
  Submission { message: String },

  /// Promo validation could not reach the service. A business-invalid
  /// code is NOT an error (see `PromoOutcome::Rejected`).
  #[error("Promo code check failed. Source: {source}")]
  PromoTransport {
    #[source]
    source: AnyhowError,
  },

  /// Transport or deserialization failure on any other API call.
  #[error("Request failed during {context}. Source: {source}")]
  Transport {
    context: String,
    #[source]
    source: AnyhowError,
  },

  /// The API answered with a non-success status.
  #[error("API error (status {status}): {message}")]
  Api { status: u16, message: String },

  #[error("Configuration error: {0}")]
  Config(String),

  /// Operation is not legal in the current checkout state
  /// (e.g. submitting again after an order already exists).
  #[error("Invalid checkout state: {0}")]
  InvalidState(String),
}

impl StoreError {
  /// The message a checkout surface should show the user. Submission and
  /// validation errors carry their text verbatim; everything else uses
  /// the Display form.
  pub fn user_message(&self) -> String {
    match self {
      StoreError::Validation(m) => m.clone(),
      StoreError::Submission { message } => message.clone(),
      other => other.to_string(),
    }
  }
}

// Convenience conversion so internal helpers can use `?` on anyhow results.
impl From<AnyhowError> for StoreError {
  fn from(err: AnyhowError) -> Self {
    StoreError::Transport {
      context: "internal".to_string(),
      source: err,
    }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
