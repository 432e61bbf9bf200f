// core/src/poller.rs

//! The payment poller: a cancellable background task that watches an
//! order's settlement status until it reaches `paid`.
//!
//! The observed status is seeded from the creation response; if that is
//! already terminal the timer never starts. Otherwise the task fetches
//! once immediately and then on a fixed interval. Fetch errors are
//! swallowed (the poller cannot distinguish a
//! transient network blip from the payment service being down, so both are
//! retried identically on the next tick) and the previously observed
//! status stands. There is no timeout: only a `paid` observation or
//! cancellation stops the loop.

use crate::api::StorefrontApi;
use crate::order::OrderStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The cadence the storefront UI polls settlement at.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Handle owning one polling task. The owning session must hold exactly
/// one live handle per tracked order; dropping or cancelling the handle
/// stops the task, and a superseded task can never publish a late result.
#[derive(Debug)]
pub struct PollHandle {
  session: Uuid,
  status_rx: watch::Receiver<OrderStatus>,
  cancelled: Arc<AtomicBool>,
  task: Option<JoinHandle<()>>,
}

impl PollHandle {
  /// The most recently observed status.
  pub fn status(&self) -> OrderStatus {
    self.status_rx.borrow().clone()
  }

  /// A receiver that yields every status observation, for callers that
  /// want to await the transition instead of sampling.
  pub fn subscribe(&self) -> watch::Receiver<OrderStatus> {
    self.status_rx.clone()
  }

  /// True once the task has exited (terminal status observed, cancelled,
  /// or never started because the initial status was already terminal).
  pub fn is_finished(&self) -> bool {
    self.task.as_ref().map_or(true, |task| task.is_finished())
  }

  /// Identifies this polling session in logs.
  pub fn session(&self) -> Uuid {
    self.session
  }

  /// Stops the task. Idempotent; also invoked on drop. The cancellation
  /// flag is raised before the abort so a fetch that is already resolving
  /// on another worker cannot publish into a cancelled session.
  pub fn cancel(&mut self) {
    self.cancelled.store(true, Ordering::SeqCst);
    if let Some(task) = self.task.take() {
      task.abort();
      debug!(session = %self.session, "payment poller cancelled");
    }
  }
}

impl Drop for PollHandle {
  fn drop(&mut self) {
    self.cancel();
  }
}

/// Starts tracking `order_id`, seeding the observed status with
/// `initial_status` from the creation response.
///
/// When the initial status is already `paid` no task is spawned and the
/// backend is never queried.
#[instrument(skip(api, initial_status), fields(order_id = %order_id))]
pub fn start(
  api: Arc<dyn StorefrontApi>,
  order_id: String,
  initial_status: OrderStatus,
  interval: Duration,
) -> PollHandle {
  let session = Uuid::new_v4();
  let already_paid = initial_status.is_paid();
  let (status_tx, status_rx) = watch::channel(initial_status);
  let cancelled = Arc::new(AtomicBool::new(false));

  if already_paid {
    info!(%session, "order already settled at creation; poller not started");
    return PollHandle {
      session,
      status_rx,
      cancelled,
      task: None,
    };
  }

  let task_cancelled = Arc::clone(&cancelled);
  let task = tokio::spawn(async move {
    let mut ticker = tokio::time::interval(interval);
    // A slow fetch must not cause a burst of catch-up polls.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      // The first tick completes immediately: the one-time fetch performed
      // when entering the payment state.
      ticker.tick().await;
      if task_cancelled.load(Ordering::SeqCst) {
        return;
      }

      match api.get_order(&order_id).await {
        Ok(snapshot) => {
          // Stale guard: a fetch resolving after cancellation must not
          // publish into a superseded session.
          if task_cancelled.load(Ordering::SeqCst) {
            return;
          }
          let paid = snapshot.status.is_paid();
          if status_tx.send(snapshot.status).is_err() {
            // Every handle and subscriber is gone; nobody is watching.
            return;
          }
          if paid {
            info!(%session, %order_id, "payment settled; poller stopping");
            return;
          }
        }
        Err(err) => {
          // Swallowed: keep the previous displayed status and retry on
          // the next tick.
          debug!(%session, %order_id, error = %err, "status fetch failed; will retry");
        }
      }
    }
  });

  info!(%session, "payment poller started");
  PollHandle {
    session,
    status_rx,
    cancelled,
    task: Some(task),
  }
}
