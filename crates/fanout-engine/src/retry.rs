//! Bounded retry with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use fanout_call::CallSpec;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CallError;
use crate::events::{ExecutionEvent, ExecutionNotifier};
use crate::executor::RequestExecutor;

/// Identifies a call within a run.
#[derive(Debug, Clone)]
pub struct CallContext {
  pub run_id: String,
  /// Position of the call in the run's call list.
  pub index: usize,
}

/// Result of a call once it succeeded or ran out of attempts.
#[derive(Debug)]
pub struct RetryOutcome {
  pub result: Result<serde_json::Value, CallError>,
  /// Start of the attempt that produced `result`.
  pub last_attempt_started: Instant,
}

/// Delay after the failed attempt `attempt` (0-based): `2^attempt` seconds.
pub fn backoff_delay(attempt: u32) -> Duration {
  Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Wraps a [`RequestExecutor`] with `retry_count + 1` sequential attempts.
pub struct RetryController<N: ExecutionNotifier> {
  executor: RequestExecutor,
  notifier: Arc<N>,
}

impl<N: ExecutionNotifier> Clone for RetryController<N> {
  fn clone(&self) -> Self {
    Self {
      executor: self.executor.clone(),
      notifier: self.notifier.clone(),
    }
  }
}

impl<N: ExecutionNotifier> RetryController<N> {
  pub fn new(executor: RequestExecutor, notifier: Arc<N>) -> Self {
    Self { executor, notifier }
  }

  /// Run `spec` until it succeeds or its attempts are used up.
  ///
  /// The outcome carries the last attempt's error when every attempt fails.
  /// Backoff sleeps end early with [`CallError::Cancelled`] if `cancel`
  /// fires. Retries are capped at [`CallSpec::MAX_RETRY_COUNT`].
  pub async fn execute_with_retry(
    &self,
    ctx: &CallContext,
    spec: &CallSpec,
    cancel: &CancellationToken,
  ) -> RetryOutcome {
    let max_retries = spec.retry_count.min(CallSpec::MAX_RETRY_COUNT);
    let attempts = max_retries + 1;
    let mut attempt = 0;

    loop {
      let attempt_started = Instant::now();
      let finish = move |result: Result<serde_json::Value, CallError>| RetryOutcome {
        result,
        last_attempt_started: attempt_started,
      };

      let error = match self.executor.execute(spec, cancel).await {
        Ok(data) => {
          if attempt > 0 {
            info!(attempt = attempt + 1, attempts, "call succeeded after retry");
          }
          return finish(Ok(data));
        }
        Err(CallError::Cancelled) => return finish(Err(CallError::Cancelled)),
        Err(e) => e,
      };

      warn!(
        attempt = attempt + 1,
        attempts,
        error = %error,
        "call attempt failed"
      );

      if attempt >= max_retries {
        return finish(Err(error));
      }

      let delay = backoff_delay(attempt);
      self.notifier.notify(ExecutionEvent::CallRetrying {
        run_id: ctx.run_id.clone(),
        index: ctx.index,
        attempt: attempt + 1,
        delay_secs: delay.as_secs(),
        error: error.to_string(),
      });

      tokio::select! {
        biased;
        _ = cancel.cancelled() => return finish(Err(CallError::Cancelled)),
        _ = tokio::time::sleep(delay) => {}
      }

      attempt += 1;
    }
  }
}
