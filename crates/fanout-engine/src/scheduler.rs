//! Fan-out scheduling: unbounded with a global deadline, or sequential batches.

use std::sync::Arc;

use chrono::Utc;
use fanout_call::{CallSpec, RunPolicy};
use futures::future::try_join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::{CallError, RunError};
use crate::events::{ExecutionEvent, ExecutionNotifier};
use crate::result::CallOutcome;
use crate::retry::{CallContext, RetryController};

/// Dispatches calls through a [`RetryController`] and collects their
/// outcomes in input order.
pub struct Scheduler<N: ExecutionNotifier> {
  retry: RetryController<N>,
  notifier: Arc<N>,
}

impl<N: ExecutionNotifier> Scheduler<N> {
  pub fn new(retry: RetryController<N>, notifier: Arc<N>) -> Self {
    Self { retry, notifier }
  }

  /// Run every call in `specs` under `policy`.
  ///
  /// When the policy batches, batches run one after another and each batch
  /// must settle before the next starts. Otherwise all calls start at once
  /// and the whole fan-out is bounded by the policy's global timeout.
  #[instrument(
    name = "fanout",
    skip(self, specs, policy, cancel),
    fields(run_id = %run_id, calls = specs.len())
  )]
  pub async fn run(
    &self,
    run_id: &str,
    specs: Vec<CallSpec>,
    policy: &RunPolicy,
    cancel: CancellationToken,
  ) -> Result<Vec<CallOutcome>, RunError> {
    if specs.is_empty() {
      return Err(RunError::NoCalls);
    }

    // Anything still running when we return (timeout, abort, cancel) is
    // cancelled through this token.
    let run_cancel = cancel.child_token();
    let _guard = run_cancel.clone().drop_guard();

    if policy.is_batched(specs.len()) {
      return self.run_batched(run_id, specs, policy, &run_cancel).await;
    }

    let seconds = policy.global_timeout_secs;
    let all = self.run_batch(run_id, 0, specs, policy, &run_cancel);

    tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        warn!("run cancelled");
        Err(RunError::Cancelled)
      }
      result = tokio::time::timeout(policy.global_timeout(), all) => match result {
        Ok(outcomes) => outcomes,
        Err(_elapsed) => {
          error!(seconds, "global timeout exceeded");
          Err(RunError::GlobalTimeout { seconds })
        }
      },
    }
  }

  async fn run_batched(
    &self,
    run_id: &str,
    specs: Vec<CallSpec>,
    policy: &RunPolicy,
    cancel: &CancellationToken,
  ) -> Result<Vec<CallOutcome>, RunError> {
    let batch_size = policy.max_concurrent;
    let total = specs.len();
    let mut outcomes = Vec::with_capacity(total);
    let mut remaining = specs.into_iter();
    let mut offset = 0;

    while offset < total {
      let batch: Vec<CallSpec> = remaining.by_ref().take(batch_size).collect();
      let len = batch.len();
      info!(offset, batch_size = len, "starting batch");

      outcomes.extend(self.run_batch(run_id, offset, batch, policy, cancel).await?);
      offset += len;
    }

    Ok(outcomes)
  }

  /// Spawn every call in `batch` and wait for all of them.
  ///
  /// `offset` is the index of the batch's first call within the run.
  async fn run_batch(
    &self,
    run_id: &str,
    offset: usize,
    batch: Vec<CallSpec>,
    policy: &RunPolicy,
    cancel: &CancellationToken,
  ) -> Result<Vec<CallOutcome>, RunError> {
    let handles: Vec<JoinHandle<Result<CallOutcome, RunError>>> = batch
      .into_iter()
      .enumerate()
      .map(|(i, spec)| {
        let task = CallTask {
          ctx: CallContext {
            run_id: run_id.to_string(),
            index: offset + i,
          },
          spec,
          retry: self.retry.clone(),
          notifier: self.notifier.clone(),
          continue_on_fail: policy.continue_on_fail,
          include_metadata: policy.include_metadata,
          cancel: cancel.clone(),
        };
        tokio::spawn(task.run())
      })
      .collect();

    // try_join_all keeps input order and returns on the first abort.
    let joined = try_join_all(handles.into_iter().map(|handle| async move {
      match handle.await {
        Ok(result) => result,
        Err(e) => Err(RunError::TaskJoin {
          message: e.to_string(),
        }),
      }
    }));

    tokio::select! {
      biased;
      _ = cancel.cancelled() => Err(RunError::Cancelled),
      result = joined => result,
    }
  }
}

/// Everything a spawned call needs, owned so the task is `'static`.
struct CallTask<N: ExecutionNotifier> {
  ctx: CallContext,
  spec: CallSpec,
  retry: RetryController<N>,
  notifier: Arc<N>,
  continue_on_fail: bool,
  include_metadata: bool,
  cancel: CancellationToken,
}

impl<N: ExecutionNotifier> CallTask<N> {
  #[instrument(
    name = "call",
    skip(self),
    fields(call_index = self.ctx.index, call_name = %self.spec.name, target_url = %self.spec.target)
  )]
  async fn run(self) -> Result<CallOutcome, RunError> {
    self.notifier.notify(ExecutionEvent::CallStarted {
      run_id: self.ctx.run_id.clone(),
      index: self.ctx.index,
      name: self.spec.name.clone(),
    });

    let attempted = self
      .retry
      .execute_with_retry(&self.ctx, &self.spec, &self.cancel)
      .await;
    // Timing covers the final attempt only.
    let elapsed = attempted.last_attempt_started.elapsed();

    let outcome = match attempted.result {
      Ok(data) => {
        info!(elapsed_ms = elapsed.as_millis() as u64, "call completed");
        self.notifier.notify(ExecutionEvent::CallCompleted {
          run_id: self.ctx.run_id.clone(),
          index: self.ctx.index,
          name: self.spec.name.clone(),
        });
        CallOutcome::succeeded(&self.spec, data)
      }
      Err(CallError::Cancelled) => {
        warn!("call cancelled");
        return Err(RunError::Cancelled);
      }
      Err(e) => {
        error!(error = %e, "call failed");
        self.notifier.notify(ExecutionEvent::CallFailed {
          run_id: self.ctx.run_id.clone(),
          index: self.ctx.index,
          name: self.spec.name.clone(),
          error: e.to_string(),
        });

        if !self.continue_on_fail {
          return Err(RunError::AbortedOnFailure {
            name: self.spec.name,
            target: self.spec.target,
            source: e,
          });
        }
        CallOutcome::failed(&self.spec, &e)
      }
    };

    if self.include_metadata {
      Ok(outcome.with_metadata(elapsed, Utc::now()))
    } else {
      Ok(outcome)
    }
  }
}
