//! Fan-out engine facade.
//!
//! The `FanoutEngine` runs a list of calls through the scheduler and shapes
//! the outcomes with the aggregator.

use std::sync::Arc;

use fanout_call::{CallSpec, RunPolicy};
use fanout_http::HttpClient;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::aggregate::{AggregateResult, aggregate};
use crate::error::RunError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::executor::RequestExecutor;
use crate::result::RunResult;
use crate::retry::RetryController;
use crate::scheduler::Scheduler;

/// The fan-out engine.
///
/// Generic over `N: ExecutionNotifier` to allow different notification strategies.
/// Use `FanoutEngine::new()` for a default engine with no-op notifications,
/// or `FanoutEngine::with_notifier()` to provide a custom notifier.
pub struct FanoutEngine<N: ExecutionNotifier = NoopNotifier> {
  scheduler: Scheduler<N>,
  notifier: Arc<N>,
}

impl FanoutEngine<NoopNotifier> {
  /// Create a new engine with no-op notifications.
  pub fn new(client: Arc<dyn HttpClient>) -> Self {
    Self::with_notifier(client, NoopNotifier)
  }
}

impl<N: ExecutionNotifier> FanoutEngine<N> {
  /// Create a new engine with a custom notifier.
  pub fn with_notifier(client: Arc<dyn HttpClient>, notifier: N) -> Self {
    let notifier = Arc::new(notifier);
    let retry = RetryController::new(RequestExecutor::new(client), notifier.clone());
    Self {
      scheduler: Scheduler::new(retry, notifier.clone()),
      notifier,
    }
  }

  /// Run every call and return the outcomes in call order.
  #[instrument(name = "run", skip_all, fields(run_id = tracing::field::Empty))]
  pub async fn run(
    &self,
    specs: Vec<CallSpec>,
    policy: &RunPolicy,
    cancel: CancellationToken,
  ) -> Result<RunResult, RunError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    tracing::Span::current().record("run_id", run_id.as_str());

    info!(
      total_calls = specs.len(),
      max_concurrent = policy.max_concurrent,
      "run started"
    );
    self.notifier.notify(ExecutionEvent::RunStarted {
      run_id: run_id.clone(),
      total_calls: specs.len(),
    });

    let result = self.scheduler.run(&run_id, specs, policy, cancel).await;

    match &result {
      Ok(outcomes) => {
        let failed = outcomes.iter().filter(|o| !o.success).count();
        info!(outcomes = outcomes.len(), failed, "run completed");
        self.notifier.notify(ExecutionEvent::RunCompleted {
          run_id: run_id.clone(),
        });
      }
      Err(e) => {
        error!(error = %e, "run failed");
        self.notifier.notify(ExecutionEvent::RunFailed {
          run_id: run_id.clone(),
          error: e.to_string(),
        });
      }
    }

    Ok(RunResult {
      run_id,
      outcomes: result?,
    })
  }

  /// Run every call and aggregate the outcomes per `policy`.
  pub async fn execute(
    &self,
    specs: Vec<CallSpec>,
    policy: &RunPolicy,
    cancel: CancellationToken,
  ) -> Result<AggregateResult, RunError> {
    let result = self.run(specs, policy, cancel).await?;
    Ok(aggregate(result.outcomes, policy))
  }
}
