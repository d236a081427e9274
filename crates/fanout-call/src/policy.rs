use std::time::Duration;

use fanout_config::Aggregation;

/// Run-wide configuration, read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPolicy {
  /// Record exhausted failures as outcomes instead of aborting the run.
  pub continue_on_fail: bool,
  /// Batch size for sequential batching. `0` means unbounded fan-out.
  pub max_concurrent: usize,
  pub aggregation: Aggregation,
  /// Attach timing to outcomes and a summary to the aggregate.
  pub include_metadata: bool,
  /// Wall-clock budget for an unbounded fan-out.
  pub global_timeout_secs: u64,
}

impl RunPolicy {
  pub const DEFAULT_GLOBAL_TIMEOUT_SECS: u64 = 300;

  /// The global timeout as a duration.
  pub fn global_timeout(&self) -> Duration {
    Duration::from_secs(self.global_timeout_secs)
  }

  /// Whether `call_count` calls run in sequential batches.
  pub fn is_batched(&self, call_count: usize) -> bool {
    self.max_concurrent > 0 && self.max_concurrent < call_count
  }
}

impl Default for RunPolicy {
  fn default() -> Self {
    Self {
      continue_on_fail: true,
      max_concurrent: 0,
      aggregation: Aggregation::Array,
      include_metadata: false,
      global_timeout_secs: Self::DEFAULT_GLOBAL_TIMEOUT_SECS,
    }
  }
}
