//! Execution events and notifiers for observability.
//!
//! Events are emitted during a run to allow consumers to observe progress,
//! persist state, stream to UIs, etc.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
  /// The run has started.
  RunStarted { run_id: String, total_calls: usize },

  /// A call has been dispatched.
  CallStarted {
    run_id: String,
    index: usize,
    name: String,
  },

  /// A call attempt failed and another attempt follows after `delay_secs`.
  CallRetrying {
    run_id: String,
    index: usize,
    /// 1-based number of the attempt that failed.
    attempt: u32,
    delay_secs: u64,
    error: String,
  },

  /// A call has completed successfully.
  CallCompleted {
    run_id: String,
    index: usize,
    name: String,
  },

  /// A call has failed after all attempts.
  CallFailed {
    run_id: String,
    index: usize,
    name: String,
    error: String,
  },

  /// The run has completed.
  RunCompleted { run_id: String },

  /// The run has failed.
  RunFailed { run_id: String, error: String },
}

/// Trait for receiving execution events.
///
/// The engine calls `notify` from the tasks running individual calls, so
/// implementations must be cheap and must not block.
pub trait ExecutionNotifier: Send + Sync + 'static {
  /// Called when an execution event occurs.
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // Unbounded so a slow consumer never stalls a call task. Volume is a
  // handful of events per call.
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  /// Create a new channel notifier.
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
