//! Engine error types.

/// Why a single call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
  /// The per-call timer fired before a response arrived.
  #[error("call timed out after {seconds} seconds")]
  Timeout { seconds: u64 },

  /// Network failure or a non-2xx response.
  #[error("{message}")]
  Transport {
    message: String,
    status: Option<u16>,
  },

  /// The run was cancelled while the call was in flight or backing off.
  #[error("call cancelled")]
  Cancelled,
}

impl CallError {
  /// HTTP status code, if the failure carried one.
  pub fn status(&self) -> Option<u16> {
    match self {
      CallError::Transport { status, .. } => *status,
      _ => None,
    }
  }
}

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
  /// The engine was started with no calls.
  #[error("no calls configured for execution")]
  NoCalls,

  /// The run exceeded its wall-clock budget. All outcomes are discarded.
  #[error("global timeout of {seconds} seconds exceeded")]
  GlobalTimeout { seconds: u64 },

  /// A call exhausted its retries and the policy does not continue on failure.
  #[error("call '{name}' ({target}) failed: {source}")]
  AbortedOnFailure {
    name: String,
    target: String,
    #[source]
    source: CallError,
  },

  /// The run was cancelled from outside.
  #[error("run cancelled")]
  Cancelled,

  /// A spawned call task panicked or was aborted.
  #[error("call task join error: {message}")]
  TaskJoin { message: String },
}
