use thiserror::Error;

/// Errors raised while normalizing a run configuration.
#[derive(Debug, Error)]
pub enum NormalizeError {
  /// The source produced no calls.
  #[error("no calls configured for execution")]
  NoCalls,

  /// A call has neither a URL nor a workflow identifier.
  #[error("call at index {index} has no target")]
  MissingTarget { index: usize },

  /// Retry count above the supported maximum.
  #[error("call at index {index}: retry count {retry_count} exceeds the maximum of {max}")]
  RetryCountOutOfRange {
    index: usize,
    retry_count: u32,
    max: u32,
  },

  /// Free-form call entries could not be parsed.
  #[error("invalid call entries: {message}")]
  InvalidEntries { message: String },

  /// A single call entry has the wrong shape.
  #[error("invalid call entry at index {index}: {message}")]
  InvalidEntry { index: usize, message: String },

  /// A workflow identifier was given but there is no base URL to resolve it against.
  #[error("call at index {index} references workflow '{workflow_id}' but no credentials are configured")]
  MissingCredentials { index: usize, workflow_id: String },
}
