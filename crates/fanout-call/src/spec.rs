use std::time::Duration;

use crate::auth::Auth;
use crate::payload::Payload;

/// A normalized descriptor of one remote invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSpec {
  /// Address the call is sent to.
  pub target: String,
  /// Display label, unique names are not required.
  pub name: String,
  pub payload: Payload,
  pub timeout_secs: u64,
  /// Retries after the first attempt, at most [`CallSpec::MAX_RETRY_COUNT`].
  pub retry_count: u32,
  pub auth: Auth,
}

impl CallSpec {
  pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
  pub const MAX_RETRY_COUNT: u32 = 5;

  /// Create a call with default payload, timeout, retries and no auth.
  pub fn new(target: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      target: target.into(),
      name: name.into(),
      payload: Payload::default(),
      timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
      retry_count: 0,
      auth: Auth::None,
    }
  }

  /// Name given to the call at `index` (0-based) when none is configured.
  pub fn default_name(index: usize) -> String {
    format!("Call_{}", index + 1)
  }

  pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
    self.payload = payload.into();
    self
  }

  pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
    self.timeout_secs = timeout_secs;
    self
  }

  pub fn with_retry_count(mut self, retry_count: u32) -> Self {
    self.retry_count = retry_count;
    self
  }

  pub fn with_auth(mut self, auth: Auth) -> Self {
    self.auth = auth;
    self
  }

  /// The per-call timeout as a duration.
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}
