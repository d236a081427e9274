//! Call outcome types.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use fanout_call::CallSpec;
use serde::{Deserialize, Serialize};

use crate::error::CallError;

/// Terminal result of one call, after it succeeded or ran out of retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutcome {
  pub success: bool,
  pub target: String,
  pub name: String,
  /// Response body, present iff `success`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<serde_json::Value>,
  /// Failure message, present iff not `success`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_time_ms: Option<u64>,
  /// RFC 3339 completion time.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<String>,
}

impl CallOutcome {
  pub fn succeeded(spec: &CallSpec, data: serde_json::Value) -> Self {
    Self {
      success: true,
      target: spec.target.clone(),
      name: spec.name.clone(),
      data: Some(data),
      error: None,
      execution_time_ms: None,
      timestamp: None,
    }
  }

  pub fn failed(spec: &CallSpec, error: &CallError) -> Self {
    Self {
      success: false,
      target: spec.target.clone(),
      name: spec.name.clone(),
      data: None,
      error: Some(error.to_string()),
      execution_time_ms: None,
      timestamp: None,
    }
  }

  /// Attach execution metadata.
  pub fn with_metadata(mut self, elapsed: Duration, completed_at: DateTime<Utc>) -> Self {
    self.execution_time_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    self.timestamp = Some(completed_at.to_rfc3339_opts(SecondsFormat::Millis, true));
    self
  }
}

/// Outcomes of a run, in call order.
#[derive(Debug, Clone)]
pub struct RunResult {
  pub run_id: String,
  pub outcomes: Vec<CallOutcome>,
}
