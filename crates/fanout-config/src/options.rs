use serde::{Deserialize, Serialize};

use crate::enums::Aggregation;

/// Run-wide options as they appear in a run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsDef {
  #[serde(default = "default_true")]
  pub continue_on_fail: bool,
  #[serde(default)]
  pub result_aggregation: Aggregation,
  /// Maximum calls in flight at once. `0` means unbounded.
  #[serde(default)]
  pub max_concurrent: usize,
  #[serde(default)]
  pub include_metadata: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub global_timeout_secs: Option<u64>,
}

impl Default for OptionsDef {
  fn default() -> Self {
    Self {
      continue_on_fail: true,
      result_aggregation: Aggregation::default(),
      max_concurrent: 0,
      include_metadata: false,
      global_timeout_secs: None,
    }
  }
}

fn default_true() -> bool {
  true
}
