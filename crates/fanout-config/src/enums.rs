use serde::{Deserialize, Serialize};

/// Output shape produced from the ordered list of call outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
  /// One record holding every outcome under `results`.
  #[default]
  Array,
  /// One record keyed by call name.
  Object,
  /// One record built from the merged data of successful calls.
  Merged,
  /// One record per outcome.
  Items,
}
