//! Shaping ordered call outcomes into the run's output.

use fanout_call::{Aggregation, RunPolicy};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::result::CallOutcome;

/// Counts and timing across a run's outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
  pub total_executions: usize,
  pub successful: usize,
  pub failed: usize,
  /// Sum of per-call execution times. Zero when timing was not recorded.
  pub total_time_ms: u64,
}

impl RunSummary {
  pub fn from_outcomes(outcomes: &[CallOutcome]) -> Self {
    let successful = outcomes.iter().filter(|o| o.success).count();
    Self {
      total_executions: outcomes.len(),
      successful,
      failed: outcomes.len() - successful,
      total_time_ms: outcomes
        .iter()
        .filter_map(|o| o.execution_time_ms)
        .fold(0u64, u64::saturating_add),
    }
  }
}

/// The aggregated output of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
  /// A single output record.
  Single(Map<String, Value>),
  /// One record per outcome, in call order.
  Items(Vec<CallOutcome>),
}

impl AggregateResult {
  /// The output records as JSON values.
  pub fn into_records(self) -> Vec<Value> {
    match self {
      AggregateResult::Single(record) => vec![Value::Object(record)],
      AggregateResult::Items(outcomes) => outcomes.iter().map(outcome_value).collect(),
    }
  }
}

/// Shape `outcomes` according to the policy's aggregation mode.
pub fn aggregate(outcomes: Vec<CallOutcome>, policy: &RunPolicy) -> AggregateResult {
  let summary = policy
    .include_metadata
    .then(|| RunSummary::from_outcomes(&outcomes));

  let mut record = match policy.aggregation {
    Aggregation::Items => return AggregateResult::Items(outcomes),
    Aggregation::Array => {
      let mut record = Map::new();
      record.insert(
        "results".to_string(),
        Value::Array(outcomes.iter().map(outcome_value).collect()),
      );
      record
    }
    Aggregation::Object => outcomes
      .iter()
      .map(|o| (o.name.clone(), outcome_value(o)))
      .collect(),
    Aggregation::Merged => merge_data(outcomes),
  };

  if let Some(summary) = summary {
    record.insert("summary".to_string(), summary_value(&summary));
  }

  AggregateResult::Single(record)
}

/// Shallow merge of the object-valued data of successful outcomes.
/// Later outcomes overwrite earlier keys.
fn merge_data(outcomes: Vec<CallOutcome>) -> Map<String, Value> {
  let mut merged = Map::new();
  for outcome in outcomes.into_iter().filter(|o| o.success) {
    if let Some(Value::Object(data)) = outcome.data {
      merged.extend(data);
    }
  }
  merged
}

fn outcome_value(outcome: &CallOutcome) -> Value {
  serde_json::to_value(outcome).unwrap_or(Value::Null)
}

fn summary_value(summary: &RunSummary) -> Value {
  serde_json::to_value(summary).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::CallError;
  use fanout_call::CallSpec;
  use serde_json::json;
  use std::time::Duration;

  fn ok(name: &str, data: Value) -> CallOutcome {
    CallOutcome::succeeded(&CallSpec::new(format!("https://{}.example", name), name), data)
  }

  fn failed(name: &str) -> CallOutcome {
    CallOutcome::failed(
      &CallSpec::new(format!("https://{}.example", name), name),
      &CallError::Transport {
        message: "request failed with status code 500".to_string(),
        status: Some(500),
      },
    )
  }

  fn policy(aggregation: Aggregation, include_metadata: bool) -> RunPolicy {
    RunPolicy {
      aggregation,
      include_metadata,
      ..RunPolicy::default()
    }
  }

  #[test]
  fn test_array_wraps_outcomes_in_results() {
    let result = aggregate(
      vec![ok("A", json!(1)), failed("B")],
      &policy(Aggregation::Array, false),
    );

    assert_eq!(
      result.into_records(),
      vec![json!({
        "results": [
          { "success": true, "target": "https://A.example", "name": "A", "data": 1 },
          {
            "success": false,
            "target": "https://B.example",
            "name": "B",
            "error": "request failed with status code 500"
          }
        ]
      })]
    );
  }

  #[test]
  fn test_object_keeps_last_outcome_for_duplicate_names() {
    let result = aggregate(
      vec![ok("A", json!("first")), ok("A", json!("second"))],
      &policy(Aggregation::Object, false),
    );

    let records = result.into_records();
    assert_eq!(records.len(), 1);
    let record = records[0].as_object().unwrap();
    assert_eq!(record.len(), 1);
    assert_eq!(record["A"]["data"], json!("second"));
  }

  #[test]
  fn test_object_keys_follow_call_order() {
    let result = aggregate(
      vec![ok("zeta", json!(1)), ok("alpha", json!(2)), ok("mid", json!(3))],
      &policy(Aggregation::Object, true),
    );

    let records = result.into_records();
    let keys: Vec<&str> = records[0]
      .as_object()
      .unwrap()
      .keys()
      .map(String::as_str)
      .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid", "summary"]);
  }

  #[test]
  fn test_merged_overwrites_in_order_and_skips_failures() {
    let result = aggregate(
      vec![
        ok("A", json!({ "a": 1 })),
        failed("B"),
        ok("C", json!({ "a": 2, "b": 3 })),
      ],
      &policy(Aggregation::Merged, false),
    );

    assert_eq!(result.into_records(), vec![json!({ "a": 2, "b": 3 })]);
  }

  #[test]
  fn test_merged_ignores_non_object_data() {
    let result = aggregate(
      vec![
        ok("A", json!([1, 2])),
        ok("B", json!("text")),
        ok("C", Value::Null),
        ok("D", json!({ "d": true })),
      ],
      &policy(Aggregation::Merged, false),
    );

    assert_eq!(result.into_records(), vec![json!({ "d": true })]);
  }

  #[test]
  fn test_items_yields_one_record_per_outcome_without_summary() {
    let result = aggregate(
      vec![ok("A", json!(1)), failed("B")],
      &policy(Aggregation::Items, true),
    );

    let records = result.into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], json!("A"));
    assert_eq!(records[1]["success"], json!(false));
    assert!(records.iter().all(|r| r.get("summary").is_none()));
  }

  #[test]
  fn test_summary_attached_with_metadata() {
    let now = chrono::Utc::now();
    let result = aggregate(
      vec![
        ok("A", json!({ "a": 1 })).with_metadata(Duration::from_millis(120), now),
        failed("B").with_metadata(Duration::from_millis(80), now),
      ],
      &policy(Aggregation::Merged, true),
    );

    assert_eq!(
      result.into_records(),
      vec![json!({
        "a": 1,
        "summary": { "totalExecutions": 2, "successful": 1, "failed": 1, "totalTimeMs": 200 }
      })]
    );
  }
}
