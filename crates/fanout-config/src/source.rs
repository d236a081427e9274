use serde::{Deserialize, Serialize};

use crate::call::CallDef;

/// Where the call descriptors of a run come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceDef {
  /// A newline separated list of webhook URLs sharing one payload.
  Simple {
    webhook_urls: String,
    /// Send the first trigger item as the body of every call.
    #[serde(default = "default_true")]
    pass_input_data: bool,
  },
  /// Calls declared in the run file, each with its own auth and limits.
  Structured { calls: Vec<CallDef> },
  /// Free-form JSON text holding an array (or a single object) of call entries.
  Manual {
    entries: String,
    /// Key of each entry that holds the call target.
    #[serde(default = "default_target_field")]
    target_field: String,
  },
  /// Call entries carried by the trigger items under `field`.
  FromInput {
    #[serde(default = "default_input_field")]
    field: String,
  },
}

fn default_true() -> bool {
  true
}

fn default_target_field() -> String {
  "webhookUrl".to_string()
}

fn default_input_field() -> String {
  "workflows".to_string()
}
