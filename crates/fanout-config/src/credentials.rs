use serde::{Deserialize, Serialize};

/// API key and base URL of the instance hosting the target workflows.
///
/// Only used to turn a bare `workflowId` into a webhook URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsDef {
  pub api_key: String,
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

fn default_base_url() -> String {
  "http://localhost:5678".to_string()
}
