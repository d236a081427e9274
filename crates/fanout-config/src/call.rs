use serde::{Deserialize, Serialize};

/// Authentication applied to a single call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDef {
  #[default]
  None,
  /// A custom header carrying an API key. The header name defaults to `X-API-Key`.
  Header {
    #[serde(default, alias = "headerName", skip_serializing_if = "Option::is_none")]
    header_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
  },
  Bearer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
  },
  Basic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
  },
}

/// A call declared directly in a run file (the `structured` source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallDef {
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Request body. A JSON string is treated as text and parsed at send time.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub input_data: Option<serde_json::Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub retry_count: Option<u32>,
  #[serde(default)]
  pub auth: AuthDef,
}

/// A loosely-typed call entry read from free-form JSON or trigger items.
///
/// Keys follow the camelCase shape webhook senders usually produce. The
/// target may also live under a caller-chosen selector key, which the
/// normalizer reads from the raw object before falling back to
/// `webhookUrl`, `url` or `workflowId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEntryDef {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub webhook_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub input_data: Option<serde_json::Value>,
  /// Per-call timeout in seconds.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub retry_count: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub auth: Option<AuthDef>,
}
