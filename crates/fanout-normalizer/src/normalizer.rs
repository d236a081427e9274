use fanout_call::{Auth, CallSpec, DEFAULT_API_KEY_HEADER, Payload, RunPolicy};
use fanout_config::{AuthDef, CallDef, CallEntryDef, CredentialsDef, OptionsDef, SourceDef};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::NormalizeError;

/// Selector key used when a source does not name one.
const DEFAULT_TARGET_FIELD: &str = "webhookUrl";

/// Header carrying the instance API key for workflow-id targets.
const WORKFLOW_API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Build the ordered call list for a run.
///
/// `items` are the trigger items the run was started with. `credentials`
/// are only consulted for entries that name a `workflowId` instead of a URL.
pub fn normalize(
  source: &SourceDef,
  items: &[Value],
  credentials: Option<&CredentialsDef>,
) -> Result<Vec<CallSpec>, NormalizeError> {
  let specs = match source {
    SourceDef::Simple {
      webhook_urls,
      pass_input_data,
    } => normalize_simple(webhook_urls, *pass_input_data, items),
    SourceDef::Structured { calls } => calls
      .iter()
      .enumerate()
      .map(|(index, call)| normalize_call_def(index, call))
      .collect::<Result<Vec<_>, _>>()?,
    SourceDef::Manual {
      entries,
      target_field,
    } => {
      let raw = parse_manual_entries(entries)?;
      normalize_entries(&raw, target_field, credentials)?
    }
    SourceDef::FromInput { field } => {
      let raw = collect_input_entries(items, field);
      normalize_entries(&raw, DEFAULT_TARGET_FIELD, credentials)?
    }
  };

  if specs.is_empty() {
    return Err(NormalizeError::NoCalls);
  }

  debug!(calls = specs.len(), "normalized call specs");
  Ok(specs)
}

/// Fold run options into a policy, applying defaults.
pub fn resolve_policy(options: &OptionsDef) -> RunPolicy {
  RunPolicy {
    continue_on_fail: options.continue_on_fail,
    max_concurrent: options.max_concurrent,
    aggregation: options.result_aggregation,
    include_metadata: options.include_metadata,
    global_timeout_secs: options
      .global_timeout_secs
      .filter(|secs| *secs > 0)
      .unwrap_or(RunPolicy::DEFAULT_GLOBAL_TIMEOUT_SECS),
  }
}

fn normalize_simple(webhook_urls: &str, pass_input_data: bool, items: &[Value]) -> Vec<CallSpec> {
  let payload = if pass_input_data {
    items.first().cloned().unwrap_or_else(|| json!({}))
  } else {
    json!({})
  };

  webhook_urls
    .lines()
    .map(str::trim)
    .filter(|url| !url.is_empty())
    .enumerate()
    .map(|(index, url)| {
      CallSpec::new(url, CallSpec::default_name(index)).with_payload(Payload::Json(payload.clone()))
    })
    .collect()
}

fn normalize_call_def(index: usize, def: &CallDef) -> Result<CallSpec, NormalizeError> {
  let target = non_blank(Some(&def.url)).ok_or(NormalizeError::MissingTarget { index })?;

  Ok(CallSpec {
    target: target.to_string(),
    name: non_blank(def.name.as_ref())
      .map(str::to_string)
      .unwrap_or_else(|| CallSpec::default_name(index)),
    payload: def.input_data.clone().map(Payload::from).unwrap_or_default(),
    timeout_secs: timeout_or_default(def.timeout_secs),
    retry_count: checked_retry_count(index, def.retry_count)?,
    auth: resolve_auth(&def.auth),
  })
}

fn normalize_entries(
  raw: &[Value],
  target_field: &str,
  credentials: Option<&CredentialsDef>,
) -> Result<Vec<CallSpec>, NormalizeError> {
  raw
    .iter()
    .enumerate()
    .map(|(index, value)| normalize_entry(index, value, target_field, credentials))
    .collect()
}

fn normalize_entry(
  index: usize,
  raw: &Value,
  target_field: &str,
  credentials: Option<&CredentialsDef>,
) -> Result<CallSpec, NormalizeError> {
  let Value::Object(object) = raw else {
    return Err(NormalizeError::InvalidEntry {
      index,
      message: format!("expected a JSON object, got {}", raw),
    });
  };

  let entry: CallEntryDef =
    serde_json::from_value(raw.clone()).map_err(|e| NormalizeError::InvalidEntry {
      index,
      message: e.to_string(),
    })?;

  let selected = object
    .get(target_field)
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty());
  let url = selected
    .or_else(|| non_blank(entry.webhook_url.as_ref()))
    .or_else(|| non_blank(entry.url.as_ref()));

  let (target, implicit_auth) = match (url, non_blank(entry.workflow_id.as_ref())) {
    (Some(url), _) => (url.to_string(), Auth::None),
    (None, Some(workflow_id)) => resolve_workflow(index, workflow_id, credentials)?,
    (None, None) => return Err(NormalizeError::MissingTarget { index }),
  };

  let name = non_blank(entry.execution_name.as_ref())
    .or_else(|| non_blank(entry.name.as_ref()))
    .map(str::to_string)
    .unwrap_or_else(|| CallSpec::default_name(index));

  Ok(CallSpec {
    target,
    name,
    payload: entry.input_data.map(Payload::from).unwrap_or_default(),
    timeout_secs: timeout_or_default(entry.timeout),
    retry_count: checked_retry_count(index, entry.retry_count)?,
    auth: entry.auth.as_ref().map(resolve_auth).unwrap_or(implicit_auth),
  })
}

/// Turn a workflow identifier into its webhook URL on the configured instance.
fn resolve_workflow(
  index: usize,
  workflow_id: &str,
  credentials: Option<&CredentialsDef>,
) -> Result<(String, Auth), NormalizeError> {
  let credentials = credentials.ok_or_else(|| NormalizeError::MissingCredentials {
    index,
    workflow_id: workflow_id.to_string(),
  })?;

  let target = format!(
    "{}/webhook/{}",
    credentials.base_url.trim_end_matches('/'),
    workflow_id
  );
  let auth = if credentials.api_key.is_empty() {
    Auth::None
  } else {
    Auth::Header {
      name: WORKFLOW_API_KEY_HEADER.to_string(),
      value: Some(credentials.api_key.clone()),
    }
  };

  Ok((target, auth))
}

fn parse_manual_entries(entries: &str) -> Result<Vec<Value>, NormalizeError> {
  if entries.trim().is_empty() {
    return Ok(Vec::new());
  }

  let parsed: Value =
    serde_json::from_str(entries).map_err(|e| NormalizeError::InvalidEntries {
      message: e.to_string(),
    })?;

  match parsed {
    Value::Array(values) => Ok(values),
    Value::Object(_) => Ok(vec![parsed]),
    other => Err(NormalizeError::InvalidEntries {
      message: format!("expected a JSON array or object, got {}", other),
    }),
  }
}

/// Gather call entries from `field` of every trigger item.
///
/// Arrays are flattened, single values appended, missing or falsy values skipped.
fn collect_input_entries(items: &[Value], field: &str) -> Vec<Value> {
  let mut entries = Vec::new();
  for item in items {
    match item.get(field) {
      Some(Value::Array(values)) => entries.extend(values.iter().cloned()),
      Some(Value::Null) | Some(Value::Bool(false)) | None => {}
      Some(Value::String(s)) if s.is_empty() => {}
      Some(value) => entries.push(value.clone()),
    }
  }
  entries
}

fn resolve_auth(def: &AuthDef) -> Auth {
  match def {
    AuthDef::None => Auth::None,
    AuthDef::Header { header_name, value } => Auth::Header {
      name: non_blank(header_name.as_ref())
        .unwrap_or(DEFAULT_API_KEY_HEADER)
        .to_string(),
      value: value.clone(),
    },
    AuthDef::Bearer { token } => Auth::Bearer {
      token: token.clone(),
    },
    AuthDef::Basic { username, password } => Auth::Basic {
      username: username.clone(),
      password: password.clone(),
    },
  }
}

fn timeout_or_default(timeout_secs: Option<u64>) -> u64 {
  timeout_secs
    .filter(|secs| *secs > 0)
    .unwrap_or(CallSpec::DEFAULT_TIMEOUT_SECS)
}

fn checked_retry_count(index: usize, retry_count: Option<u32>) -> Result<u32, NormalizeError> {
  match retry_count {
    Some(count) if count > CallSpec::MAX_RETRY_COUNT => Err(NormalizeError::RetryCountOutOfRange {
      index,
      retry_count: count,
      max: CallSpec::MAX_RETRY_COUNT,
    }),
    Some(count) => Ok(count),
    None => Ok(0),
  }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
  value.map(|s| s.trim()).filter(|s| !s.is_empty())
}
