//! Request execution for a single call.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use fanout_call::{Auth, CallSpec};
use fanout_http::{HttpClient, HttpRequest};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::CallError;

/// Sends one attempt of a call and races it against the call's timeout.
///
/// When the timer (or cancellation) wins, the in-flight send future is
/// dropped, which closes the underlying connection.
#[derive(Clone)]
pub struct RequestExecutor {
  client: Arc<dyn HttpClient>,
}

impl RequestExecutor {
  pub fn new(client: Arc<dyn HttpClient>) -> Self {
    Self { client }
  }

  /// Execute one attempt of `spec`, returning the response body.
  pub async fn execute(
    &self,
    spec: &CallSpec,
    cancel: &CancellationToken,
  ) -> Result<serde_json::Value, CallError> {
    if cancel.is_cancelled() {
      return Err(CallError::Cancelled);
    }

    let request = build_request(spec);
    debug!(target_url = %spec.target, timeout_secs = spec.timeout_secs, "sending call");

    let result = tokio::select! {
      biased;
      _ = cancel.cancelled() => return Err(CallError::Cancelled),
      result = tokio::time::timeout(spec.timeout(), self.client.send(request)) => result,
    };

    let response = match result {
      Err(_elapsed) => {
        return Err(CallError::Timeout {
          seconds: spec.timeout_secs,
        });
      }
      Ok(Err(e)) if e.is_timeout() => {
        return Err(CallError::Timeout {
          seconds: spec.timeout_secs,
        });
      }
      Ok(Err(e)) => {
        return Err(CallError::Transport {
          message: e.to_string(),
          status: None,
        });
      }
      Ok(Ok(response)) => response,
    };

    if !response.is_success() {
      return Err(CallError::Transport {
        message: format!("request failed with status code {}", response.status),
        status: Some(response.status),
      });
    }

    Ok(response.body)
  }
}

/// Build the POST request for a call, auth headers included.
pub fn build_request(spec: &CallSpec) -> HttpRequest {
  let request = HttpRequest::post(&spec.target)
    .json(spec.payload.to_body())
    .timeout(spec.timeout());
  apply_auth(request, &spec.auth)
}

/// Add the headers for `auth`. Incomplete credentials add nothing.
fn apply_auth(request: HttpRequest, auth: &Auth) -> HttpRequest {
  match auth {
    Auth::None => request,
    Auth::Header {
      name,
      value: Some(value),
    } if !value.is_empty() => request.header(name.as_str(), value.as_str()),
    Auth::Bearer { token: Some(token) } if !token.is_empty() => {
      request.header("Authorization", format!("Bearer {}", token))
    }
    Auth::Basic {
      username: Some(username),
      password: Some(password),
    } => {
      let credentials = BASE64_STANDARD.encode(format!("{}:{}", username, password));
      request.header("Authorization", format!("Basic {}", credentials))
    }
    _ => request,
  }
}
