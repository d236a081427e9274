use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use crate::error::HttpError;

/// Schemes calls may be sent to.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// An outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
  pub method: Method,
  pub url: String,
  pub headers: Vec<(String, String)>,
  pub body: Option<serde_json::Value>,
  pub timeout: Option<Duration>,
}

impl HttpRequest {
  /// A POST request with no headers and no body.
  pub fn post(url: impl Into<String>) -> Self {
    Self {
      method: Method::POST,
      url: url.into(),
      headers: Vec::new(),
      body: None,
      timeout: None,
    }
  }

  /// Set a header, replacing an earlier value with the same (case-insensitive) name.
  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    let name = name.into();
    self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
    self.headers.push((name, value.into()));
    self
  }

  pub fn json(mut self, body: serde_json::Value) -> Self {
    self.body = Some(body);
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Look up a header value by case-insensitive name.
  pub fn header_value(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// A received response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
  pub status: u16,
  /// Body parsed as JSON, or a JSON string if it is not JSON. Empty bodies are `null`.
  pub body: serde_json::Value,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// The "send a request" capability.
///
/// Implementations report transport failures as errors and return every
/// received response, whatever its status.
#[async_trait]
pub trait HttpClient: Send + Sync {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// [`HttpClient`] backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
  client: Client,
}

impl ReqwestClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Wrap an already configured `reqwest` client.
  pub fn with_client(client: Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl HttpClient for ReqwestClient {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
    let url = parse_url(&request.url)?;

    debug!(method = %request.method, url = %url, "sending request");

    let mut builder = self.client.request(request.method, url);

    for (key, value) in &request.headers {
      builder = builder.header(key, value);
    }

    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    if let Some(timeout) = request.timeout {
      builder = builder.timeout(timeout);
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let text = response.text().await?;

    Ok(HttpResponse {
      status,
      body: parse_body(text),
    })
  }
}

fn parse_url(raw: &str) -> Result<Url, HttpError> {
  let url = Url::parse(raw).map_err(|e| HttpError::InvalidUrl {
    url: raw.to_string(),
    message: e.to_string(),
  })?;

  if !ALLOWED_SCHEMES.contains(&url.scheme()) {
    return Err(HttpError::UnsupportedScheme {
      scheme: url.scheme().to_string(),
    });
  }

  Ok(url)
}

/// Try to parse body as JSON, fall back to string.
fn parse_body(text: String) -> serde_json::Value {
  if text.trim().is_empty() {
    return serde_json::Value::Null;
  }
  serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_replaces_case_insensitively() {
    let request = HttpRequest::post("https://a.example")
      .header("authorization", "one")
      .header("Authorization", "two");

    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.header_value("AUTHORIZATION"), Some("two"));
  }

  #[test]
  fn test_parse_url_rejects_other_schemes() {
    assert!(parse_url("https://a.example/hook").is_ok());
    assert!(matches!(
      parse_url("ftp://a.example/file"),
      Err(HttpError::UnsupportedScheme { ref scheme }) if scheme == "ftp"
    ));
    assert!(matches!(
      parse_url("not a url"),
      Err(HttpError::InvalidUrl { .. })
    ));
  }

  #[test]
  fn test_parse_body() {
    assert_eq!(parse_body(String::new()), serde_json::Value::Null);
    assert_eq!(parse_body("{\"ok\":true}".to_string()), serde_json::json!({"ok": true}));
    assert_eq!(parse_body("plain".to_string()), serde_json::json!("plain"));
  }
}
