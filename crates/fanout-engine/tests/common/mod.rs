//! A scripted in-memory `HttpClient` for engine tests.
//!
//! Each URL gets a list of steps. A request consumes the next step; the last
//! step repeats once the others are used up. Responses are delayed with
//! `tokio::time::sleep`, so tests can run on a paused clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fanout_http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use serde_json::Value;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub enum Reply {
  Json(Value),
  Status(u16),
  Error(String),
}

#[derive(Debug, Clone)]
pub struct Step {
  pub delay: Duration,
  pub reply: Reply,
}

impl Step {
  pub fn ok(data: Value) -> Self {
    Self {
      delay: Duration::ZERO,
      reply: Reply::Json(data),
    }
  }

  pub fn status(status: u16) -> Self {
    Self {
      delay: Duration::ZERO,
      reply: Reply::Status(status),
    }
  }

  pub fn error(message: &str) -> Self {
    Self {
      delay: Duration::ZERO,
      reply: Reply::Error(message.to_string()),
    }
  }

  pub fn after(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }
}

/// A request as the client saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
  pub url: String,
  pub headers: Vec<(String, String)>,
  pub body: Option<Value>,
  pub at: Instant,
}

impl Recorded {
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

pub struct ScriptedClient {
  scripts: Mutex<HashMap<String, Vec<Step>>>,
  requests: Mutex<Vec<Recorded>>,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
  started: Instant,
}

impl ScriptedClient {
  pub fn new() -> Self {
    Self {
      scripts: Mutex::new(HashMap::new()),
      requests: Mutex::new(Vec::new()),
      in_flight: AtomicUsize::new(0),
      max_in_flight: AtomicUsize::new(0),
      started: Instant::now(),
    }
  }

  pub fn script(self, url: &str, steps: Vec<Step>) -> Self {
    self.scripts.lock().unwrap().insert(url.to_string(), steps);
    self
  }

  pub fn requests(&self) -> Vec<Recorded> {
    self.requests.lock().unwrap().clone()
  }

  pub fn requests_to(&self, url: &str) -> Vec<Recorded> {
    self
      .requests()
      .into_iter()
      .filter(|r| r.url == url)
      .collect()
  }

  /// Offsets from client creation at which `url` was requested.
  pub fn attempt_offsets(&self, url: &str) -> Vec<Duration> {
    self
      .requests_to(url)
      .iter()
      .map(|r| r.at.duration_since(self.started))
      .collect()
  }

  pub fn max_in_flight(&self) -> usize {
    self.max_in_flight.load(Ordering::SeqCst)
  }

  fn next_step(&self, url: &str) -> Step {
    let mut scripts = self.scripts.lock().unwrap();
    match scripts.get_mut(url) {
      Some(steps) if steps.len() > 1 => steps.remove(0),
      Some(steps) if !steps.is_empty() => steps[0].clone(),
      _ => Step::status(404),
    }
  }
}

/// Decrements the in-flight count even when the request future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::SeqCst);
  }
}

#[async_trait]
impl HttpClient for ScriptedClient {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
    self.requests.lock().unwrap().push(Recorded {
      url: request.url.clone(),
      headers: request.headers.clone(),
      body: request.body.clone(),
      at: Instant::now(),
    });

    let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let _guard = InFlight(&self.in_flight);

    let step = self.next_step(&request.url);
    tokio::time::sleep(step.delay).await;

    match step.reply {
      Reply::Json(body) => Ok(HttpResponse { status: 200, body }),
      Reply::Status(status) => Ok(HttpResponse {
        status,
        body: Value::Null,
      }),
      Reply::Error(message) => Err(HttpError::Transport { message }),
    }
  }
}

/// Assert `actual` is `expected`, allowing for timer granularity.
#[track_caller]
pub fn assert_duration(actual: Duration, expected: Duration) {
  let tolerance = Duration::from_millis(5);
  assert!(
    actual >= expected && actual <= expected + tolerance,
    "expected about {:?}, got {:?}",
    expected,
    actual
  );
}

#[track_caller]
pub fn assert_offsets(actual: &[Duration], expected: &[Duration]) {
  assert_eq!(actual.len(), expected.len(), "attempts: {:?}", actual);
  for (a, e) in actual.iter().zip(expected) {
    assert_duration(*a, *e);
  }
}
