use thiserror::Error;

/// Errors that can occur while sending an HTTP request.
#[derive(Debug, Error)]
pub enum HttpError {
  /// The request URL could not be parsed.
  #[error("invalid url '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  /// The URL scheme is not allowed.
  #[error("unsupported url scheme: {scheme}")]
  UnsupportedScheme { scheme: String },

  /// The underlying client failed.
  #[error("http error: {0}")]
  Request(#[from] reqwest::Error),

  /// Transport failure reported by a non-reqwest client.
  #[error("{message}")]
  Transport { message: String },
}

impl HttpError {
  /// Whether the client gave up because its own timeout elapsed.
  pub fn is_timeout(&self) -> bool {
    matches!(self, HttpError::Request(e) if e.is_timeout())
  }
}
