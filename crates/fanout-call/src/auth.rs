/// Header used for API key auth when none is configured.
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Resolved authentication for a call.
///
/// Missing credential fields are kept as `None`; the executor skips auth
/// it cannot complete rather than sending a half-built header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
  #[default]
  None,
  Header {
    name: String,
    value: Option<String>,
  },
  Bearer {
    token: Option<String>,
  },
  Basic {
    username: Option<String>,
    password: Option<String>,
  },
}
