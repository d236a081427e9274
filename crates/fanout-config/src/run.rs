use serde::{Deserialize, Serialize};

use crate::options::OptionsDef;
use crate::source::SourceDef;

/// A complete run file: a call source plus run options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDef {
  pub source: SourceDef,
  #[serde(default)]
  pub options: OptionsDef,
}
