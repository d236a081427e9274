//! Fanout Normalizer
//!
//! Turns a [`fanout_config::SourceDef`] and the trigger items of a run into
//! the ordered list of [`fanout_call::CallSpec`] values the engine executes,
//! and folds run options into a [`fanout_call::RunPolicy`].
//!
//! All validation happens here, before any network activity.

mod error;
mod normalizer;

pub use error::NormalizeError;
pub use normalizer::{normalize, resolve_policy};
