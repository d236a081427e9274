//! Fanout Call
//!
//! This crate provides the normalized call representation for fanout.
//! A [`CallSpec`] is the validated, defaulted form of one configured call,
//! ready to be handed to the engine.
//!
//! Key differences from `fanout-config`:
//! - Every field has its final value (names, timeouts, retry counts)
//! - Targets are resolved to addresses (no bare workflow identifiers)
//! - Run options are folded into a single [`RunPolicy`]

mod auth;
mod payload;
mod policy;
mod spec;

pub use auth::{Auth, DEFAULT_API_KEY_HEADER};
pub use fanout_config::Aggregation;
pub use payload::Payload;
pub use policy::RunPolicy;
pub use spec::CallSpec;
