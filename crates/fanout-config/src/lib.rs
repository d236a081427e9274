//! Fanout Config
//!
//! This crate contains the serializable run configuration types for fanout.
//! These types describe where call descriptors come from and how a run should
//! behave, before they are normalized into call specifications.
//!
//! Configuration can be loaded from:
//! - JSON run files (via CLI with `fanout run run.json`)
//! - Trigger payloads (the `from_input` source reads calls out of them)
//!
//! The normalizer takes these types, validates them, and produces the
//! `CallSpec` list and `RunPolicy` the engine executes.

mod call;
mod credentials;
mod enums;
mod options;
mod run;
mod source;

pub use call::{AuthDef, CallDef, CallEntryDef};
pub use credentials::CredentialsDef;
pub use enums::Aggregation;
pub use options::OptionsDef;
pub use run::RunDef;
pub use source::SourceDef;
