//! Fanout Engine
//!
//! This crate runs a list of normalized calls in parallel, with per-call
//! timeouts, bounded retries, an optional concurrency cap and a global
//! deadline, and shapes the outcomes into the run's output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FanoutEngine                          │
//! │  - execute(specs, policy, cancel) → AggregateResult         │
//! │  - run ids, run-level events                                │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Scheduler                            │
//! │  - unbounded fan-out under the global timeout               │
//! │  - or sequential batches of max_concurrent calls            │
//! │  - outcomes kept in call order                              │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RetryController                         │
//! │  - retry_count + 1 attempts, 2^k second backoff             │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RequestExecutor                         │
//! │  - one POST via HttpClient, auth applied                    │
//! │  - raced against the per-call timeout                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use fanout_engine::FanoutEngine;
//! use fanout_http::ReqwestClient;
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = FanoutEngine::new(Arc::new(ReqwestClient::new()));
//! let result = engine.execute(specs, &policy, CancellationToken::new()).await?;
//! for record in result.into_records() {
//!     println!("{}", record);
//! }
//! ```

mod aggregate;
mod engine;
mod error;
mod events;
mod executor;
mod result;
mod retry;
mod scheduler;

pub use aggregate::{AggregateResult, RunSummary, aggregate};
pub use engine::FanoutEngine;
pub use error::{CallError, RunError};
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use executor::{RequestExecutor, build_request};
pub use result::{CallOutcome, RunResult};
pub use retry::{CallContext, RetryController, RetryOutcome, backoff_delay};
pub use scheduler::Scheduler;
