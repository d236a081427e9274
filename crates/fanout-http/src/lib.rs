//! Fanout HTTP
//!
//! The HTTP capability consumed by the fanout engine. The engine only needs
//! "send a request, get a status and body or an error", expressed by the
//! [`HttpClient`] trait. [`ReqwestClient`] is the production implementation;
//! tests substitute their own.

mod client;
mod error;

pub use client::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use error::HttpError;
pub use reqwest::Method;
