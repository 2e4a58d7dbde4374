//! # lsq-client
//!
//! Remote-call adapter for the Logseq HTTP API.
//!
//! Logseq exposes a single endpoint, `POST /api`, taking
//! `{"method": "...", "args": [...]}` and a bearer token. This crate:
//! - [`ClientConfig`]: base URL, token, and request timeout
//! - [`RpcTransport`]: one remote call, `(method, args) -> JSON`
//! - [`HttpTransport`]: the `reqwest` implementation with a bounded timeout
//! - [`LogseqClient`]: typed facade, one method per remote method
//! - [`query`]: datascript query builders with string escaping

pub mod client;
pub mod config;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod query;
pub mod transport;

pub use client::{
    CreatePageOptions, InsertBlockOptions, LinkedReference, LogseqClient, MoveBlockOptions,
};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use transport::{HttpTransport, RpcTransport};
