//! # lsq-core
//!
//! Core types shared by every lsq crate.
//!
//! The remote Logseq application owns the data model; this crate only
//! describes the JSON shapes the bridge consumes:
//! - [`Page`]: a named document in the graph
//! - [`Block`]: a node of hierarchical page content
//! - [`EntityRef`]: a link to another entity (`{id}` plus whatever the remote expanded)
//! - Error hierarchy ([`LsqError`], [`ValidationError`], [`RpcError`])

pub mod block;
pub mod error;
pub mod page;

pub use block::{Block, BlockChild};
pub use error::{LsqError, Result, RpcError, ValidationError};
pub use page::{EntityRef, Page};
