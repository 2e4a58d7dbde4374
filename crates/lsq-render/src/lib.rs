//! # lsq-render
//!
//! Turns decoded Logseq replies into bounded, human-readable text.
//!
//! - [`outline`]: indented block trees
//! - [`formatter`]: page/journal/tag listings, search hits, backlinks, JSON dumps
//! - [`budget`]: the character budget every tool result is cut to

pub mod budget;
pub mod formatter;
pub mod outline;

pub use budget::{truncate_output, truncate_to, MAX_OUTPUT_CHARS};
pub use outline::render_outline;
