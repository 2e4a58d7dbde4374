//! # lsq-mcp
//!
//! MCP (Model Context Protocol) server for a running Logseq graph.
//!
//! Exposes the graph as MCP tools:
//! - pages: `list_pages`, `get_page`, `get_page_content`, `create_page`,
//!   `delete_page`, `rename_page`, `get_linked_references`
//! - blocks: `get_block`, `insert_block`, `update_block`, `remove_block`,
//!   `move_block`
//! - discovery: `search`, `list_journals`, `get_journal`, `list_tags`,
//!   `get_pages_by_tag`
//!
//! Every tool validates its arguments before talking to Logseq and caps its
//! text result at [`lsq_render::MAX_OUTPUT_CHARS`] characters.

pub mod ops;
pub mod params;
pub mod tools;

pub use ops::{invoke, OPERATIONS};
pub use tools::LsqMcpService;
