//! MCP tool definitions for Logseq graph operations.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use lsq_client::LogseqClient;
use lsq_core::error::LsqError;

use crate::ops;
use crate::params::{
    BlockRequest, CreatePageRequest, GetBlockRequest, GetJournalRequest, InsertBlockRequest,
    ListJournalsRequest, ListPagesRequest, ListTagsRequest, MoveBlockRequest, PageRequest,
    PagesByTagRequest, RawArgs, RenamePageRequest, SearchRequest, UpdateBlockRequest,
};

/// MCP server backed by a Logseq client.
#[derive(Debug, Clone)]
pub struct LsqMcpService {
    client: LogseqClient,
    tool_router: ToolRouter<Self>,
}

impl LsqMcpService {
    pub fn new(client: LogseqClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    async fn run<T>(&self, tool: &str, args: RawArgs<T>) -> Result<CallToolResult, McpError> {
        let outcome = ops::invoke(&self.client, tool, args.into_value()).await;
        respond(tool, outcome)
    }
}

/// Map an operation outcome to a tool result.
///
/// Every failure, including malformed arguments, is reported in-band with
/// `is_error` set.
fn respond(tool: &str, outcome: Result<String, LsqError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => {
            tracing::warn!(tool, error = %e, "tool call failed");
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}

#[tool_router]
impl LsqMcpService {
    // === Pages ===

    #[tool(
        description = "List pages in the graph, sorted by name. Journal pages are excluded unless include_journals is true."
    )]
    async fn list_pages(
        &self,
        Parameters(args): Parameters<RawArgs<ListPagesRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("list_pages", args).await
    }

    #[tool(description = "Get a page's metadata (name, properties, journal flag) as JSON")]
    async fn get_page(
        &self,
        Parameters(args): Parameters<RawArgs<PageRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_page", args).await
    }

    #[tool(description = "Get a page's content as an indented outline of its blocks")]
    async fn get_page_content(
        &self,
        Parameters(args): Parameters<RawArgs<PageRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_page_content", args).await
    }

    #[tool(description = "Create a page, optionally with properties and a first block of content")]
    async fn create_page(
        &self,
        Parameters(args): Parameters<RawArgs<CreatePageRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("create_page", args).await
    }

    #[tool(description = "Delete a page and all of its blocks")]
    async fn delete_page(
        &self,
        Parameters(args): Parameters<RawArgs<PageRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("delete_page", args).await
    }

    #[tool(description = "Rename a page; references to it are updated by Logseq")]
    async fn rename_page(
        &self,
        Parameters(args): Parameters<RawArgs<RenamePageRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("rename_page", args).await
    }

    #[tool(description = "List blocks on other pages that link to the given page")]
    async fn get_linked_references(
        &self,
        Parameters(args): Parameters<RawArgs<PageRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_linked_references", args).await
    }

    // === Blocks ===

    #[tool(
        description = "Get a block by UUID as JSON, with its children unless include_children is false"
    )]
    async fn get_block(
        &self,
        Parameters(args): Parameters<RawArgs<GetBlockRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_block", args).await
    }

    #[tool(
        description = "Insert a block as the last child of a target block or page, or next to a block when sibling is true"
    )]
    async fn insert_block(
        &self,
        Parameters(args): Parameters<RawArgs<InsertBlockRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("insert_block", args).await
    }

    #[tool(description = "Replace a block's content, optionally setting properties")]
    async fn update_block(
        &self,
        Parameters(args): Parameters<RawArgs<UpdateBlockRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("update_block", args).await
    }

    #[tool(description = "Remove a block and its children")]
    async fn remove_block(
        &self,
        Parameters(args): Parameters<RawArgs<BlockRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("remove_block", args).await
    }

    #[tool(description = "Move a block next to another block, or under it when as_child is true")]
    async fn move_block(
        &self,
        Parameters(args): Parameters<RawArgs<MoveBlockRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("move_block", args).await
    }

    // === Discovery ===

    #[tool(description = "Find blocks whose content contains the query text (case-sensitive)")]
    async fn search(
        &self,
        Parameters(args): Parameters<RawArgs<SearchRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("search", args).await
    }

    #[tool(description = "List journal pages, newest first")]
    async fn list_journals(
        &self,
        Parameters(args): Parameters<RawArgs<ListJournalsRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("list_journals", args).await
    }

    #[tool(description = "Get the journal page for a date (YYYY-MM-DD) as an outline")]
    async fn get_journal(
        &self,
        Parameters(args): Parameters<RawArgs<GetJournalRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_journal", args).await
    }

    #[tool(description = "List tags used in the graph, sorted by name")]
    async fn list_tags(
        &self,
        Parameters(args): Parameters<RawArgs<ListTagsRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("list_tags", args).await
    }

    #[tool(description = "List pages carrying a tag (with or without the leading '#')")]
    async fn get_pages_by_tag(
        &self,
        Parameters(args): Parameters<RawArgs<PagesByTagRequest>>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_pages_by_tag", args).await
    }
}

#[tool_handler]
impl ServerHandler for LsqMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Logseq graph server. List, read, create, rename, and delete pages; \
                 read and edit blocks by UUID; search block content; browse journals and tags. \
                 Block UUIDs appear in search results and JSON dumps."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
