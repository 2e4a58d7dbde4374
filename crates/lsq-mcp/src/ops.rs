//! The operation catalog: validate, call Logseq, render.
//!
//! Every operation validates its parameters before the first remote call and
//! returns untruncated text; callers apply the output budget.

use serde_json::Value;

use lsq_client::{query, CreatePageOptions, InsertBlockOptions, LogseqClient, MoveBlockOptions};
use lsq_core::error::{LsqError, RpcError};
use lsq_core::{Block, Page, Result};
use lsq_render::formatter::{
    render_journal_list, render_json, render_linked_references, render_page_list,
    render_search_hits, render_tag_list, render_tagged_pages,
};
use lsq_render::{render_outline, truncate_output};

use crate::params::{
    decode, BlockRequest, CreatePageRequest, GetBlockRequest, GetJournalRequest, InsertBlockRequest,
    ListJournalsRequest, ListPagesRequest, ListTagsRequest, MoveBlockRequest, PageRequest,
    PagesByTagRequest, RenamePageRequest, SearchRequest, UpdateBlockRequest, Validate,
};

/// Names of every operation, in catalog order.
pub const OPERATIONS: [&str; 17] = [
    "list_pages",
    "get_page",
    "get_page_content",
    "create_page",
    "delete_page",
    "rename_page",
    "get_linked_references",
    "get_block",
    "insert_block",
    "update_block",
    "remove_block",
    "move_block",
    "search",
    "list_journals",
    "get_journal",
    "list_tags",
    "get_pages_by_tag",
];

/// Run the operation `name` with raw JSON arguments and apply the output budget.
///
/// # Errors
///
/// Returns [`LsqError::UnknownOperation`] for names outside [`OPERATIONS`],
/// a validation error for bad arguments, or the remote failure.
pub async fn invoke(client: &LogseqClient, name: &str, args: Value) -> Result<String> {
    tracing::debug!(operation = name, "invoking operation");
    let text = match name {
        "list_pages" => list_pages(client, decode(args)?).await,
        "get_page" => get_page(client, decode(args)?).await,
        "get_page_content" => get_page_content(client, decode(args)?).await,
        "create_page" => create_page(client, decode(args)?).await,
        "delete_page" => delete_page(client, decode(args)?).await,
        "rename_page" => rename_page(client, decode(args)?).await,
        "get_linked_references" => get_linked_references(client, decode(args)?).await,
        "get_block" => get_block(client, decode(args)?).await,
        "insert_block" => insert_block(client, decode(args)?).await,
        "update_block" => update_block(client, decode(args)?).await,
        "remove_block" => remove_block(client, decode(args)?).await,
        "move_block" => move_block(client, decode(args)?).await,
        "search" => search(client, decode(args)?).await,
        "list_journals" => list_journals(client, decode(args)?).await,
        "get_journal" => get_journal(client, decode(args)?).await,
        "list_tags" => list_tags(client, decode(args)?).await,
        "get_pages_by_tag" => get_pages_by_tag(client, decode(args)?).await,
        other => Err(LsqError::UnknownOperation(other.to_string())),
    }?;
    Ok(truncate_output(text))
}

// === Pages ===

pub async fn list_pages(client: &LogseqClient, req: ListPagesRequest) -> Result<String> {
    req.validate()?;

    let all = client.get_all_pages().await?;
    let mut pages: Vec<&Page> = all
        .iter()
        .filter(|p| req.include_journals || !p.journal)
        .collect();
    pages.sort_by_cached_key(|p| p.display_name().to_lowercase());

    let total = pages.len();
    let offset = req.offset as usize;
    let window: Vec<&Page> = pages
        .into_iter()
        .skip(offset)
        .take(req.limit as usize)
        .collect();
    Ok(render_page_list(&window, offset, total))
}

pub async fn get_page(client: &LogseqClient, req: PageRequest) -> Result<String> {
    req.validate()?;

    let page = client
        .get_page(req.name.trim())
        .await?
        .ok_or_else(|| LsqError::page_not_found(req.name.trim()))?;
    render_json(&page)
}

pub async fn get_page_content(client: &LogseqClient, req: PageRequest) -> Result<String> {
    req.validate()?;
    let name = req.name.trim();

    let blocks = client
        .get_page_blocks_tree(name)
        .await?
        .ok_or_else(|| LsqError::page_not_found(name))?;
    if blocks.iter().all(is_blank_tree) {
        return Ok(format!("Page '{name}' has no content."));
    }
    Ok(render_outline(&blocks))
}

pub async fn create_page(client: &LogseqClient, req: CreatePageRequest) -> Result<String> {
    req.validate()?;
    let name = req.name.trim();

    let opts = CreatePageOptions {
        redirect: false,
        create_first_block: req.content.is_none(),
        format: req.format.map(|f| f.as_str().to_string()),
        journal: req.journal,
    };
    let page = client
        .create_page(name, req.properties.as_ref(), &opts)
        .await?
        .ok_or_else(|| RpcError::Remote {
            method: "logseq.Editor.createPage".to_string(),
            message: format!("page '{name}' was not created"),
        })?;

    let display = page.display_name().to_string();
    match &req.content {
        Some(content) => {
            client.append_block_in_page(&display, content).await?;
            Ok(format!("Created page '{display}' with initial content."))
        }
        None => Ok(format!("Created page '{display}'.")),
    }
}

pub async fn delete_page(client: &LogseqClient, req: PageRequest) -> Result<String> {
    req.validate()?;
    let name = req.name.trim();

    client.delete_page(name).await?;
    Ok(format!("Deleted page '{name}'."))
}

pub async fn rename_page(client: &LogseqClient, req: RenamePageRequest) -> Result<String> {
    req.validate()?;
    let (old_name, new_name) = (req.old_name.trim(), req.new_name.trim());

    client.rename_page(old_name, new_name).await?;
    Ok(format!("Renamed page '{old_name}' to '{new_name}'."))
}

pub async fn get_linked_references(client: &LogseqClient, req: PageRequest) -> Result<String> {
    req.validate()?;
    let name = req.name.trim();

    let refs = client.get_page_linked_references(name).await?;
    Ok(render_linked_references(name, &refs))
}

// === Blocks ===

pub async fn get_block(client: &LogseqClient, req: GetBlockRequest) -> Result<String> {
    req.validate()?;
    let uuid = req.uuid.trim();

    let block = client
        .get_block(uuid, req.include_children)
        .await?
        .ok_or_else(|| LsqError::block_not_found(uuid))?;
    render_json(&block)
}

pub async fn insert_block(client: &LogseqClient, req: InsertBlockRequest) -> Result<String> {
    req.validate()?;
    let target = req.target.trim();

    let opts = InsertBlockOptions {
        sibling: req.sibling,
        before: req.before,
        properties: req.properties.clone(),
    };
    let block = client
        .insert_block(target, &req.content, &opts)
        .await?
        .ok_or_else(|| RpcError::Remote {
            method: "logseq.Editor.insertBlock".to_string(),
            message: format!("no block was inserted at '{target}'"),
        })?;

    let placement = match (req.sibling, req.before) {
        (true, true) => "before",
        (true, false) => "after",
        (false, _) => "under",
    };
    let uuid = block.uuid.as_deref().unwrap_or("(unknown uuid)");
    Ok(format!("Inserted block {uuid} {placement} '{target}'."))
}

pub async fn update_block(client: &LogseqClient, req: UpdateBlockRequest) -> Result<String> {
    req.validate()?;
    let uuid = req.uuid.trim();

    client
        .update_block(uuid, &req.content, req.properties.as_ref())
        .await?;
    Ok(format!("Updated block {uuid}."))
}

pub async fn remove_block(client: &LogseqClient, req: BlockRequest) -> Result<String> {
    req.validate()?;
    let uuid = req.uuid.trim();

    client.remove_block(uuid).await?;
    Ok(format!("Removed block {uuid}."))
}

pub async fn move_block(client: &LogseqClient, req: MoveBlockRequest) -> Result<String> {
    req.validate()?;
    let (uuid, target) = (req.uuid.trim(), req.target_uuid.trim());

    let opts = MoveBlockOptions {
        before: req.before,
        children: req.as_child,
    };
    client.move_block(uuid, target, &opts).await?;

    let placement = if req.as_child {
        "under"
    } else if req.before {
        "before"
    } else {
        "after"
    };
    Ok(format!("Moved block {uuid} {placement} block {target}."))
}

// === Search, journals, tags ===

pub async fn search(client: &LogseqClient, req: SearchRequest) -> Result<String> {
    req.validate()?;

    let mut hits: Vec<Block> = client.pull_query(&query::content_search(&req.query)).await?;
    hits.truncate(req.limit as usize);
    Ok(render_search_hits(&req.query, &hits))
}

pub async fn list_journals(client: &LogseqClient, req: ListJournalsRequest) -> Result<String> {
    req.validate()?;

    let all = client.get_all_pages().await?;
    let mut journals: Vec<&Page> = all.iter().filter(|p| p.journal).collect();
    journals.sort_by(|a, b| b.journal_day.cmp(&a.journal_day));
    journals.truncate(req.limit as usize);
    Ok(render_journal_list(&journals))
}

pub async fn get_journal(client: &LogseqClient, req: GetJournalRequest) -> Result<String> {
    let day = req.journal_day()?;
    let date = req.date.trim();

    let pages: Vec<Page> = client.pull_query(&query::journal_by_day(day)).await?;
    let page = pages
        .into_iter()
        .next()
        .ok_or_else(|| LsqError::journal_not_found(date))?;
    let title = page.display_name().to_string();

    let blocks = client
        .get_page_blocks_tree(&page.name)
        .await?
        .unwrap_or_default();
    if blocks.iter().all(is_blank_tree) {
        return Ok(format!("Journal page '{title}' ({date}) has no content."));
    }
    Ok(format!("# {title} ({date})\n\n{}", render_outline(&blocks)))
}

pub async fn list_tags(client: &LogseqClient, req: ListTagsRequest) -> Result<String> {
    req.validate()?;

    let tags: Vec<Page> = client.pull_query(query::all_tags()).await?;
    let mut names: Vec<String> = tags
        .iter()
        .map(|t| t.display_name().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    names.sort_by_cached_key(|n| n.to_lowercase());
    names.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());
    names.truncate(req.limit as usize);
    Ok(render_tag_list(&names))
}

pub async fn get_pages_by_tag(client: &LogseqClient, req: PagesByTagRequest) -> Result<String> {
    req.validate()?;
    let tag = req.tag_name();

    let tagged: Vec<Page> = client.pull_query(&query::pages_by_tag(tag)).await?;
    let mut pages: Vec<&Page> = tagged.iter().collect();
    pages.sort_by_cached_key(|p| p.display_name().to_lowercase());
    pages.truncate(req.limit as usize);
    Ok(render_tagged_pages(tag, &pages))
}

fn is_blank_tree(block: &Block) -> bool {
    block.is_blank() && block.expanded_children().all(is_blank_tree)
}
