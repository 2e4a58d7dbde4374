//! Listings, search hits, backlinks, and JSON dumps.

use serde::Serialize;

use lsq_core::error::LsqError;
use lsq_core::{Block, Page};

use crate::outline::render_outline;

/// Pretty-printed JSON of a decoded entity.
///
/// # Errors
///
/// Returns [`LsqError::Serialization`] if the value cannot be serialized.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, LsqError> {
    serde_json::to_string_pretty(value).map_err(|e| LsqError::Serialization(e.to_string()))
}

/// One page of a paginated page listing.
///
/// `offset` is the index of the first page in `pages` within `total`.
#[must_use]
pub fn render_page_list(pages: &[&Page], offset: usize, total: usize) -> String {
    if total == 0 {
        return "No pages found.".to_string();
    }
    if pages.is_empty() {
        return format!("No pages in range (offset {offset}, {total} pages total).");
    }

    let mut output = format!(
        "Pages {}-{} of {total}:\n",
        offset + 1,
        offset + pages.len()
    );
    let lines: Vec<String> = pages.iter().map(|p| page_line(p)).collect();
    output.push_str(&lines.join("\n"));
    output
}

/// Journal pages, in the order given (callers sort newest first).
#[must_use]
pub fn render_journal_list(pages: &[&Page]) -> String {
    if pages.is_empty() {
        return "No journal pages found.".to_string();
    }

    let mut output = format!("{} journal pages (newest first):\n", pages.len());
    let lines: Vec<String> = pages
        .iter()
        .map(|p| match p.journal_date() {
            Some(date) if date != p.display_name() => format!("- {} ({date})", p.display_name()),
            _ => format!("- {}", p.display_name()),
        })
        .collect();
    output.push_str(&lines.join("\n"));
    output
}

/// Tag names, in the order given.
#[must_use]
pub fn render_tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags found.".to_string();
    }

    let mut output = format!("{} tags:\n", tags.len());
    let lines: Vec<String> = tags.iter().map(|t| format!("- {t}")).collect();
    output.push_str(&lines.join("\n"));
    output
}

/// Pages carrying `tag`.
#[must_use]
pub fn render_tagged_pages(tag: &str, pages: &[&Page]) -> String {
    if pages.is_empty() {
        return format!("No pages tagged '{tag}'.");
    }

    let mut output = format!("{} pages tagged '{tag}':\n", pages.len());
    let lines: Vec<String> = pages.iter().map(|p| page_line(p)).collect();
    output.push_str(&lines.join("\n"));
    output
}

/// Blocks matching a search, one line each with the owning page and UUID.
#[must_use]
pub fn render_search_hits(query: &str, hits: &[Block]) -> String {
    if hits.is_empty() {
        return format!("No blocks matching '{query}'.");
    }

    let mut output = format!("{} blocks matching '{query}':\n", hits.len());
    let lines: Vec<String> = hits
        .iter()
        .map(|hit| {
            let text = hit.content.split_whitespace().collect::<Vec<_>>().join(" ");
            let mut context = Vec::new();
            if let Some(page) = hit.page.as_ref().and_then(|p| p.display_name()) {
                context.push(format!("page: {page}"));
            }
            if let Some(uuid) = &hit.uuid {
                context.push(format!("uuid: {uuid}"));
            }
            if context.is_empty() {
                format!("- {text}")
            } else {
                format!("- {text} ({})", context.join(", "))
            }
        })
        .collect();
    output.push_str(&lines.join("\n"));
    output
}

/// Backlinks to `target`, one section per referencing page.
#[must_use]
pub fn render_linked_references(target: &str, refs: &[(Page, Vec<Block>)]) -> String {
    if refs.is_empty() {
        return format!("No linked references to '{target}'.");
    }

    let total: usize = refs.iter().map(|(_, blocks)| blocks.len()).sum();
    let mut sections = vec![format!(
        "{total} linked references to '{target}' from {} pages:",
        refs.len()
    )];
    for (page, blocks) in refs {
        sections.push(format!(
            "## {}\n{}",
            page.display_name(),
            render_outline(blocks)
        ));
    }
    sections.join("\n\n")
}

fn page_line(page: &Page) -> String {
    if page.journal {
        format!("- {} [journal]", page.display_name())
    } else {
        format!("- {}", page.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsq_core::EntityRef;

    fn page(name: &str, journal: bool) -> Page {
        Page {
            name: name.to_lowercase(),
            original_name: Some(name.to_string()),
            journal,
            ..Default::default()
        }
    }

    #[test]
    fn page_list_has_range_header_and_journal_marker() {
        let a = page("Alpha", false);
        let b = page("Jan 1st, 2024", true);
        let out = render_page_list(&[&a, &b], 10, 42);
        assert_eq!(
            out,
            "Pages 11-12 of 42:\n- Alpha\n- Jan 1st, 2024 [journal]"
        );
    }

    #[test]
    fn page_list_empty_cases() {
        assert_eq!(render_page_list(&[], 0, 0), "No pages found.");
        assert_eq!(
            render_page_list(&[], 50, 3),
            "No pages in range (offset 50, 3 pages total)."
        );
    }

    #[test]
    fn journal_list_shows_iso_date() {
        let mut p = page("Jan 15th, 2024", true);
        p.journal_day = Some(20240115);
        assert_eq!(
            render_journal_list(&[&p]),
            "1 journal pages (newest first):\n- Jan 15th, 2024 (2024-01-15)"
        );
    }

    #[test]
    fn search_hits_flatten_content_and_name_page() {
        let mut hit = Block::with_content("first line\n  second line");
        hit.uuid = Some("65a1b2c3-0000-4000-8000-000000000001".to_string());
        hit.page = Some(EntityRef {
            original_name: Some("Projects".to_string()),
            ..Default::default()
        });
        assert_eq!(
            render_search_hits("line", &[hit]),
            "1 blocks matching 'line':\n- first line second line \
             (page: Projects, uuid: 65a1b2c3-0000-4000-8000-000000000001)"
        );
        assert_eq!(render_search_hits("zzz", &[]), "No blocks matching 'zzz'.");
    }

    #[test]
    fn linked_references_group_by_page() {
        let refs = vec![(
            page("Daily", false),
            vec![Block::with_content("see [[Target]]")
                .with_children(vec![Block::with_content("detail")])],
        )];
        assert_eq!(
            render_linked_references("Target", &refs),
            "1 linked references to 'Target' from 1 pages:\n\n## Daily\n- see [[Target]]\n  - detail"
        );
    }

    #[test]
    fn json_dump_is_pretty() {
        let out = render_json(&page("Alpha", false)).unwrap();
        assert!(out.contains("\n  \"originalName\": \"Alpha\""));
    }

    #[test]
    fn tags_and_tagged_pages() {
        assert_eq!(
            render_tag_list(&["rust".to_string(), "go".to_string()]),
            "2 tags:\n- rust\n- go"
        );
        let p = page("Ferris", false);
        assert_eq!(
            render_tagged_pages("rust", &[&p]),
            "1 pages tagged 'rust':\n- Ferris"
        );
    }
}
