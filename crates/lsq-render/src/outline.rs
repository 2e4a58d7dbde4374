//! Indented outline rendering for block trees.

use lsq_core::Block;

const INDENT: &str = "  ";

/// Render a block forest as a Markdown-style outline.
///
/// One `- content` line per block, two spaces of indent per depth level.
/// Blank blocks produce no line of their own, but their children are still
/// rendered one level deeper, as if the blank block's line were there.
/// Continuation lines of multi-line content align under the text after `- `;
/// lines never carry trailing whitespace, so a blank line inside content
/// renders empty.
#[must_use]
pub fn render_outline(blocks: &[Block]) -> String {
    let mut lines = Vec::new();
    for block in blocks {
        push_block(block, 0, &mut lines);
    }
    lines.join("\n")
}

fn push_block(block: &Block, depth: usize, lines: &mut Vec<String>) {
    if !block.is_blank() {
        let indent = INDENT.repeat(depth);
        let mut content = block.content.trim_end().lines();
        if let Some(first) = content.next() {
            lines.push(format!("{indent}- {}", first.trim_end()));
        }
        for rest in content.map(str::trim_end) {
            if rest.is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("{indent}{INDENT}{rest}"));
            }
        }
    }

    for child in block.expanded_children() {
        push_block(child, depth + 1, lines);
    }
}
