//! Structured documentation generation.
//!
//! A depth-first walk over the schema emitting five caller-supplied
//! templates: `block_start`/`block_end` bracket a block's entries,
//! `item_start`/`item_body`/`item_end` wrap each entry. Templates receive
//! the node's local name (or the body text) through a `%s` placeholder;
//! an empty template suppresses that part. Lists document their template
//! node, not their current elements.
//!
//! Body text is the node's long-form `doc` when present, its short
//! description otherwise. A doc whose line breaks are followed by
//! indentation counts as caller-authored formatting: it is dedented and
//! emitted verbatim at column zero. Anything else is rewrapped to `width`.

use crate::node::{Node, NodeRef};
use crate::wrap::{dedent_tail, wrap};

/// Formatting templates for
/// [`generate_documentation`](crate::ConfigBlock::generate_documentation).
///
/// The defaults produce a plain nested bullet outline.
#[derive(Debug, Clone)]
pub struct DocFormat {
    pub block_start: String,
    pub block_end: String,
    pub item_start: String,
    pub item_body: String,
    pub item_end: String,
    /// Spaces per nesting level.
    pub indent_spacing: usize,
    /// Wrap width for rewrapped bodies.
    pub width: usize,
}

impl Default for DocFormat {
    fn default() -> Self {
        Self {
            block_start: String::new(),
            block_end: String::new(),
            item_start: "- %s\n".to_string(),
            item_body: "%s\n".to_string(),
            item_end: String::new(),
            indent_spacing: 2,
            width: 80,
        }
    }
}

pub(crate) fn render(root: NodeRef, format: &DocFormat) -> String {
    let mut out = String::new();
    let root_name = root.info().name.clone();
    match root {
        NodeRef::Block(block) => {
            emit(&format.block_start, &root_name, 0, format, &mut out);
            for (key, child) in block.entries.iter() {
                walk_entry(key, child, 0, format, &mut out);
            }
            emit(&format.block_end, &root_name, 0, format, &mut out);
        }
        NodeRef::List(list) => {
            emit(&format.block_start, &root_name, 0, format, &mut out);
            if let Some(entries) = nested_entries(&list.template) {
                for (key, child) in entries {
                    walk_entry(key, child, 0, format, &mut out);
                }
            }
            emit(&format.block_end, &root_name, 0, format, &mut out);
        }
        NodeRef::Value(leaf) => {
            // A bare leaf documents as a single item.
            emit(&format.item_start, &leaf.info.name, 0, format, &mut out);
            if let Some(text) = leaf.info.doc.as_deref().or(leaf.info.description.as_deref()) {
                emit_body(text, 1, format, &mut out);
            }
            emit(&format.item_end, &leaf.info.name, 0, format, &mut out);
        }
    }
    out
}

/// Emit one entry of a block at depth `depth` (the depth of the block that
/// owns it), then recurse into its own entries if it has any.
fn walk_entry(key: &str, node: &Node, depth: usize, format: &DocFormat, out: &mut String) {
    let item_depth = depth + 1;
    emit(&format.item_start, key, item_depth, format, out);
    let info = node.info();
    if let Some(text) = info.doc.as_deref().or(info.description.as_deref()) {
        emit_body(text, item_depth + 1, format, out);
    }
    emit(&format.item_end, key, item_depth, format, out);

    if let Some(entries) = nested_entries(node) {
        emit(&format.block_start, key, item_depth, format, out);
        for (child_key, child) in entries {
            walk_entry(child_key, child, item_depth, format, out);
        }
        emit(&format.block_end, key, item_depth, format, out);
    }
}

/// The entries a node documents below itself: a block's own entries, or —
/// for a list — the entries of its template.
fn nested_entries(node: &Node) -> Option<Vec<(&str, &Node)>> {
    match node {
        Node::Block(block) => Some(block.iter().collect()),
        Node::List(list) => nested_entries(&list.template),
        Node::Value(_) => None,
    }
}

/// Apply a single-part template: indent, substitute the name, append.
/// Empty templates emit nothing at all.
fn emit(template: &str, name: &str, depth: usize, format: &DocFormat, out: &mut String) {
    if template.is_empty() {
        return;
    }
    out.push_str(&" ".repeat(depth * format.indent_spacing));
    out.push_str(&template.replace("%s", name));
}

fn emit_body(text: &str, depth: usize, format: &DocFormat, out: &mut String) {
    let template = &format.item_body;
    if template.is_empty() {
        return;
    }
    if text.contains("\n ") || text.contains("\n\t") {
        // Caller-authored formatting: dedent and emit verbatim, flush left.
        out.push_str(&template.replace("%s", &dedent_tail(text)));
        return;
    }

    let indent = " ".repeat(depth * format.indent_spacing);
    let Some((before, after)) = template.split_once("%s") else {
        out.push_str(&indent);
        out.push_str(template);
        return;
    };
    let first_width = format.width.saturating_sub(indent.len() + before.chars().count());
    let rest_width = format.width.saturating_sub(indent.len());
    let chunks = wrap(text, first_width, rest_width);
    for (i, chunk) in chunks.iter().enumerate() {
        out.push_str(&indent);
        if i == 0 {
            out.push_str(before);
        }
        out.push_str(chunk);
        if i + 1 == chunks.len() {
            out.push_str(after);
        } else {
            out.push('\n');
        }
    }
    if chunks.is_empty() {
        out.push_str(&indent);
        out.push_str(before);
        out.push_str(after);
    }
}
