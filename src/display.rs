//! Current-value dump: plain indented YAML-flavored text, no comments.
//!
//! Two modes: everything, or only nodes the user actually set (the
//! "userdata" view). In the filtered mode containers that are not
//! themselves user-set print no header but are still descended, so a set
//! child keeps its natural indentation; a report with nothing to say is
//! exactly the empty string.

use crate::domain::scalar_repr;
use crate::leaf::ConfigValue;
use crate::list::ConfigList;
use crate::node::{Node, NodeRef};

const INDENT: &str = "  ";

#[derive(Clone, Copy, PartialEq)]
pub(crate) enum Filter {
    All,
    UserData,
}

pub(crate) fn render(root: NodeRef, filter: Filter) -> String {
    let mut out = String::new();
    match root {
        NodeRef::Value(leaf) => {
            push_line(&mut out, 0, &scalar_repr(&leaf.data));
        }
        NodeRef::Block(block) => {
            for (key, child) in block.entries.iter() {
                emit_named(key, child, 0, filter, &mut out);
            }
        }
        NodeRef::List(list) => {
            for element in &list.data {
                emit_element(element, 0, filter, &mut out);
            }
        }
    }
    out
}

fn included(node: &Node, filter: Filter) -> bool {
    filter == Filter::All || node.info().user_set.get()
}

fn emit_named(key: &str, node: &Node, level: usize, filter: Filter, out: &mut String) {
    let show = included(node, filter);
    match node {
        Node::Value(leaf) => {
            if show {
                push_line(out, level, &leaf_label(key, leaf));
            }
        }
        Node::Block(block) => {
            if show {
                push_line(out, level, &format!("{key}:"));
            }
            for (child_key, child) in block.entries.iter() {
                emit_named(child_key, child, level + 1, filter, out);
            }
        }
        Node::List(list) => {
            if show {
                push_line(out, level, &list_label(key, list));
            }
            for element in &list.data {
                emit_element(element, level + 1, filter, out);
            }
        }
    }
}

fn emit_element(node: &Node, level: usize, filter: Filter, out: &mut String) {
    let show = included(node, filter);
    match node {
        Node::Value(leaf) => {
            if show {
                push_line(out, level, &element_leaf_label(leaf));
            }
        }
        Node::Block(block) => {
            if show {
                push_line(out, level, "-");
            }
            for (child_key, child) in block.entries.iter() {
                emit_named(child_key, child, level + 1, filter, out);
            }
        }
        Node::List(list) => {
            if show {
                push_line(out, level, if list.data.is_empty() { "- []" } else { "-" });
            }
            for element in &list.data {
                emit_element(element, level + 1, filter, out);
            }
        }
    }
}

fn push_line(out: &mut String, level: usize, content: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(content);
    out.push('\n');
}

// Line labels are shared with the template renderer, which appends aligned
// comments to the same content.

pub(crate) fn leaf_label(key: &str, leaf: &ConfigValue) -> String {
    if leaf.data.is_null() {
        format!("{key}:")
    } else {
        format!("{key}: {}", scalar_repr(&leaf.data))
    }
}

pub(crate) fn list_label(key: &str, list: &ConfigList) -> String {
    if list.data.is_empty() {
        format!("{key}: []")
    } else {
        format!("{key}:")
    }
}

pub(crate) fn element_leaf_label(leaf: &ConfigValue) -> String {
    if leaf.data.is_null() {
        "-".to_string()
    } else {
        format!("- {}", scalar_repr(&leaf.data))
    }
}
