//! The configuration node: a closed set of three variants sharing one
//! read/write/reset/name contract.
//!
//! Every node in a tree is a [`Node`]: a typed leaf ([`ConfigValue`]), an
//! ordered mapping ([`ConfigBlock`]), or a homogeneous sequence
//! ([`ConfigList`]). No fourth kind exists, so renderers and traversals
//! match exhaustively. Shared metadata (name, qualified path, description,
//! change-tracking flags) lives in a [`NodeInfo`] embedded in each variant.
//!
//! Qualified names are materialized at insertion time rather than resolved
//! through parent back-references: `declare`, `add`, and `append` re-root
//! the inserted subtree's paths, so ownership stays strictly top-down. A
//! clone detached from its tree keeps its old path until reinserted.

use std::cell::Cell;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_yaml::Value;

use crate::block::ConfigBlock;
use crate::display;
use crate::docs::{self, DocFormat};
use crate::error::ConfigError;
use crate::leaf::ConfigValue;
use crate::list::ConfigList;
use crate::template::{self, TemplateOptions};
use crate::types::ArgumentSpec;

/// One node of a configuration tree.
#[derive(Debug, Clone)]
pub enum Node {
    Value(ConfigValue),
    Block(ConfigBlock),
    List(ConfigList),
}

/// Metadata shared by all three node kinds.
///
/// The access flag is a `Cell` so the indexed read path can mark nodes
/// through shared references; the tree is single-threaded by contract.
#[derive(Debug, Clone)]
pub(crate) struct NodeInfo {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) description: Option<String>,
    pub(crate) doc: Option<String>,
    pub(crate) declared: bool,
    pub(crate) user_set: Cell<bool>,
    pub(crate) user_accessed: Cell<bool>,
}

impl NodeInfo {
    pub(crate) fn new(description: Option<String>, doc: Option<String>) -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            description,
            doc,
            declared: false,
            user_set: Cell::new(false),
            user_accessed: Cell::new(false),
        }
    }
}

/// Borrowed view over any node kind, used by the renderers so they can
/// start from either a [`Node`] or a bare root [`ConfigBlock`].
#[derive(Clone, Copy)]
pub(crate) enum NodeRef<'a> {
    Value(&'a ConfigValue),
    Block(&'a ConfigBlock),
    List(&'a ConfigList),
}

impl<'a> NodeRef<'a> {
    pub(crate) fn info(self) -> &'a NodeInfo {
        match self {
            NodeRef::Value(v) => &v.info,
            NodeRef::Block(b) => &b.info,
            NodeRef::List(l) => &l.info,
        }
    }
}

impl Node {
    pub(crate) fn info(&self) -> &NodeInfo {
        match self {
            Node::Value(v) => &v.info,
            Node::Block(b) => &b.info,
            Node::List(l) => &l.info,
        }
    }

    pub(crate) fn info_mut(&mut self) -> &mut NodeInfo {
        match self {
            Node::Value(v) => &mut v.info,
            Node::Block(b) => &mut b.info,
            Node::List(l) => &mut l.info,
        }
    }

    pub(crate) fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Value(v) => NodeRef::Value(v),
            Node::Block(b) => NodeRef::Block(b),
            Node::List(l) => NodeRef::List(l),
        }
    }

    /// The local label: the mapping key under the parent block, or `[i]`
    /// for a list element. The root's name is the empty string.
    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// The dotted/bracketed path from the tree root, e.g.
    /// `scenarios[1].merlion`.
    pub fn qualified_name(&self) -> &str {
        &self.info().path
    }

    pub fn description(&self) -> Option<&str> {
        self.info().description.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.info().doc.as_deref()
    }

    /// True once this node's value was assigned by something other than
    /// its declared default.
    pub fn user_set(&self) -> bool {
        self.info().user_set.get()
    }

    /// True once this node was read through the indexed access path.
    pub fn user_accessed(&self) -> bool {
        self.info().user_accessed.get()
    }

    pub fn as_value(&self) -> Option<&ConfigValue> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut ConfigValue> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&ConfigBlock> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut ConfigBlock> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ConfigList> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ConfigList> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    /// Extract the current value as a plain nested structure: a mapping for
    /// blocks, a sequence for lists, the scalar/object itself for leaves.
    /// The result is ready for any serde encoder and can be fed back
    /// through [`set_value`](Self::set_value).
    pub fn value(&self) -> Value {
        match self {
            Node::Value(v) => v.value(),
            Node::Block(b) => b.value(),
            Node::List(l) => l.value(),
        }
    }

    /// Merge-assign untyped data into this node, casting through the
    /// domains along the way.
    pub fn set_value(&mut self, raw: impl Into<Value>) -> Result<(), ConfigError> {
        let raw = raw.into();
        match self {
            Node::Value(v) => v.set_value(raw),
            Node::Block(b) => b.set_value(raw),
            Node::List(l) => l.set_value(raw),
        }
    }

    /// Revert to the declared baseline: leaves re-evaluate their default,
    /// blocks drop implicit entries and reset declared ones, lists empty.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        match self {
            Node::Value(v) => v.reset(),
            Node::Block(b) => b.reset(),
            Node::List(l) => l.reset(),
        }
    }

    /// Register this leaf for command-line flag generation. Fails on
    /// blocks and lists.
    pub fn declare_as_argument(&mut self, spec: ArgumentSpec) -> Result<&mut Node, ConfigError> {
        match self {
            Node::Value(v) => v.argument = Some(spec),
            other => {
                return Err(ConfigError::ArgumentBinding {
                    key: other.qualified_name().to_string(),
                });
            }
        }
        Ok(self)
    }

    // --- block/list passthroughs -------------------------------------------
    //
    // Children come back as plain `Node`s, so the common block and list
    // operations are forwarded here; a wrong-kind call reports a structural
    // mismatch carrying the node's qualified name.

    pub fn declare(
        &mut self,
        key: impl Into<String>,
        node: impl Into<Node>,
    ) -> Result<&mut Node, ConfigError> {
        self.expect_block_mut()?.declare(key, node)
    }

    /// Indexed read of a block entry; marks this node and the child as
    /// user-accessed.
    pub fn item(&self, key: &str) -> Result<&Node, ConfigError> {
        self.expect_block()?.item(key)
    }

    pub fn item_mut(&mut self, key: &str) -> Result<&mut Node, ConfigError> {
        self.expect_block_mut()?.item_mut(key)
    }

    /// Indexed write of a block entry.
    pub fn set(&mut self, key: &str, raw: impl Into<Value>) -> Result<(), ConfigError> {
        self.expect_block_mut()?.set(key, raw)
    }

    /// Non-marking lookup of a block entry.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_block().and_then(|b| b.get(key))
    }

    pub fn append(&mut self, raw: impl Into<Value>) -> Result<&mut Node, ConfigError> {
        self.expect_list_mut()?.append(raw)
    }

    pub fn append_default(&mut self) -> Result<&mut Node, ConfigError> {
        self.expect_list_mut()?.append_default()
    }

    fn expect_block(&self) -> Result<&ConfigBlock, ConfigError> {
        match self {
            Node::Block(b) => Ok(b),
            other => Err(other.kind_mismatch("a mapping block")),
        }
    }

    fn expect_block_mut(&mut self) -> Result<&mut ConfigBlock, ConfigError> {
        match self {
            Node::Block(b) => Ok(b),
            other => Err(other.kind_mismatch("a mapping block")),
        }
    }

    fn expect_list_mut(&mut self) -> Result<&mut ConfigList, ConfigError> {
        match self {
            Node::List(l) => Ok(l),
            other => Err(other.kind_mismatch("a list")),
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Node::Value(_) => "a scalar value",
            Node::Block(_) => "a mapping block",
            Node::List(_) => "a list",
        }
    }

    fn kind_mismatch(&self, expected: &'static str) -> ConfigError {
        ConfigError::StructuralMismatch {
            key: self.qualified_name().to_string(),
            expected,
            found: self.kind_label(),
        }
    }

    // --- tracking traversals ----------------------------------------------

    /// Depth-first pre-order list of this node and every descendant whose
    /// `user_set` flag is true.
    pub fn user_values(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_user_values(self, false, &mut out);
        out
    }

    /// Like [`user_values`](Self::user_values), restricted to nodes never
    /// read back through the indexed access path — the "set but never
    /// looked at" report that flags likely typos.
    pub fn unused_user_values(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_user_values(self, true, &mut out);
        out
    }

    // --- renderers ---------------------------------------------------------

    /// Plain indented dump of the current value tree.
    pub fn display(&self) -> String {
        display::render(self.as_node_ref(), display::Filter::All)
    }

    /// Like [`display`](Self::display), restricted to user-set nodes. An
    /// empty report is exactly the empty string.
    pub fn display_userdata(&self) -> String {
        display::render(self.as_node_ref(), display::Filter::UserData)
    }

    /// Commented, word-wrapped, column-aligned template of this subtree.
    pub fn generate_yaml_template(
        &self,
        options: &TemplateOptions,
    ) -> Result<String, ConfigError> {
        template::render(self.as_node_ref(), options)
    }

    /// Structured documentation dump of this subtree's schema.
    pub fn generate_documentation(&self, format: &DocFormat) -> String {
        docs::render(self.as_node_ref(), format)
    }

    // --- internal plumbing -------------------------------------------------

    /// Give this subtree its place in a tree: set the local name, recompute
    /// the qualified path, and recurse into children.
    pub(crate) fn reroot(&mut self, name: &str, parent_path: &str) {
        let path = if name.starts_with('[') {
            format!("{parent_path}{name}")
        } else if parent_path.is_empty() {
            name.to_string()
        } else {
            format!("{parent_path}.{name}")
        };
        {
            let info = self.info_mut();
            info.name = name.to_string();
            info.path = path.clone();
        }
        match self {
            Node::Value(_) => {}
            Node::Block(b) => {
                for (key, child) in b.entries.iter_mut() {
                    child.reroot(key, &path);
                }
            }
            Node::List(l) => {
                for (i, element) in l.data.iter_mut().enumerate() {
                    element.reroot(&format!("[{i}]"), &path);
                }
            }
        }
    }

    /// Clear change-tracking flags on this subtree. Used on template clones
    /// so a fresh element starts with a clean history.
    pub(crate) fn clear_flags_deep(&mut self) {
        let info = self.info();
        info.user_set.set(false);
        info.user_accessed.set(false);
        match self {
            Node::Value(_) => {}
            Node::Block(b) => {
                for child in b.entries.values_mut() {
                    child.clear_flags_deep();
                }
            }
            Node::List(l) => {
                for element in l.data.iter_mut() {
                    element.clear_flags_deep();
                }
            }
        }
    }
}

pub(crate) fn collect_user_values<'a>(
    node: &'a Node,
    unused_only: bool,
    out: &mut Vec<&'a Node>,
) {
    let info = node.info();
    if info.user_set.get() && (!unused_only || !info.user_accessed.get()) {
        out.push(node);
    }
    match node {
        Node::Value(_) => {}
        Node::Block(b) => {
            for child in b.entries.values() {
                collect_user_values(child, unused_only, out);
            }
        }
        Node::List(l) => {
            for element in &l.data {
                collect_user_values(element, unused_only, out);
            }
        }
    }
}

impl From<ConfigValue> for Node {
    fn from(value: ConfigValue) -> Self {
        Node::Value(value)
    }
}

impl From<ConfigBlock> for Node {
    fn from(block: ConfigBlock) -> Self {
        Node::Block(block)
    }
}

impl From<ConfigList> for Node {
    fn from(list: ConfigList) -> Self {
        Node::List(list)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Domain;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn int_leaf(default: i64) -> ConfigValue {
        ConfigValue::builder()
            .default(default)
            .domain(Domain::Int)
            .build()
            .unwrap()
    }

    #[test]
    fn reroot_joins_block_children_with_dots() {
        let mut block = ConfigBlock::new();
        block.declare("inner", int_leaf(1)).unwrap();
        let mut node = Node::from(block);
        node.reroot("outer", "root");
        assert_eq!(node.qualified_name(), "root.outer");
        assert_eq!(
            node.get("inner").unwrap().qualified_name(),
            "root.outer.inner"
        );
    }

    #[test]
    fn reroot_appends_list_indices_without_dots() {
        let mut list = ConfigList::builder(int_leaf(0)).build().unwrap();
        list.append(5).unwrap();
        let mut node = Node::from(list);
        node.reroot("nodes", "");
        assert_eq!(node.qualified_name(), "nodes");
        assert_eq!(
            node.as_list().unwrap().get(0).unwrap().qualified_name(),
            "nodes[0]"
        );
    }

    #[test]
    fn wrong_kind_passthrough_is_a_structural_mismatch() {
        let mut node = Node::from(int_leaf(1));
        let err = node.set("x", 1).unwrap_err();
        assert!(matches!(err, ConfigError::StructuralMismatch { .. }));
        let err = node.append(1).unwrap_err();
        assert!(matches!(err, ConfigError::StructuralMismatch { .. }));
    }

    #[test]
    fn serialize_emits_current_value_tree() {
        let mut block = ConfigBlock::new();
        block.declare("port", int_leaf(8080)).unwrap();
        let node = Node::from(block);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"port":8080}"#);
    }

    #[test]
    fn display_trait_matches_display_method() {
        let mut block = ConfigBlock::new();
        block.declare("port", int_leaf(8080)).unwrap();
        let node = Node::from(block);
        assert_eq!(format!("{node}"), node.display());
        assert_eq!(node.display(), "port: 8080\n");
    }

    #[test]
    fn node_user_values_include_the_receiver() {
        let mut list = ConfigList::of(Domain::Int).build().unwrap();
        list.append(1).unwrap();
        let node = Node::from(list);
        let names: Vec<&str> = node.user_values().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["", "[0]"]);
    }

    #[test]
    fn clear_flags_deep_resets_history() {
        let mut block = ConfigBlock::new();
        block.declare("port", int_leaf(8080)).unwrap();
        block.set("port", 9000).unwrap();
        let mut node = Node::from(block);
        assert!(node.get("port").unwrap().user_set());
        node.clear_flags_deep();
        assert!(!node.get("port").unwrap().user_set());
        // The value itself survives; only the history is cleared.
        assert_eq!(node.get("port").unwrap().value(), yaml("9000"));
    }
}
