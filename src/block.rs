//! The mapping node: declared entries plus optional implicit ones.
//!
//! A block is declared once at schema-construction time and then read and
//! written through a mapping-like interface. Declared entries are stable in
//! identity — the child node object for a declared key never changes, only
//! its value does. Blocks configured as implicit additionally accept
//! undeclared keys at runtime, created through the block's implicit domain;
//! `reset` discards those again.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use crate::builder::BlockBuilder;
use crate::display;
use crate::docs::{self, DocFormat};
use crate::domain::{key_string, value_kind, ImplicitDomain};
use crate::error::ConfigError;
use crate::leaf::ConfigValue;
use crate::node::{collect_user_values, Node, NodeInfo, NodeRef};
use crate::template::{self, TemplateOptions};

/// An ordered mapping of configuration entries.
#[derive(Debug, Clone)]
pub struct ConfigBlock {
    pub(crate) info: NodeInfo,
    pub(crate) entries: IndexMap<String, Node>,
    pub(crate) implicit: bool,
    pub(crate) implicit_domain: Option<ImplicitDomain>,
}

impl ConfigBlock {
    /// A plain block: no description, implicit entries disallowed.
    pub fn new() -> Self {
        Self {
            info: NodeInfo::new(None, None),
            entries: IndexMap::new(),
            implicit: false,
            implicit_domain: None,
        }
    }

    pub fn builder() -> BlockBuilder {
        BlockBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.info.path
    }

    pub fn description(&self) -> Option<&str> {
        self.info.description.as_deref()
    }

    pub fn user_set(&self) -> bool {
        self.info.user_set.get()
    }

    pub fn user_accessed(&self) -> bool {
        self.info.user_accessed.get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entry keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entry nodes in insertion order. Non-marking.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.values()
    }

    /// `(key, node)` pairs in insertion order. Non-marking.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    // --- schema construction -----------------------------------------------

    /// Register a new entry. Declared entries survive `reset` and whole-
    /// block assignment; re-declaring an existing key is an error. Returns
    /// the inserted node for chaining
    /// (`block.declare(..)?.declare_as_argument(..)`).
    pub fn declare(
        &mut self,
        key: impl Into<String>,
        node: impl Into<Node>,
    ) -> Result<&mut Node, ConfigError> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(ConfigError::DuplicateKey {
                block: self.info.path.clone(),
                key,
            });
        }
        let mut node = node.into();
        node.reroot(&key, &self.info.path);
        node.info_mut().declared = true;
        Ok(self.entries.entry(key).or_insert(node))
    }

    /// Insert a prepared node at runtime. Requires an implicit block; the
    /// insertion marks the block user-set (the tree gained a member), while
    /// the node keeps its own flags. Raw-value writes should use
    /// [`set`](Self::set), which casts through the implicit domain.
    pub fn add(
        &mut self,
        key: impl Into<String>,
        node: impl Into<Node>,
    ) -> Result<&mut Node, ConfigError> {
        let key = key.into();
        if !self.implicit {
            return Err(ConfigError::ImplicitDisallowed {
                block: self.info.path.clone(),
                key,
            });
        }
        if self.entries.contains_key(&key) {
            return Err(ConfigError::DuplicateKey {
                block: self.info.path.clone(),
                key,
            });
        }
        let mut node = node.into();
        node.reroot(&key, &self.info.path);
        self.info.user_set.set(true);
        Ok(self.entries.entry(key).or_insert(node))
    }

    // --- reads -------------------------------------------------------------

    /// Indexed read: marks both this block and the returned child as
    /// user-accessed. Absent keys error; implicit auto-creation needs
    /// mutable access, see [`item_mut`](Self::item_mut).
    pub fn item(&self, key: &str) -> Result<&Node, ConfigError> {
        self.info.user_accessed.set(true);
        match self.entries.get(key) {
            Some(child) => {
                child.info().user_accessed.set(true);
                Ok(child)
            }
            None => Err(ConfigError::KeyNotFound {
                block: self.info.path.clone(),
                key: key.to_string(),
            }),
        }
    }

    /// Indexed read-write access. On an implicit block an absent key is
    /// auto-created from the implicit domain at its default value.
    pub fn item_mut(&mut self, key: &str) -> Result<&mut Node, ConfigError> {
        self.info.user_accessed.set(true);
        if !self.entries.contains_key(key) {
            if !self.implicit {
                return Err(ConfigError::KeyNotFound {
                    block: self.info.path.clone(),
                    key: key.to_string(),
                });
            }
            let node = self.new_implicit_child(key, None)?;
            self.entries.insert(key.to_string(), node);
        }
        match self.entries.get_mut(key) {
            Some(child) => {
                child.info().user_accessed.set(true);
                Ok(child)
            }
            None => Err(ConfigError::KeyNotFound {
                block: self.info.path.clone(),
                key: key.to_string(),
            }),
        }
    }

    /// Non-marking lookup.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Non-marking mutable lookup (e.g. to bind an existing leaf to a flag).
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Non-marking lookup with a fallback. A present key returns a detached
    /// clone of its node; an absent key returns a throwaway node holding
    /// `default` — cast through the implicit domain when this block has
    /// one, held as-is behind an identity domain otherwise. Nothing is
    /// inserted and no flags move.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Node, ConfigError> {
        if let Some(child) = self.entries.get(key) {
            return Ok(child.clone());
        }
        let raw = default.into();
        if self.implicit && self.implicit_domain.is_some() {
            return self.new_implicit_child(key, Some(raw));
        }
        let mut leaf = ConfigValue::untyped();
        leaf.data = raw;
        let mut node = Node::Value(leaf);
        node.reroot(key, &self.info.path);
        Ok(node)
    }

    /// Like [`get_or`](Self::get_or), but materializes and inserts an
    /// absent key (the usual mapping `setdefault`). Fails on a non-implicit
    /// block when the key is undeclared.
    pub fn setdefault(
        &mut self,
        key: &str,
        default: Option<Value>,
    ) -> Result<&mut Node, ConfigError> {
        if !self.entries.contains_key(key) {
            if !self.implicit {
                return Err(ConfigError::ImplicitDisallowed {
                    block: self.info.path.clone(),
                    key: key.to_string(),
                });
            }
            let mut node = self.new_implicit_child(key, default)?;
            node.info_mut().user_set.set(true);
            self.entries.insert(key.to_string(), node);
            self.info.user_set.set(true);
        }
        match self.entries.get_mut(key) {
            Some(child) => Ok(child),
            None => Err(ConfigError::KeyNotFound {
                block: self.info.path.clone(),
                key: key.to_string(),
            }),
        }
    }

    // --- writes ------------------------------------------------------------

    /// Indexed write. An existing key delegates to the child's `set_value`;
    /// an absent key on an implicit block is created from the implicit
    /// domain and marks both the new child and this block user-set.
    pub fn set(&mut self, key: &str, raw: impl Into<Value>) -> Result<(), ConfigError> {
        let raw = raw.into();
        if let Some(child) = self.entries.get_mut(key) {
            return child.set_value(raw);
        }
        if !self.implicit {
            return Err(ConfigError::ImplicitDisallowed {
                block: self.info.path.clone(),
                key: key.to_string(),
            });
        }
        let mut node = self.new_implicit_child(key, Some(raw))?;
        node.info_mut().user_set.set(true);
        self.entries.insert(key.to_string(), node);
        self.info.user_set.set(true);
        Ok(())
    }

    /// Whole-block assignment.
    ///
    /// `Null` and the empty mapping restore the declared baseline: declared
    /// children reset to their defaults, implicit children are dropped. A
    /// non-empty mapping merges key-by-key in the mapping's order, leaving
    /// keys it does not mention untouched. Mapping keys are normalized to
    /// their string form.
    ///
    /// The merge is best-effort, not transactional: a failing key aborts
    /// the merge with the failing child's qualified name, and keys already
    /// merged stay merged.
    pub fn set_value(&mut self, raw: impl Into<Value>) -> Result<(), ConfigError> {
        match raw.into() {
            Value::Null => self.reset(),
            Value::Mapping(map) if map.is_empty() => self.reset(),
            Value::Mapping(map) => {
                for (key, value) in map {
                    self.set(&key_string(&key), value)?;
                }
                Ok(())
            }
            other => Err(ConfigError::StructuralMismatch {
                key: self.info.path.clone(),
                expected: "a mapping",
                found: value_kind(&other),
            }),
        }
    }

    /// Reset every declared child recursively and discard every implicit
    /// child, restoring the block to its declared baseline.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.entries.retain(|_, child| child.info().declared);
        for child in self.entries.values_mut() {
            child.reset()?;
        }
        self.info.user_set.set(false);
        Ok(())
    }

    // --- attribute-style access --------------------------------------------

    /// Read a child by attribute-ish name: the name is tried as-is, then
    /// with underscores replaced by spaces. Forwards to [`item`](Self::item)
    /// and follows the same marking rules.
    pub fn get_attr(&self, name: &str) -> Result<&Node, ConfigError> {
        self.item(&self.attr_key(name))
    }

    /// Write a child by attribute-ish name; same resolution as
    /// [`get_attr`](Self::get_attr), same implicit rules as
    /// [`set`](Self::set).
    pub fn set_attr(&mut self, name: &str, raw: impl Into<Value>) -> Result<(), ConfigError> {
        let key = self.attr_key(name);
        self.set(&key, raw)
    }

    fn attr_key(&self, name: &str) -> String {
        if self.entries.contains_key(name) {
            name.to_string()
        } else {
            name.replace('_', " ")
        }
    }

    // --- value extraction and tracking -------------------------------------

    /// The current value as an insertion-ordered mapping of plain values.
    pub fn value(&self) -> Value {
        let mut map = Mapping::new();
        for (key, child) in &self.entries {
            map.insert(Value::String(key.clone()), child.value());
        }
        Value::Mapping(map)
    }

    /// Depth-first pre-order list of the descendants whose `user_set` flag
    /// is true.
    pub fn user_values(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for child in self.entries.values() {
            collect_user_values(child, false, &mut out);
        }
        out
    }

    /// The descendants the user set but the program never read back
    /// through the indexed access path — the likely-typo report. Always a
    /// subset of [`user_values`](Self::user_values).
    pub fn unused_user_values(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for child in self.entries.values() {
            collect_user_values(child, true, &mut out);
        }
        out
    }

    // --- renderers ---------------------------------------------------------

    pub fn display(&self) -> String {
        display::render(NodeRef::Block(self), display::Filter::All)
    }

    pub fn display_userdata(&self) -> String {
        display::render(NodeRef::Block(self), display::Filter::UserData)
    }

    pub fn generate_yaml_template(
        &self,
        options: &TemplateOptions,
    ) -> Result<String, ConfigError> {
        template::render(NodeRef::Block(self), options)
    }

    pub fn generate_documentation(&self, format: &DocFormat) -> String {
        docs::render(NodeRef::Block(self), format)
    }

    // --- internal ----------------------------------------------------------

    /// Build a fresh child for an implicit entry: a clone of the template
    /// node, a leaf with the implicit caster, or an identity-domain leaf
    /// when no implicit domain is configured. `raw` (when given) is cast
    /// into the new child.
    pub(crate) fn new_implicit_child(
        &self,
        key: &str,
        raw: Option<Value>,
    ) -> Result<Node, ConfigError> {
        let mut node = match &self.implicit_domain {
            None => Node::Value(ConfigValue::untyped()),
            Some(ImplicitDomain::Caster(domain)) => {
                Node::Value(ConfigValue::with_domain(domain.clone()))
            }
            Some(ImplicitDomain::Template(template)) => {
                let mut node = (**template).clone();
                node.clear_flags_deep();
                node
            }
        };
        node.reroot(key, &self.info.path);
        if let Some(raw) = raw {
            node.set_value(raw)?;
        }
        Ok(node)
    }
}

impl Default for ConfigBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConfigBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for ConfigBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}
