//! The sequence node: a repeated template instantiated per element.

use serde::{Serialize, Serializer};
use serde_yaml::Value;

use crate::builder::ListBuilder;
use crate::domain::Domain;
use crate::error::ConfigError;
use crate::leaf::ConfigValue;
use crate::node::{Node, NodeInfo};

/// An ordered sequence of configuration entries, each cloned from one
/// template node — so every element shares the same type and domain.
#[derive(Debug, Clone)]
pub struct ConfigList {
    pub(crate) info: NodeInfo,
    pub(crate) template: Box<Node>,
    pub(crate) data: Vec<Node>,
}

impl ConfigList {
    /// A list whose elements clone the given template node.
    pub fn builder(template: impl Into<Node>) -> ListBuilder {
        ListBuilder::new(template.into())
    }

    /// A list of scalar leaves governed by `domain`.
    pub fn of(domain: Domain) -> ListBuilder {
        ListBuilder::new(Node::Value(ConfigValue::with_domain(domain)))
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.info.path
    }

    pub fn user_set(&self) -> bool {
        self.info.user_set.get()
    }

    pub fn user_accessed(&self) -> bool {
        self.info.user_accessed.get()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements in order. Non-marking (iteration does not count as reading
    /// any individual element).
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.data.iter()
    }

    /// Non-marking lookup.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.data.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.data.get_mut(index)
    }

    /// Indexed read: marks the list and the element as user-accessed.
    /// An out-of-range index reports the valid range.
    pub fn item(&self, index: usize) -> Result<&Node, ConfigError> {
        self.info.user_accessed.set(true);
        let len = self.data.len();
        match self.data.get(index) {
            Some(element) => {
                element.info().user_accessed.set(true);
                Ok(element)
            }
            None => Err(ConfigError::IndexOutOfRange {
                list: self.info.path.clone(),
                index,
                len,
            }),
        }
    }

    pub fn item_mut(&mut self, index: usize) -> Result<&mut Node, ConfigError> {
        self.info.user_accessed.set(true);
        let len = self.data.len();
        match self.data.get_mut(index) {
            Some(element) => {
                element.info().user_accessed.set(true);
                Ok(element)
            }
            None => Err(ConfigError::IndexOutOfRange {
                list: self.info.path.clone(),
                index,
                len,
            }),
        }
    }

    /// Clone the template into a fresh element, cast `raw` into it, and
    /// append. Marks the new element and the list itself user-set.
    pub fn append(&mut self, raw: impl Into<Value>) -> Result<&mut Node, ConfigError> {
        self.push_element(Some(raw.into()))
    }

    /// Append a fresh element left at the template's default value.
    pub fn append_default(&mut self) -> Result<&mut Node, ConfigError> {
        self.push_element(None)
    }

    /// In-place assignment to an existing element: casting is delegated to
    /// the element, which is marked user-set; the list itself is not. An
    /// out-of-range index is an error, never a silent append.
    pub fn set(&mut self, index: usize, raw: impl Into<Value>) -> Result<(), ConfigError> {
        let len = self.data.len();
        match self.data.get_mut(index) {
            Some(element) => {
                element.set_value(raw.into())?;
                element.info().user_set.set(true);
                Ok(())
            }
            None => Err(ConfigError::IndexOutOfRange {
                list: self.info.path.clone(),
                index,
                len,
            }),
        }
    }

    /// Whole-list assignment.
    ///
    /// A sequence replaces the contents element-by-element; the replacement
    /// is built first and swapped in only if every element casts, so the
    /// original contents survive any failure. A scalar is treated as the
    /// one-element sequence `[scalar]`; `Null` empties the list; a mapping
    /// is a structural mismatch.
    pub fn set_value(&mut self, raw: impl Into<Value>) -> Result<(), ConfigError> {
        match raw.into() {
            Value::Null => self.reset(),
            Value::Sequence(items) => self.replace_with(items),
            Value::Mapping(_) => Err(ConfigError::StructuralMismatch {
                key: self.info.path.clone(),
                expected: "a sequence",
                found: "a mapping",
            }),
            scalar => self.replace_with(vec![scalar]),
        }
    }

    /// Empty the list back to zero length and clear the user-set flag.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.data.clear();
        self.info.user_set.set(false);
        Ok(())
    }

    /// The current value as a plain sequence.
    pub fn value(&self) -> Value {
        Value::Sequence(self.data.iter().map(Node::value).collect())
    }

    fn replace_with(&mut self, items: Vec<Value>) -> Result<(), ConfigError> {
        let mut fresh = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let mut element = self.new_element(index, Some(item))?;
            element.info_mut().user_set.set(true);
            fresh.push(element);
        }
        self.data = fresh;
        self.info.user_set.set(true);
        Ok(())
    }

    fn push_element(&mut self, raw: Option<Value>) -> Result<&mut Node, ConfigError> {
        let mut element = self.new_element(self.data.len(), raw)?;
        element.info_mut().user_set.set(true);
        self.info.user_set.set(true);
        self.data.push(element);
        let len = self.data.len();
        match self.data.last_mut() {
            Some(element) => Ok(element),
            None => Err(ConfigError::IndexOutOfRange {
                list: self.info.path.clone(),
                index: 0,
                len,
            }),
        }
    }

    /// Clone the template with a clean history, place it at `index`, and
    /// cast `raw` into it when given.
    pub(crate) fn new_element(
        &self,
        index: usize,
        raw: Option<Value>,
    ) -> Result<Node, ConfigError> {
        let mut element = (*self.template).clone();
        element.clear_flags_deep();
        element.reroot(&format!("[{index}]"), &self.info.path);
        if let Some(raw) = raw {
            element.set_value(raw)?;
        }
        Ok(element)
    }
}

impl std::fmt::Display for ConfigList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::display::render(
            crate::node::NodeRef::List(self),
            crate::display::Filter::All,
        ))
    }
}

impl Serialize for ConfigList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}
