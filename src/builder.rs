//! Builders for the three node kinds.
//!
//! Schema declaration reads as a chain: pick a default, a domain, and the
//! documentation, then `build()`. Building a leaf casts its default through
//! the domain, so an invalid default fails at declaration time rather than
//! at first use; the same goes for a list's initial contents.

use std::sync::Arc;

use serde_yaml::Value;

use crate::block::ConfigBlock;
use crate::domain::{DefaultValue, Domain, ImplicitDomain};
use crate::error::ConfigError;
use crate::leaf::ConfigValue;
use crate::list::ConfigList;
use crate::node::{Node, NodeInfo};
use crate::types::ArgumentSpec;

/// Builds a [`ConfigValue`] leaf.
#[derive(Debug)]
pub struct ValueBuilder {
    default: DefaultValue,
    domain: Domain,
    description: Option<String>,
    doc: Option<String>,
    argument: Option<ArgumentSpec>,
}

impl ValueBuilder {
    pub(crate) fn new() -> Self {
        Self {
            default: DefaultValue::Literal(Value::Null),
            domain: Domain::Any,
            description: None,
            doc: None,
            argument: None,
        }
    }

    /// Literal default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Literal(value.into());
        self
    }

    /// Lazy default: the factory is evaluated at build time and again on
    /// every reset.
    pub fn default_fn(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = DefaultValue::Factory(Arc::new(factory));
        self
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Short one-line text, rendered as the template comment.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Long-form text for the documentation generator.
    pub fn doc(mut self, text: &str) -> Self {
        self.doc = Some(text.to_string());
        self
    }

    /// Bind the leaf to a command-line flag.
    pub fn argument(mut self, spec: ArgumentSpec) -> Self {
        self.argument = Some(spec);
        self
    }

    /// Cast the default through the domain and produce the leaf.
    pub fn build(self) -> Result<ConfigValue, ConfigError> {
        let mut leaf = ConfigValue {
            info: NodeInfo::new(self.description, self.doc),
            domain: self.domain,
            default: self.default,
            data: Value::Null,
            argument: self.argument,
        };
        let raw = leaf.default.produce();
        leaf.data = leaf.cast(raw)?;
        Ok(leaf)
    }
}

/// Builds a [`ConfigBlock`].
#[derive(Debug, Default)]
pub struct BlockBuilder {
    description: Option<String>,
    doc: Option<String>,
    implicit: bool,
    implicit_domain: Option<ImplicitDomain>,
}

impl BlockBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn doc(mut self, text: &str) -> Self {
        self.doc = Some(text.to_string());
        self
    }

    /// Allow undeclared keys to be created on first write.
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// Cast implicit entries through a plain domain (they become leaves).
    /// Implies [`implicit`](Self::implicit).
    pub fn implicit_domain(mut self, domain: Domain) -> Self {
        self.implicit = true;
        self.implicit_domain = Some(ImplicitDomain::Caster(domain));
        self
    }

    /// Clone implicit entries from a full node template. Implies
    /// [`implicit`](Self::implicit).
    pub fn implicit_template(mut self, template: impl Into<Node>) -> Self {
        self.implicit = true;
        self.implicit_domain = Some(ImplicitDomain::Template(Box::new(template.into())));
        self
    }

    pub fn build(self) -> ConfigBlock {
        ConfigBlock {
            info: NodeInfo::new(self.description, self.doc),
            entries: indexmap::IndexMap::new(),
            implicit: self.implicit,
            implicit_domain: self.implicit_domain,
        }
    }
}

/// Builds a [`ConfigList`] around a template node.
#[derive(Debug)]
pub struct ListBuilder {
    template: Node,
    initial: Vec<Value>,
    description: Option<String>,
    doc: Option<String>,
}

impl ListBuilder {
    pub(crate) fn new(template: Node) -> Self {
        Self {
            template,
            initial: Vec::new(),
            description: None,
            doc: None,
        }
    }

    /// Default contents, cast through the template at build time. Unlike
    /// appended elements these carry no user-set history.
    pub fn initial<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.initial = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn doc(mut self, text: &str) -> Self {
        self.doc = Some(text.to_string());
        self
    }

    pub fn build(self) -> Result<ConfigList, ConfigError> {
        let mut list = ConfigList {
            info: NodeInfo::new(self.description, self.doc),
            template: Box::new(self.template),
            data: Vec::new(),
        };
        for (index, raw) in self.initial.into_iter().enumerate() {
            let mut element = list.new_element(index, Some(raw))?;
            element.clear_flags_deep();
            list.data.push(element);
        }
        Ok(list)
    }
}
