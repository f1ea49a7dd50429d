//! Self-describing hierarchical configuration trees. Declare a schema of
//! typed leaves, nested blocks, and homogeneous lists, then merge untyped
//! data into it and render it back out.
//!
//! ```
//! use cfgtree::{ConfigBlock, ConfigValue, Domain};
//!
//! let mut config = ConfigBlock::builder()
//!     .description("Solver options")
//!     .build();
//! config.declare(
//!     "iterations",
//!     ConfigValue::builder()
//!         .default(100)
//!         .domain(Domain::Int)
//!         .description("Maximum iterations")
//!         .build()?,
//! )?;
//!
//! // Bulk-assign parsed YAML/JSON and read typed values back.
//! config.set_value(serde_yaml::from_str::<cfgtree::Value>("iterations: '250'")?)?;
//! assert_eq!(config.item("iterations")?.value(), cfgtree::Value::from(250));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Why cfgtree
//!
//! Applications with large option surfaces need more than a bag of parsed
//! values: they need one place that knows every option's type, default,
//! and documentation, accepts sparse user input from any serializer, and
//! can report what the user actually touched. Cfgtree models that as a
//! tree of three node kinds:
//!
//! - **[`ConfigValue`]** — a leaf holding a typed scalar or opaque object,
//!   guarded by a casting [`Domain`], with a literal or lazily-evaluated
//!   default and optional CLI binding.
//! - **[`ConfigBlock`]** — an ordered mapping of declared entries.
//!   Implicit blocks additionally accept undeclared keys at runtime,
//!   created through a configurable implicit domain.
//! - **[`ConfigList`]** — an ordered sequence cloning one template node
//!   per element, so every element shares a type.
//!
//! The tree is the single source of truth: value access, bulk merge,
//! template generation, reference documentation, and command-line flags
//! all derive from the same declarations.
//!
//! # Merge semantics
//!
//! `set_value` accepts the plain nested structures any deserializer
//! produces ([`Value`] is `serde_yaml::Value`). Mappings merge key-by-key
//! into blocks — keys not mentioned keep their values; sequences replace
//! list contents element-by-element; every raw value is cast through the
//! receiving leaf's domain. Casting failures abort the offending
//! assignment with the failing key's qualified name and leave that node
//! unchanged. A block-level merge is best-effort rather than
//! transactional: keys merged before the failure stay merged (documented
//! in [`ConfigBlock::set_value`]).
//!
//! # Change tracking
//!
//! Every node carries two flags: *user-set* (its value came from outside
//! the declared defaults) and *user-accessed* (it was read back through
//! the indexed access path). [`ConfigBlock::user_values`] lists everything
//! the user set; [`ConfigBlock::unused_user_values`] narrows that to nodes
//! the program never looked at — the classic "this setting is probably a
//! typo" report.
//!
//! # Rendering
//!
//! Three independent text generators walk the same tree:
//!
//! - [`ConfigBlock::display`] dumps current values as plain indented
//!   YAML-flavored text; `display_userdata` restricts it to user-set nodes.
//! - [`ConfigBlock::generate_yaml_template`] produces a commented template
//!   with column-aligned, word-wrapped `#` descriptions
//!   ([`TemplateOptions`] controls indent and width).
//! - [`ConfigBlock::generate_documentation`] emits fully customizable
//!   structured documentation ([`DocFormat`]).
//!
//! # CLI binding
//!
//! The core carries only [`ArgumentSpec`] declarations; the `cli` module
//! (behind the `clap` cargo feature, on by default) turns them into clap
//! flags with [`ConfigBlock::initialize_command`] and routes parsed values
//! back with [`ConfigBlock::import_matches`]. To use cfgtree without clap:
//!
//! ```toml
//! cfgtree = { version = "...", default-features = false }
//! ```
//!
//! # Concurrency
//!
//! A tree is a single-threaded, synchronous, in-memory structure. Nothing
//! here performs I/O; callers needing shared access wrap the whole tree in
//! their own lock.

pub mod error;
pub mod types;

mod block;
mod builder;
#[cfg(feature = "clap")]
mod cli;
mod display;
mod docs;
mod domain;
mod leaf;
mod list;
mod node;
mod template;
mod wrap;

#[cfg(test)]
mod fixtures;

pub use block::ConfigBlock;
pub use builder::{BlockBuilder, ListBuilder, ValueBuilder};
pub use docs::DocFormat;
pub use domain::{DefaultValue, Domain, ImplicitDomain};
pub use error::ConfigError;
pub use leaf::ConfigValue;
pub use list::ConfigList;
pub use node::Node;
pub use template::TemplateOptions;
pub use types::{ArgGroup, ArgumentSpec};

/// The untyped raw value a tree exchanges with the outside world.
pub use serde_yaml::Value;
