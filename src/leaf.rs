//! The leaf node: a typed scalar or opaque object governed by a domain.

use serde_yaml::Value;

use crate::builder::ValueBuilder;
use crate::domain::{scalar_repr, value_kind, DefaultValue, Domain, DomainError};
use crate::error::ConfigError;
use crate::node::NodeInfo;
use crate::types::ArgumentSpec;

/// A leaf configuration entry: current data, its casting domain, a default
/// (literal or lazily evaluated factory), and an optional CLI binding.
///
/// The data invariant: `data` always holds a value that has passed the
/// domain, or `Null` when unset. Assignment casts first and stores only on
/// success, so a failed write leaves the leaf untouched.
#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub(crate) info: NodeInfo,
    pub(crate) domain: Domain,
    pub(crate) default: DefaultValue,
    pub(crate) data: Value,
    pub(crate) argument: Option<ArgumentSpec>,
}

impl ConfigValue {
    pub fn builder() -> ValueBuilder {
        ValueBuilder::new()
    }

    /// An identity-domain leaf with no default. Implicit entries of a block
    /// without an implicit domain are built from this.
    pub(crate) fn untyped() -> Self {
        Self {
            info: NodeInfo::new(None, None),
            domain: Domain::Any,
            default: DefaultValue::Literal(Value::Null),
            data: Value::Null,
            argument: None,
        }
    }

    pub(crate) fn with_domain(domain: Domain) -> Self {
        Self {
            domain,
            ..Self::untyped()
        }
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

    /// The current value. Reading through this accessor does not count as
    /// indexed access.
    pub fn value(&self) -> Value {
        self.data.clone()
    }

    /// Cast `raw` through the domain and replace the current value,
    /// marking the leaf user-set. On failure the leaf is untouched.
    pub fn set_value(&mut self, raw: impl Into<Value>) -> Result<(), ConfigError> {
        let cast = self.cast(raw.into())?;
        self.data = cast;
        self.info.user_set.set(true);
        Ok(())
    }

    /// Recompute the value from the default (invoking a factory default
    /// anew) and clear the user-set flag. The access flag is untouched.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let raw = self.default.produce();
        self.data = self.cast(raw)?;
        self.info.user_set.set(false);
        Ok(())
    }

    /// Register this leaf for command-line flag generation.
    pub fn declare_as_argument(&mut self, spec: ArgumentSpec) -> &mut Self {
        self.argument = Some(spec);
        self
    }

    /// `Null` is the "unset" state and bypasses the domain; everything else
    /// must convert. Failures carry this leaf's qualified name and the raw
    /// input.
    pub(crate) fn cast(&self, raw: Value) -> Result<Value, ConfigError> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        self.domain.cast(&raw).map_err(|e| match e {
            DomainError::Structural { expected } => ConfigError::StructuralMismatch {
                key: self.info.path.clone(),
                expected,
                found: value_kind(&raw),
            },
            DomainError::Invalid(reason) => ConfigError::Cast {
                key: self.info.path.clone(),
                raw: scalar_repr(&raw),
                reason,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn default_is_cast_at_build_time() {
        let leaf = ConfigValue::builder()
            .default(600)
            .domain(Domain::Float)
            .build()
            .unwrap();
        assert_eq!(leaf.value(), yaml("600.0"));
        assert!(!leaf.user_set());
    }

    #[test]
    fn bad_default_fails_construction() {
        let err = ConfigValue::builder()
            .default("a")
            .domain(Domain::Int)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Cast { .. }));
    }

    #[test]
    fn set_value_casts_and_marks_user_set() {
        let mut leaf = ConfigValue::builder()
            .default(600.0)
            .domain(Domain::Float)
            .build()
            .unwrap();
        leaf.set_value(50).unwrap();
        assert_eq!(leaf.value(), yaml("50.0"));
        assert!(leaf.user_set());
    }

    #[test]
    fn failed_set_leaves_prior_value() {
        let mut leaf = ConfigValue::builder()
            .default(600.0)
            .domain(Domain::Float)
            .build()
            .unwrap();
        let err = leaf.set_value("a").unwrap_err();
        assert!(matches!(err, ConfigError::Cast { .. }));
        assert_eq!(leaf.value(), yaml("600.0"));
        assert!(!leaf.user_set());
    }

    #[test]
    fn failed_list_cast_preserves_prior_list() {
        let mut leaf = ConfigValue::builder()
            .default(yaml("[1, 2, 3]"))
            .domain(Domain::list_of(Domain::Int))
            .build()
            .unwrap();
        let err = leaf.set_value(yaml("[5.5, 'a']")).unwrap_err();
        assert!(matches!(err, ConfigError::Cast { .. }));
        assert_eq!(leaf.value(), yaml("[1, 2, 3]"));
    }

    #[test]
    fn scalar_assigned_to_list_domain_is_structural() {
        let mut leaf = ConfigValue::builder()
            .default(yaml("[1, 2, 3]"))
            .domain(Domain::list_of(Domain::Int))
            .build()
            .unwrap();
        let err = leaf.set_value(50).unwrap_err();
        assert!(matches!(err, ConfigError::StructuralMismatch { .. }));
        assert_eq!(leaf.value(), yaml("[1, 2, 3]"));
    }

    #[test]
    fn reset_restores_default_and_clears_user_set() {
        let mut leaf = ConfigValue::builder()
            .default(600.0)
            .domain(Domain::Float)
            .build()
            .unwrap();
        leaf.set_value(50).unwrap();
        leaf.reset().unwrap();
        assert_eq!(leaf.value(), yaml("600.0"));
        assert!(!leaf.user_set());
    }

    #[test]
    fn factory_default_is_reevaluated_on_reset() {
        let mut leaf = ConfigValue::builder()
            .default_fn(|| Value::from(10))
            .domain(Domain::Int)
            .build()
            .unwrap();
        assert_eq!(leaf.value(), yaml("10"));
        leaf.set_value(5).unwrap();
        assert_eq!(leaf.value(), yaml("5"));
        leaf.reset().unwrap();
        assert_eq!(leaf.value(), yaml("10"));
    }

    #[test]
    fn null_bypasses_the_domain() {
        let mut leaf = ConfigValue::builder().domain(Domain::Int).build().unwrap();
        assert_eq!(leaf.value(), Value::Null);
        leaf.set_value(Value::Null).unwrap();
        assert_eq!(leaf.value(), Value::Null);
    }

    #[test]
    fn reset_keeps_access_flag() {
        let mut leaf = ConfigValue::builder()
            .default(1)
            .domain(Domain::Int)
            .build()
            .unwrap();
        leaf.info.user_accessed.set(true);
        leaf.set_value(2).unwrap();
        leaf.reset().unwrap();
        assert!(leaf.user_accessed());
        assert!(!leaf.user_set());
    }
}
