//! Domain casters and default values.
//!
//! A [`Domain`] is the validation/coercion rule attached to a value leaf (or
//! to the implicit-entry slot of a block). Casting either produces a value
//! that satisfies the rule or fails; a failed cast never modifies the node
//! it was aimed at. The built-in domains mirror the loose scalar coercions
//! a config file surface needs (`"8080"` is an acceptable int, `1` is an
//! acceptable string), while [`Domain::custom`] accepts any closure.

use std::fmt;
use std::sync::Arc;

use serde_yaml::Value;

type CasterFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;
type FactoryFn = dyn Fn() -> Value + Send + Sync;

/// Validation/coercion rule for a value leaf.
#[derive(Clone)]
pub enum Domain {
    /// Identity: any value is accepted unconverted.
    Any,
    Bool,
    Int,
    Float,
    Str,
    /// A homogeneous list whose elements are cast through the inner domain.
    ListOf(Box<Domain>),
    /// A user-supplied caster. The error string becomes the cast failure
    /// reason, reported with the failing key's qualified name.
    Custom(Arc<CasterFn>),
}

/// Why a cast failed, before the failing key's context is attached.
#[derive(Debug)]
pub(crate) enum DomainError {
    /// The input's shape is wrong for the domain (e.g. a mapping handed to
    /// a scalar domain). Surfaces as a structural-mismatch error.
    Structural { expected: &'static str },
    /// The input has the right shape but an unconvertible value.
    Invalid(String),
}

impl Domain {
    pub fn custom(f: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Domain::Custom(Arc::new(f))
    }

    pub fn list_of(inner: Domain) -> Self {
        Domain::ListOf(Box::new(inner))
    }

    /// Coarse type label used as the flag metavar in generated CLI help.
    pub(crate) fn type_label(&self) -> &'static str {
        match self {
            Domain::Any | Domain::Custom(_) => "VALUE",
            Domain::Bool => "BOOL",
            Domain::Int => "INT",
            Domain::Float => "FLOAT",
            Domain::Str => "STR",
            Domain::ListOf(_) => "LIST",
        }
    }

    pub(crate) fn is_bool(&self) -> bool {
        matches!(self, Domain::Bool)
    }

    pub(crate) fn cast(&self, raw: &Value) -> Result<Value, DomainError> {
        match self {
            Domain::Any => Ok(raw.clone()),
            Domain::Bool => cast_bool(raw),
            Domain::Int => cast_int(raw),
            Domain::Float => cast_float(raw),
            Domain::Str => cast_str(raw),
            Domain::ListOf(inner) => cast_list(inner, raw),
            Domain::Custom(f) => f(raw).map_err(DomainError::Invalid),
        }
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Any => f.write_str("Any"),
            Domain::Bool => f.write_str("Bool"),
            Domain::Int => f.write_str("Int"),
            Domain::Float => f.write_str("Float"),
            Domain::Str => f.write_str("Str"),
            Domain::ListOf(inner) => f.debug_tuple("ListOf").field(inner).finish(),
            Domain::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn cast_bool(raw: &Value) -> Result<Value, DomainError> {
    match raw {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => Ok(Value::Bool(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            other => Err(DomainError::Invalid(format!(
                "invalid boolean literal '{other}'"
            ))),
        },
        _ => Err(DomainError::Structural {
            expected: "a boolean",
        }),
    }
}

fn cast_int(raw: &Value) -> Result<Value, DomainError> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::from(i));
            }
            // Finite floats truncate toward zero.
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(Value::from(f.trunc() as i64))
                }
                _ => Err(DomainError::Invalid(format!(
                    "number {n} has no integer form"
                ))),
            }
        }
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| DomainError::Invalid(format!("invalid integer literal '{s}'"))),
        _ => Err(DomainError::Structural {
            expected: "an integer",
        }),
    }
}

fn cast_float(raw: &Value) -> Result<Value, DomainError> {
    match raw {
        Value::Number(n) => match n.as_f64() {
            Some(f) => Ok(Value::from(f)),
            None => Err(DomainError::Invalid(format!("number {n} has no float form"))),
        },
        Value::Bool(b) => Ok(Value::from(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| DomainError::Invalid(format!("invalid float literal '{s}'"))),
        _ => Err(DomainError::Structural {
            expected: "a number",
        }),
    }
}

fn cast_str(raw: &Value) -> Result<Value, DomainError> {
    match raw {
        Value::String(s) => Ok(Value::String(s.clone())),
        Value::Bool(_) | Value::Number(_) => Ok(Value::String(scalar_repr(raw))),
        _ => Err(DomainError::Structural {
            expected: "a string",
        }),
    }
}

fn cast_list(inner: &Domain, raw: &Value) -> Result<Value, DomainError> {
    let Value::Sequence(items) = raw else {
        return Err(DomainError::Structural {
            expected: "a sequence",
        });
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let cast = inner.cast(item).map_err(|e| {
            let reason = match e {
                DomainError::Structural { expected } => {
                    format!("expected {expected}, got {}", value_kind(item))
                }
                DomainError::Invalid(msg) => msg,
            };
            DomainError::Invalid(format!("element {i}: {reason}"))
        })?;
        out.push(cast);
    }
    Ok(Value::Sequence(out))
}

/// A leaf's default: a literal, or a zero-argument factory evaluated on
/// every reset. The function type enforces the zero-argument arity.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Factory(Arc<FactoryFn>),
}

impl DefaultValue {
    pub(crate) fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(v) => v.clone(),
            DefaultValue::Factory(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            DefaultValue::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Domain applied to implicit entries of a block: either a plain caster
/// (implicit entries become leaves with that domain) or a full node
/// template cloned per entry.
#[derive(Debug, Clone)]
pub enum ImplicitDomain {
    Caster(Domain),
    Template(Box<crate::Node>),
}

/// Flow-style scalar rendering shared by the display, template, and error
/// paths. Floats always carry a decimal point so the output re-parses as a
/// float; strings render bare.
pub(crate) fn scalar_repr(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_f64() {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
                    _ => n.to_string(),
                }
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(scalar_repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", scalar_repr(k), scalar_repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Tagged(tagged) => scalar_repr(&tagged.value),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// String form of a raw mapping key. Non-string keys (numbers, bools) are
/// stored and looked up by this form, so `5` and `"5"` name the same entry.
pub(crate) fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => scalar_repr(other),
    }
}
