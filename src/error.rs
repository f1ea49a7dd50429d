use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': cannot cast {raw}: {reason}")]
    Cast {
        key: String,
        raw: String,
        reason: String,
    },

    #[error("Key '{key}' not defined in block '{block}' and the block disallows implicit entries")]
    ImplicitDisallowed { block: String, key: String },

    #[error("Key '{key}' not found in block '{block}'")]
    KeyNotFound { block: String, key: String },

    #[error("Index {index} out of range for list '{list}' of length {len}")]
    IndexOutOfRange {
        list: String,
        index: usize,
        len: usize,
    },

    #[error("Cannot assign {found} to {expected} '{key}'")]
    StructuralMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Key '{key}' already declared in block '{block}'")]
    DuplicateKey { block: String, key: String },

    #[error("'{key}' is not a value leaf and cannot be bound to an argument")]
    ArgumentBinding { key: String },

    #[error("Width {width} is too small to render a template comment (need at least {needed})")]
    TemplateWidth { width: usize, needed: usize },

    #[error("Indent spacing must be a positive number of spaces")]
    InvalidIndent,
}
