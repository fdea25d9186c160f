//! Error types for the docsort-core library.

use thiserror::Error;

/// Main error type for the docsort library.
#[derive(Error, Debug)]
pub enum DocsortError {
    /// Registry construction error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Invalid document input.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Faults in category or template tables, raised when a registry is built.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two categories share the same id.
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),

    /// Category weight is zero, negative or not a number.
    #[error("category {id} has non-positive weight {weight}")]
    InvalidWeight { id: String, weight: f64 },

    /// Keyword or alias is empty after trimming.
    #[error("category {0} has an empty keyword or alias")]
    EmptyKeyword(String),

    /// Two templates share the same id.
    #[error("duplicate template id: {0}")]
    DuplicateTemplate(String),

    /// Template points at a category that is not registered.
    #[error("template {template} references unknown category {category}")]
    UnknownCategory { template: String, category: String },

    /// Template pattern failed to compile.
    #[error("template {template} pattern {name} is invalid: {source}")]
    InvalidPattern {
        template: String,
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors in the input handed over by text acquisition.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    /// Field contains a NUL byte, which means undecoded binary was passed as text.
    #[error("{0} contains a NUL byte; expected decoded UTF-8 text")]
    BinaryContent(&'static str),

    /// Source confidence outside 0..=100.
    #[error("source confidence {0} is outside 0..=100")]
    SourceConfidence(u8),
}

/// Result type for the docsort library.
pub type Result<T> = std::result::Result<T, DocsortError>;
