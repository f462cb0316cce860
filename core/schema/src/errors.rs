//! Error types for the schema crate.
//!
//! This module defines structured errors for descriptor parsing, registry
//! lookups and instance decoding.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while describing, loading or resolving schemas.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum SchemaError {
    /// No provider is registered under the module tag.
    #[error("unknown module `{module}`")]
    UnknownModule { module: String },

    /// The provider for `module` does not know the class `name`.
    #[error("schema `{name}` not found in module `{module}`")]
    UnknownSchema { module: String, name: String },

    /// A declared field type could not be parsed.
    #[error("invalid type reference `{text}`: {reason}")]
    InvalidTypeRef { text: String, reason: &'static str },

    /// A `module.Class` name was expected.
    #[error("invalid qualified schema name `{0}`, expected `module.Class`")]
    InvalidQualifiedName(String),

    /// A value was supplied for a field the schema does not declare.
    #[error("field `{field}` is not declared on schema `{schema}`")]
    UnknownField { schema: String, field: String },

    /// An instance document does not fit its schema.
    #[error("cannot decode `{schema}` instance: {reason}")]
    InvalidInstance { schema: String, reason: String },

    /// Failed to read a document from disk.
    #[error("failed to read {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document was read but is not valid for its format.
    #[error("failed to parse {path}: {reason}")]
    DocumentParseError { path: PathBuf, reason: String },
}
