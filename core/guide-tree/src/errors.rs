//! Error types for the guide tree crate.
//!
//! This module defines structured errors for tree construction and for
//! resolving attribute paths against a built tree.

use schemalink_schema::errors::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum TreeError {
    /// A nested schema reference could not be resolved.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A schema declares the same field name twice.
    #[error("class `{class}` declares attribute `{attribute}` more than once")]
    DuplicateAttribute { class: String, attribute: String },

    /// No attribute of the tree has the requested path.
    #[error("no attribute at path `{path}` in tree `{root}`")]
    PathNotFound { path: String, root: String },

    /// More than one attribute of the tree has the requested path.
    #[error("path `{path}` matches {count} attributes in tree `{root}`")]
    AmbiguousPath {
        path: String,
        root: String,
        count: usize,
    },
}
