//! Error types for the linker crate.

use std::path::PathBuf;

use schemalink_guide_tree::errors::TreeError;
use schemalink_schema::errors::SchemaError;
use thiserror::Error;

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum LinkError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A target root could not be turned into a guide tree.
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("invalid target path `{text}`: {reason}")]
    InvalidTargetPath { text: String, reason: &'static str },

    #[error("invalid pattern `{pattern}` at `{path}`: {source}")]
    InvalidPattern {
        path: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// More than one rule of a rule list matched the same object.
    #[error(
        "object `{class}` at `{path}` matches for {matches} targets; link patterns must apply only once"
    )]
    AmbiguousMapping {
        class: String,
        path: String,
        matches: usize,
    },

    #[error("rule at `{path}` matches on attribute `{attribute}`, which `{class}` does not declare")]
    UnknownMatchAttribute {
        path: String,
        class: String,
        attribute: String,
    },

    /// A write targets a root for which no tree was resolved.
    #[error("no target tree for root `{root}`")]
    RootNotFound { root: String },

    /// A target path does not resolve to exactly one attribute of its root.
    #[error("cannot resolve target `{target}`: {source}")]
    TargetResolution {
        target: String,
        #[source]
        source: TreeError,
    },

    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template {path}: {reason}")]
    TemplateParse { path: PathBuf, reason: String },
}
