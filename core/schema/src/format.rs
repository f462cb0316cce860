//! Document formats accepted for schema, template and instance files.

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from the file extension, `default` when the
    /// extension is missing or unknown.
    #[must_use]
    pub fn from_path(path: &Path, default: DocumentFormat) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            Some("toml") => DocumentFormat::Toml,
            Some("json") => DocumentFormat::Json,
            _ => default,
        }
    }

    /// Parses `text` in this format.
    ///
    /// # Errors
    ///
    /// Returns the parser's message as a `String`; callers attach the path.
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, String> {
        match self {
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Renders `value` in this format.
    ///
    /// # Errors
    ///
    /// Returns the serializer's message as a `String`.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String, String> {
        match self {
            DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::to_string(value).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        }
    }
}

/// Reads and parses `path`, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`SchemaError::FileReadError`] or [`SchemaError::DocumentParseError`].
pub fn read_document<T: DeserializeOwned>(
    path: &Path,
    default: DocumentFormat,
) -> Result<T, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    DocumentFormat::from_path(path, default)
        .parse(&text)
        .map_err(|reason| SchemaError::DocumentParseError {
            path: path.to_path_buf(),
            reason,
        })
}
