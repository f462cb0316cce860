#![warn(clippy::pedantic)]
//! Core Orchestration Crate for schemalink
//!
//! This crate provides the entry points for converting instances of one data
//! model into instances of other data models. It wires together schema
//! loading, link templates, the linking engine and template authoring.
//!
//! ## Overview
//!
//! ```text
//! schema documents → SchemaRegistry
//! source instance + option + link template → guide trees → destination instances
//! ```
//!
//! A *schema document* describes the classes of one module. A source class
//! declares, per field and per option name, which destination attribute the
//! field feeds (`libA.Sample.temp`). A *link template* maps the same kind of
//! targets from outside the data model, and can select targets per nested
//! object with pattern rules.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use schemalink::{convert_data_model, load_instance, load_registry};
//!
//! fn convert() -> anyhow::Result<serde_json::Value> {
//!     let registry = load_registry(&[PathBuf::from("schemas")])?;
//!     let source = load_instance(&registry, "libSrc.Measurement", Path::new("data.json"))?;
//!     let destinations = convert_data_model(&registry, &source, "A", Some(Path::new("links.yaml")))?;
//!     Ok(schemalink::destinations_to_json(&destinations))
//! }
//! ```
//!
//! ## Template Authoring
//!
//! [`generate_template`] writes a skeleton listing every attribute path of a
//! source model with placeholder targets; [`write_template`] renders it as
//! TOML, YAML or JSON depending on the file extension.
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use schemalink::{generate_template, load_registry, write_template};
//!
//! let registry = load_registry(&[PathBuf::from("schemas")])?;
//! let schema = registry.resolve_qualified("libSrc.Measurement")?;
//! let document = generate_template(&registry, &schema, false)?;
//! write_template(&document, Path::new("links.toml"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! This crate is a thin orchestration layer over:
//!
//! - [`schemalink_schema`] - descriptors, registry, documents and instances
//! - [`schemalink_guide_tree`] - arena-backed guide trees
//! - [`schemalink_linker`] - templates, root resolution, conversion and materialization
//!
//! ## Error Handling
//!
//! All public functions return `anyhow::Result`; library errors are wrapped
//! with the file or model they concern.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use schemalink_guide_tree::builder::GuideTreeBuilder;
use schemalink_linker::{authoring::TemplateDocument, template::LinkTemplate};
use schemalink_schema::{
    descriptor::{ContainerKind, SchemaDescriptor},
    document::{decode_instance, load_module},
    format::DocumentFormat,
    registry::{SchemaProvider, SchemaRegistry},
    value::Instance,
};
use walkdir::WalkDir;

pub use schemalink_linker::authoring;
pub use schemalink_schema::value;

const SCHEMA_EXTENSIONS: [&str; 4] = ["yaml", "yml", "toml", "json"];

/// Loads schema documents into a registry.
///
/// Each path is either a schema document or a directory searched recursively
/// for `.yaml`, `.yml`, `.toml` and `.json` documents, visited in file name
/// order. A module loaded later replaces an earlier one with the same tag.
///
/// # Errors
///
/// Returns an error if a path cannot be read or a document is malformed.
pub fn load_registry(paths: &[PathBuf]) -> anyhow::Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    for path in paths {
        for file in schema_files(path)? {
            let module = load_module(&file).with_context(|| format!("loading schemas from {}", file.display()))?;
            if module.is_empty() {
                tracing::warn!("{} declares no schemas for module `{}`", file.display(), module.tag());
            }
            if registry.register(module).is_some() {
                tracing::warn!("module from {} replaces an earlier module with the same tag", file.display());
            }
        }
    }
    tracing::debug!("registry holds modules {:?}", registry.modules());
    Ok(registry)
}

fn schema_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", path.display()))?;
        let is_schema = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if entry.file_type().is_file() && is_schema {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Reads a JSON document as an instance of the qualified class `model`
/// (`module.Class`).
///
/// # Errors
///
/// Returns an error if the model is unknown, the file cannot be read, or the
/// document does not fit the model.
pub fn load_instance(registry: &SchemaRegistry, model: &str, path: &Path) -> anyhow::Result<Instance> {
    let schema = registry.resolve_qualified(model)?;
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let json: serde_json::Value = DocumentFormat::from_path(path, DocumentFormat::Json)
        .parse(&text)
        .map_err(|reason| anyhow::anyhow!("failed to parse {}: {reason}", path.display()))?;
    decode_instance(registry, &schema, &json)
        .with_context(|| format!("decoding {} as `{model}`", path.display()))
}

/// Converts `instance` into one destination instance per target root.
///
/// Targets come from the link annotations selected by `option` and from the
/// template at `template_path`. Without a path, or when the file does not
/// exist, only annotations apply.
///
/// # Errors
///
/// Returns an error if the template is malformed, a target cannot be
/// resolved, or a nested object matches more than one template rule.
pub fn convert_data_model(
    registry: &SchemaRegistry,
    instance: &Instance,
    option: &str,
    template_path: Option<&Path>,
) -> anyhow::Result<Vec<Instance>> {
    let template = match template_path {
        Some(path) => LinkTemplate::load(path).with_context(|| format!("loading template {}", path.display()))?,
        None => LinkTemplate::new(),
    };
    if let Some(model) = template.model()
        && model != instance.schema().qualified_name()
    {
        tracing::warn!(
            "template was written for `{model}`, converting `{}`",
            instance.schema().qualified_name()
        );
    }
    let destinations = schemalink_linker::link(registry, instance, option, template)
        .with_context(|| format!("converting `{}` with option `{option}`", instance.class_name()))?;
    tracing::debug!("produced {} destination instances", destinations.len());
    Ok(destinations)
}

/// Renders destination instances as `{RootClassName: data}`.
#[must_use]
pub fn destinations_to_json(destinations: &[Instance]) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for destination in destinations {
        let data = serde_json::to_value(destination).unwrap_or(serde_json::Value::Null);
        object.insert(destination.class_name().to_string(), data);
    }
    serde_json::Value::Object(object)
}

/// Builds a skeleton template for `schema`; `simple` selects flat entries
/// over rule lists for nested classes.
///
/// # Errors
///
/// Returns an error if a nested schema cannot be resolved.
pub fn generate_template(
    registry: &SchemaRegistry,
    schema: &Arc<SchemaDescriptor>,
    simple: bool,
) -> anyhow::Result<TemplateDocument> {
    let tree = GuideTreeBuilder::build_tree(registry, schema, ContainerKind::None)
        .with_context(|| format!("building guide tree of `{}`", schema.qualified_name()))?;
    Ok(TemplateDocument::from_tree(&tree, simple))
}

/// Writes `document` to `path`: YAML for `.yaml`/`.yml`, JSON for `.json`,
/// TOML otherwise.
///
/// # Errors
///
/// Returns an error if the document cannot be rendered or written.
pub fn write_template(document: &TemplateDocument, path: &Path) -> anyhow::Result<()> {
    let text = DocumentFormat::from_path(path, DocumentFormat::Toml)
        .render(document)
        .map_err(|reason| anyhow::anyhow!("failed to render template: {reason}"))?;
    std::fs::write(path, text).with_context(|| format!("writing template {}", path.display()))?;
    tracing::debug!("wrote template {}", path.display());
    Ok(())
}
