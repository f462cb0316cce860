//! Link templates: per-attribute-path target assignments kept outside the
//! data model.
//!
//! A template document maps the dotted attribute path of a nested source
//! object (`sample`, `sample.parts`) to either
//!
//! * a flat map `attribute -> target path`, or
//! * a list of rules `{attribute, pattern, targets}`; a rule applies to an
//!   object when the text of its `attribute` matches `pattern` from the start.
//!
//! ```yaml
//! __model__: libSrc.Measurement
//! sample:
//!   - attribute: kind
//!     pattern: glass
//!     targets: { mass: libA.Sample.mass }
//!   - attribute: kind
//!     pattern: metal
//!     targets: { mass: libB.Vessel.mass }
//! ```

use std::{io::ErrorKind, path::Path};

use indexmap::IndexMap;
use regex::Regex;
use schemalink_schema::format::DocumentFormat;
use serde_json::Value as JsonValue;

use crate::{errors::LinkError, target_path::TargetPath};

/// Document key holding the qualified source model name.
pub const MODEL_KEY: &str = "__model__";
/// Document key holding library name -> location metadata.
pub const SOURCES_KEY: &str = "__sources__";

/// Source attribute name -> target path.
pub type TargetMap = IndexMap<String, TargetPath>;

#[derive(Debug, Clone)]
pub struct LinkRule {
    /// Field of the candidate object whose value is matched.
    pub attribute: String,
    pattern: Regex,
    pub targets: TargetMap,
}

impl LinkRule {
    /// Compiles `pattern` so that it only matches at the start of the text.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidPattern`] if the pattern does not compile.
    pub fn new(path: &str, attribute: &str, pattern: &str, targets: TargetMap) -> Result<Self, LinkError> {
        let compiled = Regex::new(&format!("^(?:{pattern})")).map_err(|source| LinkError::InvalidPattern {
            path: path.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            attribute: attribute.to_string(),
            pattern: compiled,
            targets,
        })
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[derive(Debug, Clone)]
pub enum TemplateEntry {
    Targets(TargetMap),
    Rules(Vec<LinkRule>),
}

impl TemplateEntry {
    /// Every target path of the entry, rule targets included.
    pub fn target_paths(&self) -> Box<dyn Iterator<Item = &TargetPath> + '_> {
        match self {
            TemplateEntry::Targets(targets) => Box::new(targets.values()),
            TemplateEntry::Rules(rules) => Box::new(rules.iter().flat_map(|rule| rule.targets.values())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkTemplate {
    model: Option<String>,
    sources: IndexMap<String, String>,
    entries: IndexMap<String, TemplateEntry>,
}

impl LinkTemplate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a template file; YAML, TOML or JSON by extension (YAML when
    /// the extension is unknown). A missing file is an empty template.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::TemplateRead`] or [`LinkError::TemplateParse`]
    /// for unreadable documents, and any error of [`LinkTemplate::from_document`].
    pub fn load(path: &Path) -> Result<Self, LinkError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!("no template at {}, using an empty template", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LinkError::TemplateRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let format = DocumentFormat::from_path(path, DocumentFormat::Yaml);
        let template = Self::parse(&text, format).map_err(|err| match err {
            LinkError::TemplateParse { reason, .. } => LinkError::TemplateParse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!("loaded template {} with {} entries", path.display(), template.len());
        Ok(template)
    }

    /// Parses template text in `format`.
    ///
    /// # Errors
    ///
    /// See [`LinkTemplate::load`].
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, LinkError> {
        let document: IndexMap<String, JsonValue> =
            format.parse(text).map_err(|reason| LinkError::TemplateParse {
                path: "<inline>".into(),
                reason,
            })?;
        Self::from_document(document)
    }

    /// Builds a template from a parsed document.
    ///
    /// Only the shape is checked: malformed rule entries and non-string
    /// targets are skipped with a warning. Target paths and patterns are
    /// compiled here.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidTargetPath`] or [`LinkError::InvalidPattern`].
    pub fn from_document(document: IndexMap<String, JsonValue>) -> Result<Self, LinkError> {
        let mut template = Self::default();
        for (key, value) in document {
            if key == MODEL_KEY || key == SOURCES_KEY {
                template.read_metadata(&key, value);
                continue;
            }
            match value {
                JsonValue::Object(object) => {
                    let object = match object.get("targets") {
                        Some(JsonValue::Object(inner)) if object.len() == 1 => inner.clone(),
                        _ => object,
                    };
                    let targets = parse_targets(&key, &object)?;
                    template.entries.insert(key, TemplateEntry::Targets(targets));
                }
                JsonValue::Array(items) => {
                    let rules = parse_rules(&key, &items)?;
                    template.entries.insert(key, TemplateEntry::Rules(rules));
                }
                other => {
                    tracing::warn!(
                        "skipping template entry `{key}`: expected a mapping or a rule list, found `{other}`"
                    );
                }
            }
        }
        Ok(template)
    }

    fn read_metadata(&mut self, key: &str, value: JsonValue) {
        match value {
            JsonValue::String(model) if key == MODEL_KEY => self.model = Some(model),
            JsonValue::Object(sources) if key == SOURCES_KEY => {
                self.sources = sources
                    .into_iter()
                    .filter_map(|(name, location)| match location {
                        JsonValue::String(location) => Some((name, location)),
                        _ => None,
                    })
                    .collect();
            }
            other => tracing::warn!("ignoring malformed `{key}` value `{other}`"),
        }
    }

    /// Adds or replaces the entry at `path`.
    pub fn insert(&mut self, path: &str, entry: TemplateEntry) -> Option<TemplateEntry> {
        self.entries.insert(path.to_string(), entry)
    }

    #[must_use]
    pub fn with_entry(mut self, path: &str, entry: TemplateEntry) -> Self {
        self.insert(path, entry);
        self
    }

    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&TemplateEntry> {
        self.entries.get(path)
    }

    /// Every target path mentioned by the template, in document order.
    pub fn target_paths(&self) -> impl Iterator<Item = &TargetPath> {
        self.entries.values().flat_map(TemplateEntry::target_paths)
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    #[must_use]
    pub fn sources(&self) -> &IndexMap<String, String> {
        &self.sources
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_targets(path: &str, object: &serde_json::Map<String, JsonValue>) -> Result<TargetMap, LinkError> {
    let mut targets = TargetMap::new();
    for (attribute, target) in object {
        let JsonValue::String(target) = target else {
            tracing::warn!("skipping target of `{path}.{attribute}`: expected a string, found `{target}`");
            continue;
        };
        targets.insert(attribute.clone(), target.parse()?);
    }
    Ok(targets)
}

fn parse_rules(path: &str, items: &[JsonValue]) -> Result<Vec<LinkRule>, LinkError> {
    let mut rules = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(JsonValue::Object(targets)) = item.get("targets") else {
            tracing::warn!("skipping rule {i} of `{path}`: no `targets` mapping");
            continue;
        };
        let (Some(attribute), Some(pattern)) = (
            item.get("attribute").and_then(JsonValue::as_str),
            item.get("pattern").and_then(JsonValue::as_str),
        ) else {
            tracing::warn!("skipping rule {i} of `{path}`: `attribute` and `pattern` must be strings");
            continue;
        };
        let targets = parse_targets(path, targets)?;
        rules.push(LinkRule::new(path, attribute, pattern, targets)?);
    }
    Ok(rules)
}
