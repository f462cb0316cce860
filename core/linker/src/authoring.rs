//! Skeleton templates for hand editing.
//!
//! A skeleton lists every attribute of the source model with the placeholder
//! target [`PLACEHOLDER_TARGET`]: one entry keyed by the root class name for
//! its direct attributes, then one entry per nested class path, either as a
//! flat map or as a single catch-all rule.

use std::collections::VecDeque;

use indexmap::IndexMap;
use schemalink_guide_tree::{arena::GuideTree, nodes::GuideNode};
use serde::Serialize;

use crate::template::{MODEL_KEY, SOURCES_KEY};

pub const PLACEHOLDER_TARGET: &str = "Enter target";
pub const PLACEHOLDER_RULE_ATTRIBUTE: &str = "Name of the target to check for";
pub const PLACEHOLDER_SOURCE: (&str, &str) = ("LibName", "URL to the library");

#[derive(Debug, Clone, Serialize)]
pub struct SkeletonRule {
    pub attribute: String,
    pub pattern: String,
    pub targets: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SkeletonEntry {
    Targets(IndexMap<String, String>),
    Rules(Vec<SkeletonRule>),
}

/// A template document ready to be written out and filled in.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDocument {
    #[serde(rename = "__model__")]
    pub model: String,
    #[serde(rename = "__sources__")]
    pub sources: IndexMap<String, String>,
    #[serde(flatten)]
    pub entries: IndexMap<String, SkeletonEntry>,
}

impl TemplateDocument {
    /// Builds the skeleton of the source model whose guide tree is `tree`.
    /// `simple` selects flat maps over rule lists for nested classes.
    #[must_use]
    pub fn from_tree(tree: &GuideTree, simple: bool) -> Self {
        let root = tree.root();
        let mut entries = IndexMap::new();

        let root_targets = placeholders(
            tree.attributes_of(root.id)
                .filter(|attribute| !attribute.container.is_container())
                .map(|attribute| attribute.name.as_str()),
        );
        entries.insert(root.name.clone(), SkeletonEntry::Targets(root_targets));

        let mut queue = VecDeque::from([root.id]);
        while let Some(id) = queue.pop_front() {
            queue.extend(tree.children(id));
            let Some(GuideNode::Class(class)) = tree.find_node(id) else {
                continue;
            };
            let path = tree.attribute_path(class.id);
            if path.is_empty() {
                continue;
            }
            let targets = placeholders(tree.attributes_of(class.id).map(|attribute| attribute.name.as_str()));
            let entry = if simple {
                SkeletonEntry::Targets(targets)
            } else {
                SkeletonEntry::Rules(vec![SkeletonRule {
                    attribute: PLACEHOLDER_RULE_ATTRIBUTE.to_string(),
                    pattern: ".*".to_string(),
                    targets,
                }])
            };
            entries.insert(path, entry);
        }

        tracing::debug!("generated skeleton for `{}` with {} entries", root.schema.qualified_name(), entries.len());
        Self {
            model: root.schema.qualified_name(),
            sources: IndexMap::from([(PLACEHOLDER_SOURCE.0.to_string(), PLACEHOLDER_SOURCE.1.to_string())]),
            entries,
        }
    }

    /// Document keys in output order, metadata first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        [MODEL_KEY, SOURCES_KEY]
            .into_iter()
            .chain(self.entries.keys().map(String::as_str))
    }
}

fn placeholders<'a>(names: impl Iterator<Item = &'a str>) -> IndexMap<String, String> {
    names
        .map(|name| (name.to_string(), PLACEHOLDER_TARGET.to_string()))
        .collect()
}
