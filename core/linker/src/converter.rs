//! Depth-first projection of a source instance into the root guide trees.
//!
//! Each field of the instance is handled by shape:
//!
//! * a single nested instance: the template entry at the child path decides
//!   which targets are active inside it, then the converter recurses with
//!   the same object index;
//! * a sequence of nested instances: every element chooses its own targets
//!   and is converted with index `obj_index + i`, giving the destination
//!   multiplicity;
//! * anything else is a leaf value, maps of nested instances included: a
//!   target from the active template entry is written at `Index(obj_index)`,
//!   otherwise the field's annotation for the option is written at
//!   `Composite(attr_path, obj_index)`; a leaf with neither is skipped.

use std::borrow::Cow;

use schemalink_guide_tree::nodes::WriteKey;
use schemalink_schema::{
    descriptor::{ContainerKind, FieldDescriptor},
    value::{Instance, Value},
};

use crate::{
    errors::LinkError,
    roots::Roots,
    target_path::TargetPath,
    template::{LinkTemplate, TargetMap, TemplateEntry},
};

pub struct TreeConverter<'a> {
    roots: &'a mut Roots,
    option: &'a str,
    template: &'a LinkTemplate,
}

impl<'a> TreeConverter<'a> {
    pub fn new(roots: &'a mut Roots, option: &'a str, template: &'a LinkTemplate) -> Self {
        Self { roots, option, template }
    }

    /// Writes every mapped leaf of `instance` into the roots.
    ///
    /// # Errors
    ///
    /// Fails on an ambiguous rule match, a rule reading an undeclared
    /// attribute, a malformed annotation, or a target that does not
    /// resolve to exactly one attribute of a known root.
    pub fn convert(&mut self, instance: &Instance) -> Result<(), LinkError> {
        self.convert_at(instance, "", 0, None)
    }

    fn convert_at(
        &mut self,
        instance: &Instance,
        attr_path: &str,
        obj_index: usize,
        active: Option<&'a TargetMap>,
    ) -> Result<(), LinkError> {
        for (field, value) in instance.fields() {
            let child_path = if attr_path.is_empty() {
                field.name.clone()
            } else {
                format!("{attr_path}.{}", field.name)
            };

            match value {
                Value::Object(nested) => {
                    let targets = self.matching_targets(nested, &child_path)?;
                    self.convert_at(nested, &child_path, obj_index, targets)?;
                }
                Value::List(_) if field.container == ContainerKind::Sequence => {
                    if let Some(items) = value.as_object_list() {
                        for (i, item) in items.into_iter().enumerate() {
                            let targets = self.matching_targets(item, &child_path)?;
                            self.convert_at(item, &child_path, obj_index + i, targets)?;
                        }
                    } else {
                        self.convert_leaf(field, value, attr_path, obj_index, active)?;
                    }
                }
                Value::Null => {
                    tracing::trace!("skipping unset `{child_path}`");
                }
                _ => self.convert_leaf(field, value, attr_path, obj_index, active)?,
            }
        }
        Ok(())
    }

    fn convert_leaf(
        &mut self,
        field: &FieldDescriptor,
        value: &Value,
        attr_path: &str,
        obj_index: usize,
        active: Option<&'a TargetMap>,
    ) -> Result<(), LinkError> {
        let (target, key) = if let Some(target) = active.and_then(|targets| targets.get(&field.name)) {
            (Cow::Borrowed(target), WriteKey::Index(obj_index))
        } else if let Some(link) = field.link_for(self.option) {
            (
                Cow::Owned(link.parse::<TargetPath>()?),
                WriteKey::composite(attr_path, obj_index),
            )
        } else {
            tracing::trace!("no target for `{}` at `{attr_path}`", field.name);
            return Ok(());
        };
        self.assign(&target, key, value)
    }

    /// Active targets for `candidate` placed at `path`.
    fn matching_targets(&self, candidate: &Instance, path: &str) -> Result<Option<&'a TargetMap>, LinkError> {
        let template: &'a LinkTemplate = self.template;
        let rules = match template.entry(path) {
            None => return Ok(None),
            Some(TemplateEntry::Targets(targets)) => return Ok(Some(targets)),
            Some(TemplateEntry::Rules(rules)) => rules,
        };

        let mut matched = Vec::new();
        for rule in rules {
            if candidate.schema().field(&rule.attribute).is_none() {
                return Err(LinkError::UnknownMatchAttribute {
                    path: path.to_string(),
                    class: candidate.class_name().to_string(),
                    attribute: rule.attribute.clone(),
                });
            }
            let text = candidate
                .get(&rule.attribute)
                .map_or_else(|| Value::Null.match_text(), Value::match_text);
            if rule.matches(&text) {
                matched.push(rule);
            }
        }

        match matched.len() {
            0 => {
                tracing::debug!("no rule at `{path}` matches `{}`", candidate.class_name());
                Ok(None)
            }
            1 => Ok(matched.pop().map(|rule| &rule.targets)),
            _ => Err(LinkError::AmbiguousMapping {
                class: candidate.class_name().to_string(),
                path: path.to_string(),
                matches: matched.len(),
            }),
        }
    }

    fn assign(&mut self, target: &TargetPath, key: WriteKey, value: &Value) -> Result<(), LinkError> {
        let tree = self
            .roots
            .get_mut(&target.root)
            .ok_or_else(|| LinkError::RootNotFound {
                root: target.root.clone(),
            })?;
        tree.write(&target.node_path(), key, value.clone())
            .map_err(|source| LinkError::TargetResolution {
                target: target.to_string(),
                source,
            })?;
        Ok(())
    }
}
