//! Turns filled guide trees into destination instances.
//!
//! Values written for one source element share its positional index, whether
//! they were routed by the template (`Index(i)`) or by an annotation
//! (`Composite(path, i)`). Nested sequences and mappings are therefore built
//! from the distinct indices found below a class, so all leaves of one source
//! element land in the same destination element.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use schemalink_guide_tree::{
    arena::GuideTree,
    nodes::{AttributeNode, ClassNode, WriteKey},
};
use schemalink_schema::{
    descriptor::ContainerKind,
    value::{Instance, Value},
};

use crate::roots::Roots;

pub struct TargetMaterializer<'t> {
    tree: &'t GuideTree,
}

impl<'t> TargetMaterializer<'t> {
    #[must_use]
    pub fn new(tree: &'t GuideTree) -> Self {
        Self { tree }
    }

    /// One destination instance per root, in discovery order.
    #[must_use]
    pub fn materialize_all(roots: &Roots) -> Vec<Instance> {
        roots
            .values()
            .map(|tree| TargetMaterializer::new(tree).materialize())
            .collect()
    }

    /// An instance of the root schema holding every written value.
    #[must_use]
    pub fn materialize(&self) -> Instance {
        self.class_instance(self.tree.root(), None)
    }

    /// `slot` restricts the values read to those written for one source
    /// element.
    fn class_instance(&self, class: &ClassNode, slot: Option<usize>) -> Instance {
        let mut instance = Instance::new(class.schema.clone());
        for attribute in self.tree.attributes_of(class.id) {
            if let Some(value) = self.attribute_value(attribute, slot) {
                instance = instance.with(&attribute.name, value);
            }
        }
        instance
    }

    fn attribute_value(&self, attribute: &AttributeNode, slot: Option<usize>) -> Option<Value> {
        if let Some(class) = self
            .tree
            .classes_of(attribute.id)
            .find(|class| self.tree.subtree_has_values(class.id))
        {
            return self.nested_value(attribute, class, slot);
        }
        primitive_value(attribute, slot)
    }

    fn nested_value(&self, attribute: &AttributeNode, class: &ClassNode, slot: Option<usize>) -> Option<Value> {
        match attribute.container {
            ContainerKind::None => {
                let instance = self.class_instance(class, slot);
                (!instance.is_empty()).then_some(Value::Object(instance))
            }
            ContainerKind::Sequence => {
                let items: Vec<Value> = self
                    .subtree_slots(class, slot)
                    .into_iter()
                    .map(|index| Value::Object(self.class_instance(class, Some(index))))
                    .collect();
                (!items.is_empty()).then_some(Value::List(items))
            }
            ContainerKind::Mapping => {
                let entries: IndexMap<String, Value> = self
                    .subtree_slots(class, slot)
                    .into_iter()
                    .map(|index| (index.to_string(), Value::Object(self.class_instance(class, Some(index)))))
                    .collect();
                (!entries.is_empty()).then_some(Value::Map(entries))
            }
        }
    }

    /// Distinct element indices written below `class`, restricted to `slot`
    /// when given.
    fn subtree_slots(&self, class: &ClassNode, slot: Option<usize>) -> BTreeSet<usize> {
        self.tree
            .get_children_cmp(class.id, |node| node.as_attribute().is_some())
            .into_iter()
            .filter_map(|id| self.tree.attribute(id))
            .flat_map(|attribute| attribute.values.keys())
            .map(WriteKey::index)
            .filter(|index| slot.is_none_or(|wanted| *index == wanted))
            .collect()
    }
}

fn primitive_value(attribute: &AttributeNode, slot: Option<usize>) -> Option<Value> {
    let mut values = attribute
        .values
        .iter()
        .filter(|(k, _)| slot.is_none_or(|wanted| k.index() == wanted))
        .peekable();
    values.peek()?;

    match attribute.container {
        ContainerKind::None => values.next().map(|(_, value)| value.clone()),
        ContainerKind::Sequence => {
            let mut items = Vec::new();
            for (_, value) in values {
                match value {
                    Value::List(inner) => items.extend(inner.iter().cloned()),
                    other => items.push(other.clone()),
                }
            }
            Some(Value::List(items))
        }
        ContainerKind::Mapping => {
            let entries: Vec<(&WriteKey, &Value)> = values.collect();
            if let [(_, Value::Map(map))] = entries.as_slice() {
                return Some(Value::Map(map.clone()));
            }
            Some(Value::Map(
                entries
                    .into_iter()
                    .map(|(k, value)| (k.to_string(), value.clone()))
                    .collect(),
            ))
        }
    }
}
