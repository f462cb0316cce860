//! Guide tree builder that mirrors a schema type as a tree of class and
//! attribute nodes.
//!
//! The [`GuideTreeBuilder`] walks a [`SchemaDescriptor`] depth-first:
//!
//! 1. Create a `ClassNode` for the schema, recording its module tag and the
//!    container kind imposed by the attribute holding it
//! 2. For each field in declaration order create an `AttributeNode` with the
//!    field's own container kind and an empty value map
//! 3. For each schema alternative of the field (a union yields several),
//!    resolve it through the registry and expand it below the attribute,
//!    propagating the field's container kind
//!
//! A schema is never expanded below itself: if its name already appears on
//! the chain of ancestor classes, the attribute is left without that child.
//! This bounds the tree for self-referencing and mutually recursive schemas.
//!
//! # Example
//!
//! ```
//! use schemalink_guide_tree::builder::GuideTreeBuilder;
//! use schemalink_schema::descriptor::{ContainerKind, FieldDescriptor, SchemaDescriptor, TypeRef};
//! use schemalink_schema::registry::{SchemaModule, SchemaRegistry};
//!
//! let mut lib_a = SchemaModule::new("libA");
//! let sample = lib_a.add_schema(
//!     SchemaDescriptor::new("Sample", "libA")
//!         .with_field(FieldDescriptor::new("temp", TypeRef::float())),
//! );
//! let registry = SchemaRegistry::new().with_provider(lib_a);
//!
//! let tree = GuideTreeBuilder::build_tree(&registry, &sample, ContainerKind::None).unwrap();
//! assert_eq!(tree.root_name(), "Sample");
//! assert!(tree.find_attribute("temp").is_ok());
//! ```

use std::{collections::BTreeMap, sync::Arc};

use schemalink_schema::{
    descriptor::{ContainerKind, SchemaDescriptor},
    registry::SchemaRegistry,
};
use rustc_hash::FxHashSet;

use crate::{
    arena::GuideTree,
    errors::TreeError,
    nodes::{AttributeNode, ClassNode, GuideNode, NodeId},
};

pub struct GuideTreeBuilder<'r> {
    registry: &'r SchemaRegistry,
    tree: GuideTree,
    ancestors: Vec<String>,
}

impl<'r> GuideTreeBuilder<'r> {
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            tree: GuideTree::default(),
            ancestors: Vec::new(),
        }
    }

    /// Builds the guide tree of `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Schema`] if a nested schema cannot be resolved
    /// and [`TreeError::DuplicateAttribute`] if a schema repeats a field name.
    pub fn build_tree(
        registry: &'r SchemaRegistry,
        schema: &Arc<SchemaDescriptor>,
        container: ContainerKind,
    ) -> Result<GuideTree, TreeError> {
        let mut builder = Self::new(registry);
        builder.build_class(schema, container, None, "")?;
        tracing::debug!(
            "built guide tree `{}` with {} nodes",
            schema.qualified_name(),
            builder.tree.len()
        );
        Ok(builder.tree)
    }

    fn build_class(
        &mut self,
        schema: &Arc<SchemaDescriptor>,
        container: ContainerKind,
        parent: Option<NodeId>,
        path: &str,
    ) -> Result<NodeId, TreeError> {
        let class_id = self.tree.next_id();
        self.tree.add_node(
            GuideNode::Class(ClassNode {
                id: class_id,
                name: schema.name.clone(),
                module_tag: schema.module.clone(),
                container,
                schema: schema.clone(),
            }),
            parent,
        );

        self.ancestors.push(schema.name.clone());
        let result = self.build_attributes(schema, class_id, path);
        self.ancestors.pop();
        result.map(|()| class_id)
    }

    fn build_attributes(
        &mut self,
        schema: &Arc<SchemaDescriptor>,
        class_id: NodeId,
        path: &str,
    ) -> Result<(), TreeError> {
        let mut seen = FxHashSet::default();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(TreeError::DuplicateAttribute {
                    class: schema.name.clone(),
                    attribute: field.name.clone(),
                });
            }

            let attribute_id = self.tree.next_id();
            self.tree.add_node(
                GuideNode::Attribute(AttributeNode {
                    id: attribute_id,
                    name: field.name.clone(),
                    container: field.container,
                    values: BTreeMap::new(),
                }),
                Some(class_id),
            );
            let attribute_path = if path.is_empty() {
                field.name.clone()
            } else {
                format!("{path}.{}", field.name)
            };
            self.tree
                .path_index
                .entry(attribute_path.clone())
                .or_default()
                .push(attribute_id);

            for schema_ref in field.schema_refs() {
                let nested = self.registry.resolve_ref(schema, schema_ref)?;
                if self.ancestors.contains(&nested.name) {
                    tracing::trace!(
                        "not expanding `{}` below `{attribute_path}`: already an ancestor",
                        nested.name
                    );
                    continue;
                }
                self.build_class(&nested, field.container, Some(attribute_id), &attribute_path)?;
            }
        }
        Ok(())
    }
}
