//! Discovery of destination roots.
//!
//! Roots come from two places: every target path of the link template and
//! every link annotation, for the selected option, on the source schema or
//! any schema reachable through its fields. Each distinct root class gets
//! one guide tree. When both sources name the same root, the tree built
//! from the annotation is kept.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use schemalink_guide_tree::{arena::GuideTree, builder::GuideTreeBuilder};
use schemalink_schema::{
    descriptor::{ContainerKind, SchemaDescriptor},
    registry::SchemaRegistry,
};

use crate::{errors::LinkError, target_path::TargetPath, template::LinkTemplate};

/// Root class name -> guide tree, in discovery order.
pub type Roots = IndexMap<String, GuideTree>;

pub struct RootResolver<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> RootResolver<'r> {
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Builds one guide tree per destination root reachable from `source`
    /// under `option`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidTargetPath`] for malformed annotations,
    /// and registry or tree errors when a root or nested schema cannot be
    /// resolved.
    pub fn resolve_roots(
        &self,
        source: &Arc<SchemaDescriptor>,
        option: &str,
        template: &LinkTemplate,
    ) -> Result<Roots, LinkError> {
        let mut roots = self.roots_from_template(template)?;
        let annotated = self.roots_from_annotations(source, option)?;
        for (name, tree) in annotated {
            roots.insert(name, tree);
        }
        tracing::debug!(
            "resolved {} roots for `{}` under option `{option}`: {:?}",
            roots.len(),
            source.qualified_name(),
            roots.keys().collect::<Vec<_>>()
        );
        Ok(roots)
    }

    fn roots_from_template(&self, template: &LinkTemplate) -> Result<Roots, LinkError> {
        let mut roots = Roots::new();
        for target in template.target_paths() {
            if !roots.contains_key(&target.root) {
                let tree = self.build_root(target)?;
                roots.insert(target.root.clone(), tree);
            }
        }
        Ok(roots)
    }

    fn roots_from_annotations(&self, source: &Arc<SchemaDescriptor>, option: &str) -> Result<Roots, LinkError> {
        let mut roots = Roots::new();
        let mut visited = FxHashSet::default();
        self.scan_schema(source, option, &mut visited, &mut roots)?;
        Ok(roots)
    }

    fn scan_schema(
        &self,
        schema: &Arc<SchemaDescriptor>,
        option: &str,
        visited: &mut FxHashSet<String>,
        roots: &mut Roots,
    ) -> Result<(), LinkError> {
        if !visited.insert(schema.qualified_name()) {
            return Ok(());
        }
        for field in &schema.fields {
            if let Some(link) = field.link_for(option) {
                let target: TargetPath = link.parse()?;
                if !roots.contains_key(&target.root) {
                    let tree = self.build_root(&target)?;
                    roots.insert(target.root.clone(), tree);
                }
            }
            for schema_ref in field.schema_refs() {
                let nested = self.registry.resolve_ref(schema, schema_ref)?;
                self.scan_schema(&nested, option, visited, roots)?;
            }
        }
        Ok(())
    }

    fn build_root(&self, target: &TargetPath) -> Result<GuideTree, LinkError> {
        let schema = self.registry.resolve(&target.module, &target.root)?;
        tracing::debug!("building root `{}` for target `{target}`", schema.qualified_name());
        Ok(GuideTreeBuilder::build_tree(self.registry, &schema, ContainerKind::None)?)
    }
}
