#![warn(clippy::pedantic)]
//! Linking engine for schemalink
//!
//! This crate projects an instance of one data model onto the classes of
//! other, independently designed data models. Which source attribute feeds
//! which destination attribute is declared either by link annotations on the
//! source schema (selected by an *option* name) or by an external
//! [`LinkTemplate`](template::LinkTemplate).
//!
//! ## Pipeline
//!
//! 1. **Resolve roots** - every destination class named by a target path in
//!    the template or an annotation becomes a root with its own guide tree
//!    ([`roots`])
//! 2. **Convert** - the source instance is walked depth-first and each mapped
//!    leaf value is written onto an attribute of a guide tree under a write
//!    key that records its multiplicity ([`converter`])
//! 3. **Materialize** - every filled tree is turned into a destination
//!    instance ([`materialize`])
//!
//! Template rules pick targets per nested object: a rule matches when the
//! text of one of the object's attributes matches its pattern, and an object
//! matched by more than one rule is an error. Template targets take precedence
//! over annotations; attributes with neither are dropped.
//!
//! ## Quick Start
//!
//! ```ignore
//! use schemalink_linker::{LinkerBuilder, template::LinkTemplate};
//!
//! let template = LinkTemplate::load(Path::new("links.yaml"))?;
//! let mut linker = LinkerBuilder::new(&registry, "A")
//!     .with_template(template)
//!     .resolve_roots(source.schema())?;
//! linker.convert(&source)?;
//! let destinations = linker.materialize();
//! ```
//!
//! ## Public Modules
//!
//! - [`target_path`] - `module.Root.attr...` addresses
//! - [`template`] - link templates and their loader
//! - [`authoring`] - skeleton templates for hand editing
//! - [`errors`] - error types

use std::{marker::PhantomData, sync::Arc};

use schemalink_schema::{
    descriptor::SchemaDescriptor,
    registry::SchemaRegistry,
    value::Instance,
};

use crate::{
    converter::TreeConverter,
    errors::LinkError,
    materialize::TargetMaterializer,
    roots::{RootResolver, Roots},
    template::LinkTemplate,
};

pub mod authoring;
pub mod converter;
pub mod errors;
pub mod materialize;
pub mod roots;
pub mod target_path;
pub mod template;

/// Marker state: option and template are being configured.
pub struct LinkerInitState;

/// Marker state: destination roots are resolved and accept conversions.
pub struct RootsResolvedState;

/// Type alias for a linker ready to convert instances.
pub type ResolvedLinker<'r> = LinkerBuilder<'r, RootsResolvedState>;

/// Builder running one link session.
///
/// Uses the typestate pattern so that conversions can only run once the
/// destination roots exist.
pub struct LinkerBuilder<'r, S> {
    registry: &'r SchemaRegistry,
    option: String,
    template: LinkTemplate,
    roots: Roots,
    _state: PhantomData<S>,
}

impl<'r> LinkerBuilder<'r, LinkerInitState> {
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry, option: &str) -> Self {
        LinkerBuilder {
            registry,
            option: option.to_string(),
            template: LinkTemplate::default(),
            roots: Roots::new(),
            _state: PhantomData,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: LinkTemplate) -> Self {
        self.template = template;
        self
    }

    /// Builds the guide tree of every destination root reachable from
    /// `source` under the configured option and template.
    ///
    /// # Errors
    ///
    /// See [`RootResolver::resolve_roots`].
    pub fn resolve_roots(self, source: &Arc<SchemaDescriptor>) -> Result<ResolvedLinker<'r>, LinkError> {
        let roots = RootResolver::new(self.registry).resolve_roots(source, &self.option, &self.template)?;
        Ok(LinkerBuilder {
            registry: self.registry,
            option: self.option,
            template: self.template,
            roots,
            _state: PhantomData,
        })
    }
}

impl LinkerBuilder<'_, RootsResolvedState> {
    /// Converts `instance` into the roots. Repeated calls accumulate into the
    /// same trees; a later write at an existing key replaces the earlier one.
    ///
    /// # Errors
    ///
    /// See [`TreeConverter::convert`].
    pub fn convert(&mut self, instance: &Instance) -> Result<(), LinkError> {
        TreeConverter::new(&mut self.roots, &self.option, &self.template).convert(instance)
    }

    #[must_use]
    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// Consume the builder and return one destination instance per root.
    #[must_use = "consumes builder and returns the destination instances"]
    pub fn materialize(self) -> Vec<Instance> {
        TargetMaterializer::materialize_all(&self.roots)
    }
}

/// Resolves roots for `instance`, converts it and materializes the result.
///
/// # Errors
///
/// Any [`LinkError`] raised while resolving roots or converting.
pub fn link(
    registry: &SchemaRegistry,
    instance: &Instance,
    option: &str,
    template: LinkTemplate,
) -> Result<Vec<Instance>, LinkError> {
    let mut linker = LinkerBuilder::new(registry, option)
        .with_template(template)
        .resolve_roots(instance.schema())?;
    linker.convert(instance)?;
    Ok(linker.materialize())
}
