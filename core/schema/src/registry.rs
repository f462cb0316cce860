//! Schema registry.
//!
//! Target paths name their destination class as `moduleTag.ClassName`. The
//! registry maps each module tag to a [`SchemaProvider`] that knows the
//! classes of that module. Providers are registered up front; nothing is
//! looked up from arbitrary strings beyond the registered tags.

use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::{
    descriptor::{SchemaDescriptor, SchemaRef},
    errors::SchemaError,
};

/// Resolves class names for one module tag.
pub trait SchemaProvider: Send + Sync {
    fn tag(&self) -> &str;

    fn schema(&self, name: &str) -> Option<Arc<SchemaDescriptor>>;

    /// Class names known to this provider, in registration order.
    fn schema_names(&self) -> Vec<String>;
}

/// An in-memory module of schema descriptors.
#[derive(Debug, Clone, Default)]
pub struct SchemaModule {
    tag: String,
    schemas: IndexMap<String, Arc<SchemaDescriptor>>,
}

impl SchemaModule {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            schemas: IndexMap::new(),
        }
    }

    /// Adds `schema` to the module. The descriptor's module tag is set to
    /// this module's tag.
    pub fn add_schema(&mut self, mut schema: SchemaDescriptor) -> Arc<SchemaDescriptor> {
        schema.module.clone_from(&self.tag);
        let schema = Arc::new(schema);
        self.schemas.insert(schema.name.clone(), schema.clone());
        schema
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.add_schema(schema);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaProvider for SchemaModule {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn schema(&self, name: &str) -> Option<Arc<SchemaDescriptor>> {
        self.schemas.get(name).cloned()
    }

    fn schema_names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }
}

#[derive(Clone, Default)]
pub struct SchemaRegistry {
    providers: FxHashMap<String, Arc<dyn SchemaProvider>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` under its tag, returning a provider it replaced.
    pub fn register<P: SchemaProvider + 'static>(
        &mut self,
        provider: P,
    ) -> Option<Arc<dyn SchemaProvider>> {
        let tag = provider.tag().to_string();
        self.providers.insert(tag, Arc::new(provider))
    }

    #[must_use]
    pub fn with_provider<P: SchemaProvider + 'static>(mut self, provider: P) -> Self {
        self.register(provider);
        self
    }

    /// Returns the provider registered for `module`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownModule`] if no provider has that tag.
    pub fn provider(&self, module: &str) -> Result<&dyn SchemaProvider, SchemaError> {
        self.providers
            .get(module)
            .map(AsRef::as_ref)
            .ok_or_else(|| SchemaError::UnknownModule {
                module: module.to_string(),
            })
    }

    /// Resolves `module.name` to its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownModule`] or [`SchemaError::UnknownSchema`].
    pub fn resolve(&self, module: &str, name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        self.provider(module)?
            .schema(name)
            .ok_or_else(|| SchemaError::UnknownSchema {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolves a nested reference declared on `owner`.
    ///
    /// # Errors
    ///
    /// See [`SchemaRegistry::resolve`].
    pub fn resolve_ref(
        &self,
        owner: &SchemaDescriptor,
        schema_ref: &SchemaRef,
    ) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        self.resolve(owner.module_of(schema_ref), &schema_ref.name)
    }

    /// Resolves a `module.Class` string such as the one given on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidQualifiedName`] when the string has no
    /// module part, otherwise see [`SchemaRegistry::resolve`].
    pub fn resolve_qualified(&self, qualified: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        match qualified.rsplit_once('.') {
            Some((module, name)) if !module.is_empty() && !name.is_empty() => {
                self.resolve(module, name)
            }
            _ => Err(SchemaError::InvalidQualifiedName(qualified.to_string())),
        }
    }

    /// Registered module tags, sorted.
    #[must_use]
    pub fn modules(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.providers.keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl Debug for SchemaRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("modules", &self.modules())
            .finish()
    }
}
