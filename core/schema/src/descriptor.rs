//! Field and schema descriptors.
//!
//! A [`SchemaDescriptor`] is the explicit, build-once description of one
//! data-model class: its name, the module tag it belongs to and its fields in
//! declaration order. Each [`FieldDescriptor`] records the outer container,
//! the element type (a union when more than one [`TypeRef`] is present) and
//! the link annotations keyed by option name.
//!
//! ```
//! use schemalink_schema::descriptor::{FieldDescriptor, SchemaDescriptor, TypeRef};
//!
//! let measurement = SchemaDescriptor::new("Measurement", "libSrc")
//!     .with_field(FieldDescriptor::new("temperature", TypeRef::float()).link("A", "libA.Sample.temp"))
//!     .with_field(FieldDescriptor::new("samples", TypeRef::schema("Sample")).sequence());
//!
//! assert_eq!(measurement.fields.len(), 2);
//! assert_eq!(measurement.field("temperature").unwrap().link_for("A"), Some("libA.Sample.temp"));
//! ```

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// How a value is wrapped by its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    #[default]
    None,
    #[serde(alias = "list")]
    Sequence,
    #[serde(alias = "dict")]
    Mapping,
}

impl ContainerKind {
    #[must_use]
    pub fn is_container(self) -> bool {
        !matches!(self, ContainerKind::None)
    }
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::None => write!(f, "none"),
            ContainerKind::Sequence => write!(f, "list"),
            ContainerKind::Mapping => write!(f, "dict"),
        }
    }
}

/// Builtin leaf types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
    Any,
}

impl PrimitiveKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" | "str" => Some(PrimitiveKind::String),
            "integer" | "int" => Some(PrimitiveKind::Integer),
            "float" | "number" => Some(PrimitiveKind::Float),
            "boolean" | "bool" => Some(PrimitiveKind::Boolean),
            "any" => Some(PrimitiveKind::Any),
            _ => None,
        }
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::String => write!(f, "string"),
            PrimitiveKind::Integer => write!(f, "integer"),
            PrimitiveKind::Float => write!(f, "float"),
            PrimitiveKind::Boolean => write!(f, "boolean"),
            PrimitiveKind::Any => write!(f, "any"),
        }
    }
}

/// Reference to a nested schema. Unqualified references resolve in the
/// module of the schema declaring the field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaRef {
    pub module: Option<String>,
    pub name: String,
}

impl Display for SchemaRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{module}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One alternative of a field's element type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Schema(SchemaRef),
}

impl TypeRef {
    #[must_use]
    pub fn string() -> Self {
        TypeRef::Primitive(PrimitiveKind::String)
    }

    #[must_use]
    pub fn integer() -> Self {
        TypeRef::Primitive(PrimitiveKind::Integer)
    }

    #[must_use]
    pub fn float() -> Self {
        TypeRef::Primitive(PrimitiveKind::Float)
    }

    #[must_use]
    pub fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveKind::Boolean)
    }

    /// A schema in the same module as the declaring schema.
    #[must_use]
    pub fn schema(name: &str) -> Self {
        TypeRef::Schema(SchemaRef {
            module: None,
            name: name.to_string(),
        })
    }

    /// A schema in another module.
    #[must_use]
    pub fn external(module: &str, name: &str) -> Self {
        TypeRef::Schema(SchemaRef {
            module: Some(module.to_string()),
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn as_schema(&self) -> Option<&SchemaRef> {
        match self {
            TypeRef::Schema(schema_ref) => Some(schema_ref),
            TypeRef::Primitive(_) => None,
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Some(kind) = PrimitiveKind::from_keyword(text) {
            return Ok(TypeRef::Primitive(kind));
        }
        let (module, name) = match text.rsplit_once('.') {
            Some((module, name)) => (Some(module), name),
            None => (None, text),
        };
        if module.is_some_and(str::is_empty) || name.is_empty() {
            return Err(SchemaError::InvalidTypeRef {
                text: text.to_string(),
                reason: "empty segment",
            });
        }
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(SchemaError::InvalidTypeRef {
                text: text.to_string(),
                reason: "not a primitive keyword and not a capitalized class name",
            });
        }
        Ok(TypeRef::Schema(SchemaRef {
            module: module.map(str::to_string),
            name: name.to_string(),
        }))
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{kind}"),
            TypeRef::Schema(schema_ref) => write!(f, "{schema_ref}"),
        }
    }
}

/// Declaration of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub container: ContainerKind,
    /// Element type alternatives; more than one means a union.
    pub types: Vec<TypeRef>,
    /// Option name -> target path string.
    pub links: IndexMap<String, String>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self::union(name, vec![ty])
    }

    #[must_use]
    pub fn union(name: &str, types: Vec<TypeRef>) -> Self {
        Self {
            name: name.to_string(),
            container: ContainerKind::None,
            types,
            links: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn sequence(mut self) -> Self {
        self.container = ContainerKind::Sequence;
        self
    }

    #[must_use]
    pub fn mapping(mut self) -> Self {
        self.container = ContainerKind::Mapping;
        self
    }

    /// Adds a link annotation for `option`.
    #[must_use]
    pub fn link(mut self, option: &str, target: &str) -> Self {
        self.links.insert(option.to_string(), target.to_string());
        self
    }

    #[must_use]
    pub fn link_for(&self, option: &str) -> Option<&str> {
        self.links.get(option).map(String::as_str)
    }

    /// Nested schema alternatives of this field.
    pub fn schema_refs(&self) -> impl Iterator<Item = &SchemaRef> {
        self.types.iter().filter_map(TypeRef::as_schema)
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.schema_refs().next().is_some()
    }

    /// Returns `true` if the only declared alternative is `kind`.
    #[must_use]
    pub fn is_only(&self, kind: PrimitiveKind) -> bool {
        matches!(self.types.as_slice(), [TypeRef::Primitive(k)] if *k == kind)
    }
}

/// Description of one data-model class.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    pub name: String,
    pub module: String,
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    #[must_use]
    pub fn new(name: &str, module: &str) -> Self {
        Self {
            name: name.to_string(),
            module: module.to_string(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Module tag a nested reference resolves in.
    #[must_use]
    pub fn module_of<'a>(&'a self, schema_ref: &'a SchemaRef) -> &'a str {
        schema_ref.module.as_deref().unwrap_or(&self.module)
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}
