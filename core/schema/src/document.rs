//! Schema documents and instance decoding.
//!
//! A schema document describes one module:
//!
//! ```yaml
//! module: libA
//! schemas:
//!   Sample:
//!     fields:
//!       - name: kind
//!         type: string
//!       - name: parts
//!         type: Part|libB.Vessel
//!         container: list
//!         links:
//!           A: libC.Record.items.name
//! ```

use std::{path::Path, sync::Arc};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    descriptor::{ContainerKind, FieldDescriptor, PrimitiveKind, SchemaDescriptor, TypeRef},
    errors::SchemaError,
    format::{DocumentFormat, read_document},
    registry::{SchemaModule, SchemaProvider, SchemaRegistry},
    value::{Instance, Value},
};

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    module: String,
    #[serde(default)]
    schemas: IndexMap<String, SchemaEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct SchemaEntry {
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    container: ContainerKind,
    #[serde(default)]
    links: IndexMap<String, String>,
}

impl SchemaDocument {
    fn into_module(self) -> Result<SchemaModule, SchemaError> {
        let mut module = SchemaModule::new(&self.module);
        for (name, entry) in self.schemas {
            let mut schema = SchemaDescriptor::new(&name, &self.module);
            for field in entry.fields {
                let types = field
                    .ty
                    .split('|')
                    .map(str::parse)
                    .collect::<Result<Vec<TypeRef>, _>>()?;
                schema.fields.push(FieldDescriptor {
                    name: field.name,
                    container: field.container,
                    types,
                    links: field.links,
                });
            }
            module.add_schema(schema);
        }
        Ok(module)
    }
}

/// Parses a schema document.
///
/// # Errors
///
/// Returns [`SchemaError::DocumentParseError`] for malformed documents and
/// [`SchemaError::InvalidTypeRef`] for unparsable field types.
pub fn parse_module(text: &str, format: DocumentFormat) -> Result<SchemaModule, SchemaError> {
    let document: SchemaDocument =
        format
            .parse(text)
            .map_err(|reason| SchemaError::DocumentParseError {
                path: "<inline>".into(),
                reason,
            })?;
    document.into_module()
}

/// Loads a schema document from `path` (YAML unless the extension says otherwise).
///
/// # Errors
///
/// See [`parse_module`]; I/O failures are [`SchemaError::FileReadError`].
pub fn load_module(path: &Path) -> Result<SchemaModule, SchemaError> {
    let document: SchemaDocument = read_document(path, DocumentFormat::Yaml)?;
    let module = document.into_module()?;
    tracing::debug!(
        "loaded module `{}` ({} schemas) from {}",
        module.tag(),
        module.len(),
        path.display()
    );
    Ok(module)
}

/// Decodes a JSON document into an instance of `schema`.
///
/// Objects under schema-typed fields become nested instances. When a union
/// offers several schema alternatives, the first one declaring every key of
/// the object is chosen.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidInstance`] when the document does not fit,
/// [`SchemaError::UnknownField`] for undeclared keys, or a registry error
/// when a nested schema cannot be resolved.
pub fn decode_instance(
    registry: &SchemaRegistry,
    schema: &Arc<SchemaDescriptor>,
    json: &serde_json::Value,
) -> Result<Instance, SchemaError> {
    let serde_json::Value::Object(object) = json else {
        return Err(SchemaError::InvalidInstance {
            schema: schema.name.clone(),
            reason: format!("expected a JSON object, found `{json}`"),
        });
    };
    let mut instance = Instance::new(schema.clone());
    for (key, raw) in object {
        let Some(field) = schema.field(key) else {
            return Err(SchemaError::UnknownField {
                schema: schema.name.clone(),
                field: key.clone(),
            });
        };
        let value = decode_field(registry, schema, field, raw)?;
        instance.set(key, value)?;
    }
    Ok(instance)
}

fn decode_field(
    registry: &SchemaRegistry,
    owner: &SchemaDescriptor,
    field: &FieldDescriptor,
    raw: &serde_json::Value,
) -> Result<Value, SchemaError> {
    match (field.container, raw) {
        (_, serde_json::Value::Null) => Ok(Value::Null),
        (ContainerKind::Sequence, serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| decode_element(registry, owner, field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        (ContainerKind::Mapping, serde_json::Value::Object(entries)) => entries
            .iter()
            .map(|(key, item)| Ok((key.clone(), decode_element(registry, owner, field, item)?)))
            .collect::<Result<IndexMap<_, _>, SchemaError>>()
            .map(Value::Map),
        (ContainerKind::None, _) => decode_element(registry, owner, field, raw),
        (container, _) => Err(SchemaError::InvalidInstance {
            schema: owner.name.clone(),
            reason: format!(
                "field `{}` is declared as `{container}` but holds `{raw}`",
                field.name
            ),
        }),
    }
}

fn decode_element(
    registry: &SchemaRegistry,
    owner: &SchemaDescriptor,
    field: &FieldDescriptor,
    raw: &serde_json::Value,
) -> Result<Value, SchemaError> {
    if let serde_json::Value::Object(object) = raw
        && field.is_nested()
    {
        for schema_ref in field.schema_refs() {
            let nested = registry.resolve_ref(owner, schema_ref)?;
            if object.keys().all(|key| nested.field(key).is_some()) {
                return decode_instance(registry, &nested, raw).map(Value::Object);
            }
        }
        return Err(SchemaError::InvalidInstance {
            schema: owner.name.clone(),
            reason: format!(
                "no alternative of field `{}` declares every key of `{raw}`",
                field.name
            ),
        });
    }
    Ok(decode_primitive(raw, field.is_only(PrimitiveKind::Float)))
}

fn decode_primitive(raw: &serde_json::Value, as_float: bool) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(*v),
        serde_json::Value::Number(n) => match n.as_i64() {
            #[allow(clippy::cast_precision_loss)]
            Some(i) if as_float => Value::Float(i as f64),
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::List(
            items
                .iter()
                .map(|item| decode_primitive(item, as_float))
                .collect(),
        ),
        serde_json::Value::Object(entries) => Value::Map(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), decode_primitive(item, as_float)))
                .collect(),
        ),
    }
}
