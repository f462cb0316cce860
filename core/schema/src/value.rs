//! Dynamic values and schema-typed instances.
//!
//! Source data handed to the linker and the destination objects it produces
//! share one representation: an [`Instance`] pairs a [`SchemaDescriptor`]
//! with field values, and a [`Value`] is any JSON-like datum including nested
//! instances.

use std::{
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use indexmap::IndexMap;
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::descriptor::{FieldDescriptor, SchemaDescriptor};

static NULL_VALUE: Value = Value::Null;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Object(Instance),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the elements of a list whose every element is a nested
    /// instance. The empty list qualifies.
    #[must_use]
    pub fn as_object_list(&self) -> Option<Vec<&Instance>> {
        match self {
            Value::List(items) => items.iter().map(Value::as_object).collect(),
            _ => None,
        }
    }

    /// Text a link rule pattern is matched against.
    ///
    /// Booleans render capitalized and null renders as `None`, so patterns
    /// such as `^True$` written for existing templates keep matching.
    #[must_use]
    pub fn match_text(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            other => other.to_string(),
        }
    }
}

/// Plain text rendering: strings are raw, null is empty.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Object(instance) => write!(f, "{}", instance.class_name()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Object(instance) => instance.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// A value of a schema type.
///
/// Field values are kept apart from the descriptor; fields never set read
/// as [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    schema: Arc<SchemaDescriptor>,
    values: IndexMap<String, Value>,
}

impl Instance {
    #[must_use]
    pub fn new(schema: Arc<SchemaDescriptor>) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    /// Sets `field` and returns the instance, for literal construction.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        debug_assert!(
            self.schema.field(field).is_some(),
            "field `{field}` is not declared on `{}`",
            self.schema.name
        );
        self.values.insert(field.to_string(), value.into());
        self
    }

    /// Sets `field`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if the schema does not declare `field`.
    ///
    /// [`SchemaError::UnknownField`]: crate::errors::SchemaError::UnknownField
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, crate::errors::SchemaError> {
        if self.schema.field(field).is_none() {
            return Err(crate::errors::SchemaError::UnknownField {
                schema: self.schema.name.clone(),
                field: field.to_string(),
            });
        }
        Ok(self.values.insert(field.to_string(), value.into()))
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        &self.schema
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.schema.name
    }

    /// Fields in declaration order, paired with their current value.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.schema.fields.iter().map(|field| {
            let value = self.values.get(&field.name).unwrap_or(&NULL_VALUE);
            (field, value)
        })
    }

    /// Number of fields holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serializes the set fields as a map in declaration order.
impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<(&FieldDescriptor, &Value)> = self
            .fields()
            .filter(|(field, _)| self.values.contains_key(&field.name))
            .collect();
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for (field, value) in set {
            map.serialize_entry(&field.name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, TypeRef};

    fn sample_schema() -> Arc<SchemaDescriptor> {
        Arc::new(
            SchemaDescriptor::new("Sample", "libA")
                .with_field(FieldDescriptor::new("kind", TypeRef::string()))
                .with_field(FieldDescriptor::new("temp", TypeRef::float())),
        )
    }

    #[test]
    fn unset_fields_read_as_null() {
        let sample = Instance::new(sample_schema()).with("temp", 25.0);
        let fields: Vec<_> = sample.fields().map(|(f, v)| (f.name.as_str(), v.clone())).collect();
        assert_eq!(
            fields,
            vec![("kind", Value::Null), ("temp", Value::Float(25.0))]
        );
    }

    #[test]
    fn set_rejects_undeclared_field() {
        let mut sample = Instance::new(sample_schema());
        assert!(sample.set("kind", "glass").unwrap().is_none());
        assert!(sample.set("colour", "red").is_err());
    }

    #[test]
    fn serialize_only_set_fields_in_declaration_order() {
        let sample = Instance::new(sample_schema())
            .with("temp", 25.0)
            .with("kind", "glass");
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"kind":"glass","temp":25.0}"#);
    }

    #[test]
    fn display_renders_plain_text() {
        assert_eq!(Value::from("glass").to_string(), "glass");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(25.0).to_string(), "25.0");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn match_text_capitalizes_booleans_and_names_null() {
        assert_eq!(Value::from(true).match_text(), "True");
        assert_eq!(Value::from(false).match_text(), "False");
        assert_eq!(Value::Null.match_text(), "None");
        assert_eq!(Value::from("glass").match_text(), "glass");
        assert_eq!(Value::from(25.0).match_text(), "25.0");
    }

    #[test]
    fn object_list_requires_every_element_to_be_an_instance() {
        let sample = Instance::new(sample_schema());
        let objects = Value::List(vec![sample.clone().into(), sample.into()]);
        assert_eq!(objects.as_object_list().map(|v| v.len()), Some(2));
        assert_eq!(Value::List(vec![]).as_object_list().map(|v| v.len()), Some(0));
        assert!(Value::from(vec![1, 2]).as_object_list().is_none());
    }
}
