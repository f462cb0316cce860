#![warn(clippy::pedantic)]
//! Schema descriptors for schemalink.
//!
//! Data-model classes are described explicitly: a [`SchemaDescriptor`] lists
//! the fields of one class in declaration order and each
//! [`FieldDescriptor`] carries its container kind, element type alternatives
//! and link annotations. Descriptors are grouped into modules and resolved by
//! module tag through a [`SchemaRegistry`].
//!
//! Source and destination data are [`Instance`]s of those descriptors.
//!
//! [`SchemaDescriptor`]: descriptor::SchemaDescriptor
//! [`FieldDescriptor`]: descriptor::FieldDescriptor
//! [`SchemaRegistry`]: registry::SchemaRegistry
//! [`Instance`]: value::Instance

pub mod descriptor;
pub mod document;
pub mod errors;
pub mod format;
pub mod registry;
pub mod value;
