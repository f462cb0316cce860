#![warn(clippy::pedantic)]
//! Guide trees for schemalink.
//!
//! A guide tree mirrors the shape of a schema type as a strict alternation of
//! class nodes and attribute nodes stored in an arena. Attribute nodes are
//! the write targets of a conversion: leaf values are stored on them under a
//! [`WriteKey`](nodes::WriteKey) and later turned back into instances.
pub mod arena;
pub mod builder;
pub mod errors;
pub mod nodes;
