//! This crate contains schemalink end to end tests

#[cfg(test)]
mod utils;

mod converter;
mod end_to_end;
mod guide_tree;
mod materializer;
mod template;
