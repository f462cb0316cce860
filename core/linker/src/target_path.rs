//! Target paths name one attribute of a destination schema:
//! `module.Root.attr1.attr2...`.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::errors::LinkError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    /// Module tag resolved through the schema registry.
    pub module: String,
    /// Destination root class; it becomes the key of the root map.
    pub root: String,
    /// Attribute names below the root, outermost first.
    pub attributes: Vec<String>,
}

impl TargetPath {
    /// The attribute-only dotted path used to address the root's guide tree.
    #[must_use]
    pub fn node_path(&self) -> String {
        self.attributes.join(".")
    }
}

impl FromStr for TargetPath {
    type Err = LinkError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| LinkError::InvalidTargetPath {
            text: text.to_string(),
            reason,
        };
        let segments: Vec<&str> = text.trim().split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid("empty path segment"));
        }
        let [module, root, attributes @ ..] = segments.as_slice() else {
            return Err(invalid("expected at least `module.Root`"));
        };
        if !root.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(invalid("root class name must start with an uppercase letter"));
        }
        Ok(TargetPath {
            module: (*module).to_string(),
            root: (*root).to_string(),
            attributes: attributes.iter().map(ToString::to_string).collect(),
        })
    }
}

impl Display for TargetPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.root)?;
        for attribute in &self.attributes {
            write!(f, ".{attribute}")?;
        }
        Ok(())
    }
}
