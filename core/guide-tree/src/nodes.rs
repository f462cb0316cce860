use core::fmt;
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    sync::Arc,
};

use schemalink_schema::{
    descriptor::{ContainerKind, SchemaDescriptor},
    value::Value,
};

/// Handle of a node inside its [`GuideTree`](crate::arena::GuideTree).
pub type NodeId = u32;

/// Key under which a leaf value is stored on an [`AttributeNode`].
///
/// `Index` keys come from positional writes whose multiplicity was
/// established by an ancestor sequence. `Composite` keys come from
/// annotation-only writes and render as `"<attrPath>.<objIndex>"`.
/// All `Index` keys order before all `Composite` keys.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum WriteKey {
    Index(usize),
    Composite { path: String, index: usize },
}

impl WriteKey {
    #[must_use]
    pub fn composite(path: &str, index: usize) -> Self {
        WriteKey::Composite {
            path: path.to_string(),
            index,
        }
    }

    /// Position of the source element that produced the write.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            WriteKey::Index(index) | WriteKey::Composite { index, .. } => *index,
        }
    }
}

impl Display for WriteKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            WriteKey::Index(index) => write!(f, "{index}"),
            WriteKey::Composite { path, index } => write!(f, "{path}.{index}"),
        }
    }
}

/// One schema class within a guide tree.
#[derive(Clone, Debug)]
pub struct ClassNode {
    pub id: NodeId,
    pub name: String,
    pub module_tag: String,
    /// Wrapping imposed by the attribute holding this class.
    pub container: ContainerKind,
    pub schema: Arc<SchemaDescriptor>,
}

/// One field slot of a [`ClassNode`]; the write target for leaf data.
#[derive(Clone, Debug)]
pub struct AttributeNode {
    pub id: NodeId,
    pub name: String,
    pub container: ContainerKind,
    pub values: BTreeMap<WriteKey, Value>,
}

impl AttributeNode {
    #[must_use]
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

#[derive(Clone, Debug)]
pub enum GuideNode {
    Class(ClassNode),
    Attribute(AttributeNode),
}

impl GuideNode {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            GuideNode::Class(n) => n.id,
            GuideNode::Attribute(n) => n.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            GuideNode::Class(n) => &n.name,
            GuideNode::Attribute(n) => &n.name,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassNode> {
        match self {
            GuideNode::Class(n) => Some(n),
            GuideNode::Attribute(_) => None,
        }
    }

    #[must_use]
    pub fn as_attribute(&self) -> Option<&AttributeNode> {
        match self {
            GuideNode::Attribute(n) => Some(n),
            GuideNode::Class(_) => None,
        }
    }

    pub fn as_attribute_mut(&mut self) -> Option<&mut AttributeNode> {
        match self {
            GuideNode::Attribute(n) => Some(n),
            GuideNode::Class(_) => None,
        }
    }
}
