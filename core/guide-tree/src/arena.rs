use schemalink_schema::value::Value;
use rustc_hash::FxHashMap;

use crate::{
    errors::TreeError,
    nodes::{AttributeNode, ClassNode, GuideNode, NodeId, WriteKey},
};

/// Arena holding one guide tree.
///
/// Nodes are addressed by [`NodeId`]; node `0` is the root class. Parent and
/// children handles live in a separate route table, so the parent link is a
/// plain lookup and never owns anything.
#[derive(Default, Clone, Debug)]
pub struct GuideTree {
    pub(crate) nodes: Vec<GuideNode>,
    pub(crate) node_routes: Vec<NodeRoute>,
    /// Attribute-only dotted path -> attribute nodes with that path.
    pub(crate) path_index: FxHashMap<String, Vec<NodeId>>,
}

impl GuideTree {
    /// Adds a node to the arena and records its parent-child relationship.
    ///
    /// # Panics
    ///
    /// Panics if the node's ID is not the next free handle.
    pub(crate) fn add_node(&mut self, node: GuideNode, parent: Option<NodeId>) {
        assert_eq!(
            node.id() as usize,
            self.nodes.len(),
            "Node ID must be the next free handle"
        );
        let id = node.id();
        self.nodes.push(node);
        if let Some(parent_id) = parent {
            self.node_routes[parent_id as usize].children.push(id);
        }
        self.node_routes.push(NodeRoute {
            id,
            parent,
            children: vec![],
        });
    }

    /// # Panics
    ///
    /// Panics if the arena outgrows `u32` handles.
    pub(crate) fn next_id(&self) -> NodeId {
        NodeId::try_from(self.nodes.len()).expect("guide tree exceeds u32::MAX nodes")
    }

    /// The root class.
    ///
    /// # Panics
    ///
    /// Panics on an empty arena; trees returned by the builder always have a root.
    #[must_use]
    pub fn root(&self) -> &ClassNode {
        self.nodes
            .first()
            .and_then(GuideNode::as_class)
            .expect("guide tree has a root class")
    }

    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root().name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn find_node(&self, id: NodeId) -> Option<&GuideNode> {
        self.nodes.get(id as usize)
    }

    #[must_use]
    pub fn find_parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.node_routes.get(id as usize).and_then(|route| route.parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_routes
            .get(id as usize)
            .map(|route| route.children.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn class(&self, id: NodeId) -> Option<&ClassNode> {
        self.find_node(id).and_then(GuideNode::as_class)
    }

    #[must_use]
    pub fn attribute(&self, id: NodeId) -> Option<&AttributeNode> {
        self.find_node(id).and_then(GuideNode::as_attribute)
    }

    pub fn attribute_mut(&mut self, id: NodeId) -> Option<&mut AttributeNode> {
        self.nodes
            .get_mut(id as usize)
            .and_then(GuideNode::as_attribute_mut)
    }

    /// Attribute children of a class node, in declaration order.
    pub fn attributes_of(&self, class_id: NodeId) -> impl Iterator<Item = &AttributeNode> + '_ {
        self.children(class_id)
            .iter()
            .filter_map(|child| self.attribute(*child))
    }

    /// Class children (union alternatives) of an attribute node.
    pub fn classes_of(&self, attribute_id: NodeId) -> impl Iterator<Item = &ClassNode> + '_ {
        self.children(attribute_id)
            .iter()
            .filter_map(|child| self.class(*child))
    }

    /// All attribute nodes, in construction order.
    pub fn attribute_nodes(&self) -> impl Iterator<Item = &AttributeNode> + '_ {
        self.nodes.iter().filter_map(GuideNode::as_attribute)
    }

    /// All class nodes, in construction order.
    pub fn class_nodes(&self) -> impl Iterator<Item = &ClassNode> + '_ {
        self.nodes.iter().filter_map(GuideNode::as_class)
    }

    /// Collects `id` and every node below it that satisfies `comparator`.
    pub fn get_children_cmp<F>(&self, id: NodeId, comparator: F) -> Vec<NodeId>
    where
        F: Fn(&GuideNode) -> bool,
    {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();

        if self.find_node(id).is_some() {
            stack.push(id);
        }

        while let Some(current) = stack.pop() {
            if let Some(node) = self.find_node(current)
                && comparator(node)
            {
                result.push(current);
            }
            stack.extend(self.children(current).iter().rev());
        }

        result
    }

    /// Dotted path of attribute names from the root down to `id`; class
    /// names are not part of the path.
    #[must_use]
    pub fn attribute_path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(attribute) = self.attribute(node_id) {
                names.push(attribute.name.as_str());
            }
            current = self.find_parent_node(node_id);
        }
        names.reverse();
        names.join(".")
    }

    /// Attribute nodes whose attribute path equals `path`.
    #[must_use]
    pub fn find_attributes_by_path(&self, path: &str) -> &[NodeId] {
        self.path_index
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The unique attribute node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PathNotFound`] when nothing matches and
    /// [`TreeError::AmbiguousPath`] when several attributes share the path.
    pub fn find_attribute(&self, path: &str) -> Result<NodeId, TreeError> {
        match self.find_attributes_by_path(path) {
            [id] => Ok(*id),
            [] => Err(TreeError::PathNotFound {
                path: path.to_string(),
                root: self.root_name().to_string(),
            }),
            matches => Err(TreeError::AmbiguousPath {
                path: path.to_string(),
                root: self.root_name().to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Stores `value` at `key` on the attribute at `path`, returning the
    /// value it replaced.
    ///
    /// # Errors
    ///
    /// See [`GuideTree::find_attribute`].
    pub fn write(&mut self, path: &str, key: WriteKey, value: Value) -> Result<Option<Value>, TreeError> {
        let id = self.find_attribute(path)?;
        let root = self.root_name().to_string();
        let attribute = self.attribute_mut(id).ok_or_else(|| TreeError::PathNotFound {
            path: path.to_string(),
            root,
        })?;
        tracing::trace!("{path}[{key}] <- {value}");
        Ok(attribute.values.insert(key, value))
    }

    /// Returns `true` if any attribute at or below `id` holds a value.
    #[must_use]
    pub fn subtree_has_values(&self, id: NodeId) -> bool {
        !self
            .get_children_cmp(id, |node| {
                node.as_attribute().is_some_and(AttributeNode::has_values)
            })
            .is_empty()
    }
}

#[derive(Clone, Default, Debug)]
pub struct NodeRoute {
    pub id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}
