//! Core node types for the forest model

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::walk::Walker;

/// Name reported as the parent of every root node.
///
/// Never a valid node name: validation and decoding both reject it.
pub const ROOT_SENTINEL: &str = "No parent (root node)";

/// A single labeled node, owning its ordered children.
///
/// The `name` is the node's identity; it is unique across the whole forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique, trimmed display name
    pub name: String,
    /// Optional URL, stored with an explicit scheme
    #[serde(default)]
    pub link: Option<String>,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered children, owned exclusively by this node
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<TreeNode>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TreeNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TreeNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TreeNode {
    /// Create a leaf node with no link or description
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: None,
            description: None,
            children: Vec::new(),
        }
    }

    /// Set the link
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a child, returning the updated node
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of edges on the longest path from this node down to a leaf
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }

    /// Names of this node and every descendant, in pre-order
    pub fn subtree_names(&self) -> Vec<&str> {
        Walker::new(std::slice::from_ref(self))
            .map(|visit| visit.node.name.as_str())
            .collect()
    }

    /// Returns true if `name` is this node or one of its descendants
    pub fn contains(&self, name: &str) -> bool {
        Walker::new(std::slice::from_ref(self)).any(|visit| visit.node.name == name)
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(link) = &self.link {
            write!(f, " <{}>", link)?;
        }
        Ok(())
    }
}

/// An ordered sequence of independent rooted trees.
///
/// Forests are treated as immutable snapshots: every operation in
/// [`crate::ops`] borrows one and returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<TreeNode>,
}

impl Forest {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest from root nodes without checking name uniqueness.
    ///
    /// Use [`Forest::try_from_roots`] for untrusted input.
    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    /// Build a forest, failing with the first name that appears twice
    pub fn try_from_roots(roots: Vec<TreeNode>) -> Result<Self, String> {
        let forest = Self { roots };
        if let Some(name) = forest.first_duplicate() {
            return Err(name.to_string());
        }
        Ok(forest)
    }

    /// The top-level nodes, in order
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub(crate) fn roots_mut(&mut self) -> &mut Vec<TreeNode> {
        &mut self.roots
    }

    /// Returns true if the forest has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes in the forest
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::subtree_len).sum()
    }

    /// Pre-order walk over every node in the forest
    pub fn walk(&self) -> Walker<'_> {
        Walker::new(&self.roots)
    }

    /// Every node name in the forest
    pub fn names(&self) -> HashSet<&str> {
        self.walk().map(|visit| visit.node.name.as_str()).collect()
    }

    /// Returns true if a node with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.walk().any(|visit| visit.node.name == name)
    }

    /// The first name, in pre-order, that was already seen earlier in the walk
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.walk()
            .map(|visit| visit.node.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

impl From<Vec<TreeNode>> for Forest {
    fn from(roots: Vec<TreeNode>) -> Self {
        Self::from_roots(roots)
    }
}
