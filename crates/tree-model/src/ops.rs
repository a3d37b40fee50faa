//! Pure operations from one forest snapshot to the next.
//!
//! Nothing in here mutates its input. Mutating operations clone the forest,
//! apply the change to the clone, and return it; on error the caller still
//! holds the untouched original.

use log::trace;
use std::collections::{HashMap, HashSet};

use crate::error::{Result, TreeError, ValidationError};
use crate::node::{Forest, TreeNode, ROOT_SENTINEL};
use crate::search::collate;

/// Denormalised, read-only view of one node plus its parent's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    /// Parent name, or [`ROOT_SENTINEL`] for root nodes
    pub parent: String,
    pub name: String,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl FlatRecord {
    pub fn is_root(&self) -> bool {
        self.parent == ROOT_SENTINEL
    }
}

/// Depth-first, pre-order lookup by exact name
pub fn find_by_name<'a>(forest: &'a Forest, name: &str) -> Option<&'a TreeNode> {
    forest
        .walk()
        .find(|visit| visit.node.name == name)
        .map(|visit| visit.node)
}

/// Map every node name to its parent node (`None` for roots).
///
/// The map borrows the forest, so it cannot outlive the snapshot it was built from.
pub fn build_parent_map(forest: &Forest) -> HashMap<&str, Option<&TreeNode>> {
    forest
        .walk()
        .map(|visit| (visit.node.name.as_str(), visit.parent))
        .collect()
}

/// Names of `name` and every ancestor above it, nearest first
pub fn ancestors<'a>(
    parents: &HashMap<&'a str, Option<&'a TreeNode>>,
    name: &str,
) -> Vec<&'a str> {
    let mut chain = Vec::new();
    let mut current = parents.get(name).copied().flatten();
    while let Some(parent) = current {
        chain.push(parent.name.as_str());
        current = parents.get(parent.name.as_str()).copied().flatten();
    }
    chain
}

/// Greatest number of edges from any root down to a leaf; 0 for empty or flat forests
pub fn calculate_max_depth(forest: &Forest) -> usize {
    forest
        .roots()
        .iter()
        .map(TreeNode::height)
        .max()
        .unwrap_or(0)
}

/// Tree-view font size in rem, shrinking by 0.1 per level down to 1rem
pub fn font_size_rem(max_depth: usize) -> f32 {
    (2.0 - max_depth as f32 * 0.1).max(1.0)
}

/// One record per node, sorted by name after the traversal.
///
/// The result depends only on the names and the collation, never on where
/// the nodes sit in the tree.
pub fn flatten(forest: &Forest) -> Vec<FlatRecord> {
    let mut records: Vec<FlatRecord> = forest
        .walk()
        .map(|visit| FlatRecord {
            parent: visit.parent_name().unwrap_or(ROOT_SENTINEL).to_string(),
            name: visit.node.name.clone(),
            link: visit.node.link.clone(),
            description: visit.node.description.clone(),
        })
        .collect();

    records.sort_by(|a, b| collate(&a.name, &b.name));
    trace!("flattened {} nodes", records.len());
    records
}

/// Names a node may be attached under: the sentinel first, then every node by name.
///
/// When `editing` names an existing node, that node and its whole subtree
/// are left out so a move can never create a cycle.
pub fn parent_candidates(forest: &Forest, editing: Option<&str>) -> Vec<String> {
    let excluded: HashSet<&str> = editing
        .and_then(|name| find_by_name(forest, name))
        .map(|node| node.subtree_names().into_iter().collect())
        .unwrap_or_default();

    std::iter::once(ROOT_SENTINEL.to_string())
        .chain(
            flatten(forest)
                .into_iter()
                .map(|record| record.name)
                .filter(|name| !excluded.contains(name.as_str())),
        )
        .collect()
}

/// Insert a new node, or update and possibly reparent an existing one.
///
/// `original` is the name the node had before the edit, or `None` when the
/// node is new. `target_parent` is a node name or [`ROOT_SENTINEL`].
///
/// An edited node keeps its existing children; only name, link and
/// description are taken from `node`. If the parent is unchanged the node
/// stays at its position among its siblings, otherwise it is appended to the
/// new parent's children.
pub fn insert_or_move(
    forest: &Forest,
    original: Option<&str>,
    node: TreeNode,
    target_parent: &str,
) -> Result<Forest> {
    match original {
        None => insert_new(forest, node, target_parent),
        Some(original) => update_existing(forest, original, node, target_parent),
    }
}

fn insert_new(forest: &Forest, node: TreeNode, target_parent: &str) -> Result<Forest> {
    let existing = forest.names();
    let mut seen = HashSet::new();
    for name in node.subtree_names() {
        reject_reserved(name)?;
        if existing.contains(name) || !seen.insert(name) {
            return Err(TreeError::DuplicateName(name.to_string()));
        }
    }

    trace!("inserting {} under {}", node.name, target_parent);
    let mut next = forest.clone();
    attach(&mut next, node, target_parent)?;
    Ok(next)
}

fn update_existing(
    forest: &Forest,
    original: &str,
    node: TreeNode,
    target_parent: &str,
) -> Result<Forest> {
    let current = find_by_name(forest, original)
        .ok_or_else(|| TreeError::NodeNotFound(original.to_string()))?;

    reject_reserved(&node.name)?;
    if node.name != original && forest.contains(&node.name) {
        return Err(TreeError::DuplicateName(node.name));
    }
    if current.contains(target_parent) {
        return Err(TreeError::CyclicMove {
            node: original.to_string(),
            target: target_parent.to_string(),
        });
    }

    let replacement = TreeNode {
        children: current.children.clone(),
        ..node
    };

    let parents = build_parent_map(forest);
    let old_parent = parents
        .get(original)
        .copied()
        .flatten()
        .map_or(ROOT_SENTINEL, |parent| parent.name.as_str());

    let mut next = forest.clone();
    if old_parent == target_parent {
        trace!("replacing {} in place under {}", original, old_parent);
        let slot = find_mut(next.roots_mut(), original)
            .ok_or_else(|| TreeError::NodeNotFound(original.to_string()))?;
        *slot = replacement;
    } else {
        trace!("moving {} from {} to {}", original, old_parent, target_parent);
        if target_parent != ROOT_SENTINEL && !forest.contains(target_parent) {
            return Err(TreeError::NodeNotFound(target_parent.to_string()));
        }
        detach(next.roots_mut(), original)
            .ok_or_else(|| TreeError::NodeNotFound(original.to_string()))?;
        attach(&mut next, replacement, target_parent)?;
    }
    Ok(next)
}

/// Summary of what deleting a node will remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    pub name: String,
    /// Every descendant of the node, pre-order
    pub descendants: Vec<String>,
}

impl DeletionPlan {
    /// True when the node has children, so the whole subtree goes with it
    pub fn requires_confirmation(&self) -> bool {
        !self.descendants.is_empty()
    }

    /// Number of nodes the deletion removes, including the node itself
    pub fn removed_count(&self) -> usize {
        self.descendants.len() + 1
    }
}

pub fn deletion_plan(forest: &Forest, name: &str) -> Result<DeletionPlan> {
    let node =
        find_by_name(forest, name).ok_or_else(|| TreeError::NodeNotFound(name.to_string()))?;
    Ok(DeletionPlan {
        name: node.name.clone(),
        descendants: node
            .subtree_names()
            .into_iter()
            .skip(1)
            .map(str::to_string)
            .collect(),
    })
}

/// Remove a node and all of its descendants.
///
/// Confirmation for nodes with children is the caller's job; this always
/// removes the whole subtree.
pub fn delete_subtree(forest: &Forest, name: &str) -> Result<Forest> {
    let mut next = forest.clone();
    let removed =
        detach(next.roots_mut(), name).ok_or_else(|| TreeError::NodeNotFound(name.to_string()))?;
    trace!("deleted {} ({} nodes)", name, removed.subtree_len());
    Ok(next)
}

pub fn delete_all() -> Forest {
    Forest::new()
}

fn reject_reserved(name: &str) -> Result<()> {
    if name == ROOT_SENTINEL {
        return Err(ValidationError::ReservedName(name.to_string()).into());
    }
    Ok(())
}

fn attach(forest: &mut Forest, node: TreeNode, target_parent: &str) -> Result<()> {
    if target_parent == ROOT_SENTINEL {
        forest.roots_mut().push(node);
        return Ok(());
    }
    let parent = find_mut(forest.roots_mut(), target_parent)
        .ok_or_else(|| TreeError::NodeNotFound(target_parent.to_string()))?;
    parent.children.push(node);
    Ok(())
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], name: &str) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.name == name {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, name) {
            return Some(found);
        }
    }
    None
}

fn detach(nodes: &mut Vec<TreeNode>, name: &str) -> Option<TreeNode> {
    if let Some(index) = nodes.iter().position(|node| node.name == name) {
        return Some(nodes.remove(index));
    }
    nodes
        .iter_mut()
        .find_map(|node| detach(&mut node.children, name))
}
