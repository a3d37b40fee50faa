//! Pre-order traversal over a forest

use crate::node::TreeNode;

/// One step of a walk: the node, its immediate parent, and its depth (roots = 0)
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a TreeNode,
    pub parent: Option<&'a TreeNode>,
    pub depth: usize,
}

impl<'a> Visit<'a> {
    /// The parent's name, or `None` for root nodes
    pub fn parent_name(&self) -> Option<&'a str> {
        self.parent.map(|p| p.name.as_str())
    }
}

/// Iterator visiting every node, parent before children, siblings in order.
///
/// Uses an explicit stack so deep trees cannot overflow the call stack.
pub struct Walker<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Walker<'a> {
    /// Walk the given sibling sequence and all of its descendants
    pub fn new(roots: &'a [TreeNode]) -> Self {
        // Push in reverse so the first root is popped first
        let stack = roots
            .iter()
            .rev()
            .map(|node| Visit {
                node,
                parent: None,
                depth: 0,
            })
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for Walker<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Add children in reverse order so they're popped in correct order
        for child in current.node.children.iter().rev() {
            self.stack.push(Visit {
                node: child,
                parent: Some(current.node),
                depth: current.depth + 1,
            });
        }

        Some(current)
    }
}
