//! Plain-text tree and table rendering

use std::collections::BTreeSet;
use tree_model::ops::FlatRecord;
use tree_model::{Forest, TreeNode};

/// Indented outline of the forest.
///
/// With `expanded`, the tree behaves like a collapsed-by-default widget:
/// roots are always shown, children only under expanded nodes, and names in
/// `matches` are marked with `*`.
pub fn render_tree(
    forest: &Forest,
    expanded: Option<&BTreeSet<String>>,
    matches: &BTreeSet<String>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for root in forest.roots() {
        render_node(root, 0, expanded, matches, &mut lines);
    }
    lines
}

fn render_node(
    node: &TreeNode,
    depth: usize,
    expanded: Option<&BTreeSet<String>>,
    matches: &BTreeSet<String>,
    lines: &mut Vec<String>,
) {
    let is_open = expanded.map_or(true, |set| set.contains(&node.name));
    let marker = match (node.is_leaf(), is_open) {
        (true, _) => "-",
        (false, true) => "v",
        (false, false) => ">",
    };
    let star = if matches.contains(&node.name) { " *" } else { "" };
    lines.push(format!("{}{} {}{}", "  ".repeat(depth), marker, node, star));

    if is_open {
        for child in &node.children {
            render_node(child, depth + 1, expanded, matches, lines);
        }
    }
}

/// Aligned table with parent, name, link and description columns
pub fn render_table(records: &[FlatRecord]) -> Vec<String> {
    let header = ["PARENT", "NAME", "LINK", "DESCRIPTION"];
    let rows: Vec<[&str; 4]> = records
        .iter()
        .map(|r| {
            [
                r.parent.as_str(),
                r.name.as_str(),
                r.link.as_deref().unwrap_or(""),
                r.description.as_deref().unwrap_or(""),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(header)
        .chain(rows)
        .map(|row| {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ");
            line.trim_end().to_string()
        })
        .collect()
}
