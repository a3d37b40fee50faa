//! JSON persistence format: a top-level array of root nodes

use serde::Deserialize;

use crate::error::{Result, TreeError};
use crate::node::{Forest, TreeNode};
use crate::validate::check_stored;

/// Pretty-printed JSON, two-space indented, every field written out
pub fn encode(forest: &Forest) -> Result<String> {
    serde_json::to_string_pretty(forest).map_err(|e| TreeError::Encode(e.to_string()))
}

/// Parse and validate a forest.
///
/// Missing or `null` `children` are read as empty. Nesting depth is not
/// limited, so anything [`encode`] wrote reads back. Fails with
/// [`TreeError::Parse`] on malformed JSON, a wrong shape, or a node whose
/// fields break the rules a form submission enforces, and with
/// [`TreeError::DuplicateName`] if any name appears twice anywhere in the forest.
pub fn decode(text: &str) -> Result<Forest> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let roots = Vec::<TreeNode>::deserialize(&mut deserializer).map_err(parse_error)?;
    deserializer.end().map_err(parse_error)?;

    let forest = Forest::from_roots(roots);
    for visit in forest.walk() {
        check_stored(visit.node).map_err(|e| {
            TreeError::Parse(format!("node \"{}\": {}", visit.node.name, e))
        })?;
    }

    if let Some(name) = forest.first_duplicate() {
        return Err(TreeError::DuplicateName(name.to_string()));
    }
    Ok(forest)
}

fn parse_error(e: serde_json::Error) -> TreeError {
    TreeError::Parse(e.to_string())
}
