use tree_model::{codec, Forest, Result};

/// Bundled example organisation chart
pub const SAMPLE_JSON: &str = include_str!("../samples/sample_tree.json");

pub fn sample_forest() -> Result<Forest> {
    codec::decode(SAMPLE_JSON)
}
