//! Tree Model Library
//!
//! An in-memory model for labeled hierarchies (organisation charts, mind
//! maps): a forest of uniquely named nodes, the pure operations that turn one
//! forest snapshot into the next, the JSON persistence format, and the name
//! search that feeds table and tree views.
//!
//! # Core Concepts
//!
//! - **Forest**: ordered sequence of independent rooted trees
//! - **TreeNode**: a named node owning its ordered children
//! - **FlatRecord**: one node plus its parent's name, for listings and search
//!
//! # Example
//!
//! ```
//! use tree_model::prelude::*;
//!
//! let forest = insert_or_move(&Forest::new(), None, TreeNode::new("CEO"), ROOT_SENTINEL)?;
//! let forest = insert_or_move(&forest, None, TreeNode::new("CTO"), "CEO")?;
//!
//! let names: Vec<_> = flatten(&forest).into_iter().map(|r| r.name).collect();
//! assert_eq!(names, ["CEO", "CTO"]);
//! assert_eq!(calculate_max_depth(&forest), 1);
//! # Ok::<(), tree_model::TreeError>(())
//! ```

pub mod codec;
mod error;
mod node;
pub mod ops;
pub mod search;
pub mod validate;
mod walk;

pub use error::{Result, TreeError, ValidationError};
pub use node::{Forest, TreeNode, ROOT_SENTINEL};
pub use walk::{Visit, Walker};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::codec::{decode, encode};
    pub use crate::ops::{
        build_parent_map, calculate_max_depth, delete_all, delete_subtree, deletion_plan,
        find_by_name, flatten, insert_or_move, parent_candidates, DeletionPlan, FlatRecord,
    };
    pub use crate::search::{search, search_view, SearchResult, SearchView};
    pub use crate::validate::NodeDraft;
    pub use crate::{Forest, TreeError, TreeNode, ValidationError, ROOT_SENTINEL};
}
