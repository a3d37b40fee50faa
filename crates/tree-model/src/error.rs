use thiserror::Error;

/// A field-level problem with a node submitted from a form.
///
/// These are recovered locally by the caller (keep the form open, show the
/// message next to the field) and never change the forest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("name must not start or end with whitespace")]
    UntrimmedName,
    #[error("\"{0}\" is reserved and cannot be used as a node name")]
    ReservedName(String),
    #[error("a node named \"{0}\" already exists")]
    NameTaken(String),
    #[error("link must be at most {max} characters")]
    LinkTooLong { max: usize },
    #[error("invalid link")]
    InvalidLink,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

/// Failure of a forest operation. The input forest is always left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a node named \"{0}\" already exists")]
    DuplicateName(String),
    #[error(
        "cannot move \"{node}\" under \"{target}\": it is the node itself or one of its descendants"
    )]
    CyclicMove { node: String, target: String },
    #[error("no node named \"{0}\"")]
    NodeNotFound(String),
    #[error("invalid tree data: {0}")]
    Parse(String),
    #[error("failed to encode tree data: {0}")]
    Encode(String),
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
