//! Field validation and normalisation for node names, links and descriptions

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::ValidationError;
use crate::node::{TreeNode, ROOT_SENTINEL};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const LINK_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)^(https?://)?",
            // domain name
            r"((([a-z\d]([a-z\d-]*[a-z\d])*)\.)+[a-z]{2,}|",
            // or IPv4 address
            r"((\d{1,3}\.){3}\d{1,3}))",
            // port and path
            r"(:\d+)?(/[-a-z\d%_.~+]*)*",
            // query string
            r"(\?[;&a-z\d%_.~+=-]*)?",
            // fragment
            r"(#[-a-z\d_]*)?$",
        ))
        .expect("link pattern is a valid regex")
    })
}

/// Check a name against the length bounds, the sentinel, and the names already in use.
///
/// The name is trimmed first; length counts characters, not bytes.
pub fn check_name(name: &str, existing: &HashSet<&str>) -> Result<(), ValidationError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::NameLength {
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
        });
    }
    if name == ROOT_SENTINEL {
        return Err(ValidationError::ReservedName(name.to_string()));
    }
    if existing.contains(name) {
        return Err(ValidationError::NameTaken(name.to_string()));
    }
    Ok(())
}

pub fn validate_name(name: &str, existing: &HashSet<&str>) -> bool {
    check_name(name, existing).is_ok()
}

/// Check a link as typed by the user, before [`sanitize_link`] adds a scheme.
///
/// Empty input is valid and means "no link".
pub fn check_link(link: &str) -> Result<(), ValidationError> {
    if link.is_empty() {
        return Ok(());
    }
    if link.chars().count() > LINK_MAX_LEN {
        return Err(ValidationError::LinkTooLong { max: LINK_MAX_LEN });
    }
    if !link_pattern().is_match(link) {
        return Err(ValidationError::InvalidLink);
    }
    Ok(())
}

pub fn validate_link(link: &str) -> bool {
    check_link(link).is_ok()
}

pub fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> bool {
    check_description(description).is_ok()
}

/// Prefix `http://` unless the link already carries an http(s) scheme
pub fn sanitize_link(link: &str) -> String {
    let lower = link.get(..8).unwrap_or(link).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        link.to_string()
    } else {
        format!("http://{}", link)
    }
}

/// Check a node as it is stored, after [`NodeDraft::into_node`] normalised it.
///
/// The name must already be trimmed. A link may carry the `http://` that
/// [`sanitize_link`] added on top of an otherwise maximal link.
pub fn check_stored(node: &TreeNode) -> Result<(), ValidationError> {
    if node.name.trim() != node.name {
        return Err(ValidationError::UntrimmedName);
    }
    check_name(&node.name, &HashSet::new())?;
    if let Some(link) = &node.link {
        check_stored_link(link)?;
    }
    if let Some(description) = &node.description {
        check_description(description)?;
    }
    Ok(())
}

fn check_stored_link(link: &str) -> Result<(), ValidationError> {
    let bare = match link.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") && link.len() > 7 => &link[7..],
        _ => link,
    };
    check_link(link).or_else(|_| check_link(bare))
}

/// Raw field values as submitted from an add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDraft {
    pub name: String,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl NodeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate every field and build a childless node from the normalised values.
    ///
    /// `taken` must not contain the node's own current name when editing.
    /// Blank link and description become `None`; links gain a scheme.
    pub fn into_node(self, taken: &HashSet<&str>) -> Result<TreeNode, ValidationError> {
        check_name(&self.name, taken)?;

        let link = self
            .link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        if let Some(link) = link {
            check_link(link)?;
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if let Some(description) = description {
            check_description(description)?;
        }

        Ok(TreeNode {
            name: self.name.trim().to_string(),
            link: link.map(sanitize_link),
            description: description.map(str::to_string),
            children: Vec::new(),
        })
    }
}
