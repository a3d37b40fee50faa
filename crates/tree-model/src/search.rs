//! Name search, collation and the table/tree view projections

use derive_more::Display;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::node::Forest;
use crate::ops::{ancestors, build_parent_map, FlatRecord};

/// Fold a string for matching: decompose, drop combining marks, lower-case.
///
/// `"José"` and `"JOSE"` both become `"jose"`.
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// String collation used everywhere names are ordered.
///
/// Compares folded forms first so case and accents do not split the order,
/// then the raw strings so the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    normalize(a)
        .cmp(&normalize(b))
        .then_with(|| a.cmp(b))
}

/// Records whose folded name contains the folded query, in input order.
///
/// An empty query returns every record.
pub fn search(records: &[FlatRecord], query: &str) -> Vec<FlatRecord> {
    let query = normalize(query);
    if query.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| normalize(&record.name).contains(&query))
        .cloned()
        .collect()
}

/// Names that must be expanded in a collapsed tree so every match is visible:
/// each match plus every ancestor up to its root.
pub fn expanded_names(forest: &Forest, matches: &[FlatRecord]) -> BTreeSet<String> {
    let parents = build_parent_map(forest);
    let mut expanded = BTreeSet::new();
    for record in matches {
        expanded.insert(record.name.clone());
        for name in ancestors(&parents, &record.name) {
            // Shared ancestor chains only need walking once
            if !expanded.insert(name.to_string()) {
                break;
            }
        }
    }
    expanded
}

/// How the filtered records are going to be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SearchView {
    #[display(fmt = "tree")]
    Tree,
    #[default]
    #[display(fmt = "table")]
    Table,
}

/// Filtered records, plus the expansion set when shown as a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub records: Vec<FlatRecord>,
    pub expanded: Option<BTreeSet<String>>,
}

pub fn search_view(
    forest: &Forest,
    records: &[FlatRecord],
    query: &str,
    view: SearchView,
) -> SearchResult {
    let records = search(records, query);
    let expanded = match view {
        SearchView::Tree => Some(expanded_names(forest, &records)),
        SearchView::Table => None,
    };
    SearchResult { records, expanded }
}

/// Table column a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortColumn {
    #[display(fmt = "parent")]
    Parent,
    #[display(fmt = "name")]
    Name,
    #[display(fmt = "link")]
    Link,
    #[display(fmt = "description")]
    Description,
}

impl SortColumn {
    fn value(self, record: &FlatRecord) -> Option<&str> {
        match self {
            SortColumn::Parent => Some(&record.parent),
            SortColumn::Name => Some(&record.name),
            SortColumn::Link => record.link.as_deref(),
            SortColumn::Description => record.description.as_deref(),
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parent" => Ok(SortColumn::Parent),
            "name" => Ok(SortColumn::Name),
            "link" => Ok(SortColumn::Link),
            "description" => Ok(SortColumn::Description),
            other => Err(format!("unknown column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort table rows by one column.
///
/// Every column is compared as a string with [`collate`]; there are no
/// numeric columns. Missing values sort last in both directions.
pub fn sort_records(records: &mut [FlatRecord], column: SortColumn, direction: SortDirection) {
    records.sort_by(|a, b| match (column.value(a), column.value(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => collate(x, y),
            SortDirection::Descending => collate(y, x),
        },
    });
}
