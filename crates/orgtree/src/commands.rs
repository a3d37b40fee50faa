//! One function per subcommand. Each applies a single editor operation and prints the result.

use anyhow::{anyhow, Context, Result};
use log::info;
use std::collections::BTreeSet;
use std::path::Path;
use store::{read_import, write_export, CommitReport, Editor, EditorError, KeyValueStore};
use tree_model::ops::font_size_rem;
use tree_model::search::{sort_records, SearchView, SortColumn, SortDirection};
use tree_model::validate::NodeDraft;

use crate::render::{render_table, render_tree};

/// Field values for `edit`; anything left `None` keeps its current value
#[derive(Debug, Default)]
pub struct NodeChanges {
    pub name: Option<String>,
    pub parent: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

pub fn show<S: KeyValueStore>(editor: &Editor<S>) -> Result<()> {
    if editor.forest().is_empty() {
        println!("  The tree is empty.");
        return Ok(());
    }
    for line in render_tree(editor.forest(), None, &BTreeSet::new()) {
        println!("{}", line);
    }
    let depth = editor.max_depth();
    println!();
    println!(
        "{} nodes, max depth {} (font size {:.1}rem)",
        editor.forest().len(),
        depth,
        font_size_rem(depth)
    );
    Ok(())
}

pub fn list<S: KeyValueStore>(
    editor: &Editor<S>,
    sort: Option<SortColumn>,
    descending: bool,
) -> Result<()> {
    let mut records = editor.records().to_vec();
    if let Some(column) = sort {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        sort_records(&mut records, column, direction);
    }
    for line in render_table(&records) {
        println!("{}", line);
    }
    Ok(())
}

pub fn search<S: KeyValueStore>(editor: &Editor<S>, query: &str, tree: bool) -> Result<()> {
    let view = if tree {
        SearchView::Tree
    } else {
        SearchView::Table
    };
    let result = editor.search(query, view);
    if result.records.is_empty() {
        println!("  No nodes match {:?}.", query);
        return Ok(());
    }

    let lines = match &result.expanded {
        Some(expanded) => {
            let matches: BTreeSet<String> =
                result.records.iter().map(|r| r.name.clone()).collect();
            render_tree(editor.forest(), Some(expanded), &matches)
        }
        None => render_table(&result.records),
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

pub fn parents<S: KeyValueStore>(editor: &Editor<S>, editing: Option<&str>) -> Result<()> {
    for name in editor.parent_candidates(editing) {
        println!("{}", name);
    }
    Ok(())
}

pub fn add<S: KeyValueStore>(
    editor: &mut Editor<S>,
    draft: NodeDraft,
    parent: &str,
) -> Result<()> {
    let name = draft.name.trim().to_string();
    let report = editor.add_node(draft, parent).map_err(explain)?;
    report_commit(&report);
    println!("Added {:?} under {:?}.", name, parent);
    Ok(())
}

pub fn edit<S: KeyValueStore>(
    editor: &mut Editor<S>,
    original: &str,
    changes: NodeChanges,
) -> Result<()> {
    let current = editor
        .records()
        .iter()
        .find(|r| r.name == original)
        .cloned()
        .ok_or_else(|| anyhow!("No node named {:?}", original))?;

    let draft = NodeDraft {
        name: changes.name.unwrap_or(current.name),
        link: changes.link.or(current.link),
        description: changes.description.or(current.description),
    };
    let parent = changes.parent.unwrap_or(current.parent);

    let report = editor
        .update_node(original, draft, &parent)
        .map_err(explain)?;
    report_commit(&report);
    println!("Updated {:?}.", original);
    Ok(())
}

pub fn delete<S: KeyValueStore>(editor: &mut Editor<S>, name: &str, yes: bool) -> Result<()> {
    let report = editor.delete_node(name, yes).map_err(explain)?;
    report_commit(&report);
    println!("Deleted {:?}.", name);
    Ok(())
}

pub fn clear<S: KeyValueStore>(editor: &mut Editor<S>, yes: bool) -> Result<()> {
    let report = editor.delete_all(yes).map_err(explain)?;
    report_commit(&report);
    println!("Deleted the whole tree.");
    Ok(())
}

pub fn import<S: KeyValueStore>(editor: &mut Editor<S>, file: &Path, yes: bool) -> Result<()> {
    let text = read_import(file)?;
    let report = editor
        .import(&text, yes)
        .map_err(explain)
        .with_context(|| {
            format!(
                "Import of {} failed; the current tree is unchanged",
                file.display()
            )
        })?;
    report_commit(&report);
    println!("Imported {} nodes from {}.", editor.forest().len(), file.display());
    Ok(())
}

pub fn export<S: KeyValueStore>(editor: &Editor<S>, out_dir: &Path) -> Result<()> {
    let export = editor.export().map_err(explain)?;
    let path = write_export(out_dir, &export)?;
    println!("Exported to {}.", path.display());
    Ok(())
}

pub fn sample<S: KeyValueStore>(editor: &mut Editor<S>, yes: bool) -> Result<()> {
    let report = editor.load_sample(yes).map_err(explain)?;
    report_commit(&report);
    println!("Loaded the sample tree ({} nodes).", editor.forest().len());
    Ok(())
}

fn report_commit(report: &CommitReport) {
    if let Some(warning) = &report.storage_warning {
        eprintln!("warning: change applied but not saved: {}", warning);
    } else {
        info!("Change saved");
    }
}

fn explain(err: EditorError) -> anyhow::Error {
    match err {
        EditorError::ConfirmationRequired(confirmation) => {
            anyhow!("{}. Re-run with --yes to continue.", confirmation)
        }
        other => anyhow::Error::from(other),
    }
}
