//! The application controller: owns the current forest and its storage.
//!
//! Every mutation follows the same sequence: compute the next snapshot with a
//! pure operation, swap it in, then write it through to storage. A failed
//! operation leaves the current snapshot untouched. A failed write-through is
//! not rolled back; it is logged and reported on the [`CommitReport`].

use chrono::Utc;
use derive_more::Display;
use log::{debug, info, warn};
use thiserror::Error;
use tree_model::ops::{self, FlatRecord};
use tree_model::search::{self, SearchResult, SearchView};
use tree_model::validate::NodeDraft;
use tree_model::{codec, Forest, TreeError};

use crate::kv::KeyValueStore;
use crate::sample::sample_forest;
use crate::transfer::{export_file_name, Export};

/// A destructive action the user has to agree to before it runs
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Confirmation {
    #[display(
        fmt = "\"{}\" has {} descendant(s); deleting it removes the whole subtree",
        name,
        descendants
    )]
    DeleteSubtree { name: String, descendants: usize },
    #[display(fmt = "this replaces the current tree ({} nodes)", nodes)]
    OverwriteTree { nodes: usize },
    #[display(fmt = "this deletes the whole tree ({} nodes)", nodes)]
    DeleteTree { nodes: usize },
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("confirmation required: {0}")]
    ConfirmationRequired(Confirmation),
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;

/// Where the forest came from when the editor was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LoadSource {
    #[display(fmt = "storage")]
    Stored,
    #[display(fmt = "sample")]
    Sample,
    #[display(fmt = "sample (stored data unreadable)")]
    SampleAfterBadStore,
}

/// Outcome of a committed mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Set when the in-memory change stuck but writing it to storage failed
    pub storage_warning: Option<String>,
}

impl CommitReport {
    pub fn persisted(&self) -> bool {
        self.storage_warning.is_none()
    }
}

pub struct Editor<S> {
    forest: Forest,
    records: Vec<FlatRecord>,
    store: S,
    key: String,
    source: LoadSource,
}

impl<S: KeyValueStore> Editor<S> {
    /// Open the editor, reading the persisted forest once.
    ///
    /// A missing key starts from the sample dataset. Stored text that cannot
    /// be read or decoded is logged and also replaced by the sample, without
    /// touching the stored value until the next commit.
    pub fn open(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (forest, source) = match store.get(&key) {
            Ok(Some(text)) => match codec::decode(&text) {
                Ok(forest) => (forest, LoadSource::Stored),
                Err(e) => {
                    warn!("Stored tree under {:?} is invalid ({}); loading sample", key, e);
                    (load_sample_or_empty(), LoadSource::SampleAfterBadStore)
                }
            },
            Ok(None) => (load_sample_or_empty(), LoadSource::Sample),
            Err(e) => {
                warn!("Failed to read stored tree under {:?}: {:#}; loading sample", key, e);
                (load_sample_or_empty(), LoadSource::SampleAfterBadStore)
            }
        };
        info!("Opened tree from {} with {} nodes", source, forest.len());

        let records = ops::flatten(&forest);
        Self {
            forest,
            records,
            store,
            key,
            source,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// The flattened, name-sorted records of the current forest
    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_depth(&self) -> usize {
        ops::calculate_max_depth(&self.forest)
    }

    pub fn search(&self, query: &str, view: SearchView) -> SearchResult {
        search::search_view(&self.forest, &self.records, query, view)
    }

    pub fn parent_candidates(&self, editing: Option<&str>) -> Vec<String> {
        ops::parent_candidates(&self.forest, editing)
    }

    /// Validate a form draft and add it under `parent` (a name or the root sentinel)
    pub fn add_node(&mut self, draft: NodeDraft, parent: &str) -> Result<CommitReport> {
        let node = draft
            .into_node(&self.forest.names())
            .map_err(TreeError::from)?;
        let next = ops::insert_or_move(&self.forest, None, node, parent)?;
        Ok(self.commit(next))
    }

    /// Edit `original`'s fields and parent; its children are kept
    pub fn update_node(
        &mut self,
        original: &str,
        draft: NodeDraft,
        parent: &str,
    ) -> Result<CommitReport> {
        let mut taken = self.forest.names();
        taken.remove(original);
        let node = draft.into_node(&taken).map_err(TreeError::from)?;
        let next = ops::insert_or_move(&self.forest, Some(original), node, parent)?;
        Ok(self.commit(next))
    }

    /// Delete a node. Nodes with children need `confirmed`, since their whole subtree goes too.
    pub fn delete_node(&mut self, name: &str, confirmed: bool) -> Result<CommitReport> {
        let plan = ops::deletion_plan(&self.forest, name)?;
        if plan.requires_confirmation() && !confirmed {
            return Err(EditorError::ConfirmationRequired(
                Confirmation::DeleteSubtree {
                    name: plan.name,
                    descendants: plan.descendants.len(),
                },
            ));
        }
        let next = ops::delete_subtree(&self.forest, name)?;
        Ok(self.commit(next))
    }

    /// Empty the forest and remove the stored key
    pub fn delete_all(&mut self, confirmed: bool) -> Result<CommitReport> {
        self.confirm_overwrite(confirmed, |nodes| Confirmation::DeleteTree { nodes })?;
        Ok(self.commit(ops::delete_all()))
    }

    /// Replace the forest with decoded file contents.
    ///
    /// Decoding failures leave the current forest and storage untouched.
    pub fn import(&mut self, text: &str, confirmed: bool) -> Result<CommitReport> {
        self.confirm_overwrite(confirmed, |nodes| Confirmation::OverwriteTree { nodes })?;
        let next = codec::decode(text)?;
        info!("Importing tree with {} nodes", next.len());
        Ok(self.commit(next))
    }

    /// Replace the forest with the bundled sample
    pub fn load_sample(&mut self, confirmed: bool) -> Result<CommitReport> {
        self.confirm_overwrite(confirmed, |nodes| Confirmation::OverwriteTree { nodes })?;
        let next = sample_forest()?;
        Ok(self.commit(next))
    }

    /// Encode the current forest under a file name stamped with the current time
    pub fn export(&self) -> Result<Export> {
        Ok(Export {
            file_name: export_file_name(Utc::now()),
            contents: codec::encode(&self.forest)?,
        })
    }

    fn confirm_overwrite(
        &self,
        confirmed: bool,
        confirmation: impl FnOnce(usize) -> Confirmation,
    ) -> Result<()> {
        if self.forest.is_empty() || confirmed {
            return Ok(());
        }
        Err(EditorError::ConfirmationRequired(confirmation(
            self.forest.len(),
        )))
    }

    fn commit(&mut self, next: Forest) -> CommitReport {
        self.forest = next;
        self.records = ops::flatten(&self.forest);
        debug!("Committed tree with {} nodes", self.records.len());

        let written = if self.forest.is_empty() {
            self.store.remove(&self.key)
        } else {
            codec::encode(&self.forest)
                .map_err(anyhow::Error::from)
                .and_then(|text| self.store.set(&self.key, &text))
        };

        match written {
            Ok(()) => CommitReport::default(),
            Err(e) => {
                warn!("Tree changed but could not be saved: {:#}", e);
                CommitReport {
                    storage_warning: Some(format!("{:#}", e)),
                }
            }
        }
    }
}

fn load_sample_or_empty() -> Forest {
    sample_forest().unwrap_or_else(|e| {
        warn!("Bundled sample is invalid: {}", e);
        Forest::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryStore, STORAGE_KEY};
    use pretty_assertions::assert_eq;
    use tree_model::{TreeNode, ROOT_SENTINEL};

    /// Store whose writes always fail, to exercise the warning path
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        fn remove(&mut self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }
    }

    fn empty_editor() -> Editor<MemoryStore> {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "[]").unwrap();
        Editor::open(store, STORAGE_KEY)
    }

    #[test]
    fn test_open_without_storage_uses_sample() {
        let editor = Editor::open(MemoryStore::new(), STORAGE_KEY);
        assert_eq!(editor.source(), LoadSource::Sample);
        assert_eq!(editor.forest().len(), 14);
        // nothing written until the first change
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_open_with_bad_storage_keeps_stored_text() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{broken").unwrap();
        let editor = Editor::open(store, STORAGE_KEY);

        assert_eq!(editor.source(), LoadSource::SampleAfterBadStore);
        assert_eq!(
            editor.store().get(STORAGE_KEY).unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn test_add_writes_through() {
        let mut editor = empty_editor();
        assert_eq!(editor.source(), LoadSource::Stored);

        let report = editor.add_node(NodeDraft::new("CEO"), ROOT_SENTINEL).unwrap();
        assert!(report.persisted());

        let stored = editor.store().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(codec::decode(&stored).unwrap(), *editor.forest());
        assert_eq!(editor.records().len(), 1);
    }

    #[test]
    fn test_validation_error_leaves_state() {
        let mut editor = empty_editor();
        let err = editor.add_node(NodeDraft::new("X"), ROOT_SENTINEL).unwrap_err();
        assert!(matches!(
            err,
            EditorError::Tree(TreeError::Validation(_))
        ));
        assert!(editor.forest().is_empty());
    }

    #[test]
    fn test_update_allows_keeping_own_name() {
        let mut editor = empty_editor();
        editor.add_node(NodeDraft::new("CEO"), ROOT_SENTINEL).unwrap();
        editor
            .update_node("CEO", NodeDraft::new("CEO").description("Boss"), ROOT_SENTINEL)
            .unwrap();
        assert_eq!(
            editor.records()[0].description.as_deref(),
            Some("Boss")
        );
    }

    #[test]
    fn test_delete_with_children_needs_confirmation() {
        let mut editor = empty_editor();
        editor.add_node(NodeDraft::new("CEO"), ROOT_SENTINEL).unwrap();
        editor.add_node(NodeDraft::new("CTO"), "CEO").unwrap();

        let err = editor.delete_node("CEO", false).unwrap_err();
        match err {
            EditorError::ConfirmationRequired(Confirmation::DeleteSubtree {
                name,
                descendants,
            }) => {
                assert_eq!(name, "CEO");
                assert_eq!(descendants, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(editor.forest().len(), 2);

        editor.delete_node("CTO", false).unwrap();
        editor.delete_node("CEO", false).unwrap();
        // empty forest removes the key entirely
        assert_eq!(editor.store().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_failed_import_keeps_forest_and_storage() {
        let mut editor = empty_editor();
        editor.add_node(NodeDraft::new("CEO"), ROOT_SENTINEL).unwrap();
        let before = editor.store().get(STORAGE_KEY).unwrap();

        let err = editor.import("[{\"name\": 1}]", true).unwrap_err();
        assert!(matches!(err, EditorError::Tree(TreeError::Parse(_))));
        assert_eq!(editor.forest().len(), 1);
        assert_eq!(editor.store().get(STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_import_over_existing_needs_confirmation() {
        let mut editor = Editor::open(MemoryStore::new(), STORAGE_KEY);
        let err = editor.import("[{\"name\": \"Solo\"}]", false).unwrap_err();
        assert!(matches!(
            err,
            EditorError::ConfirmationRequired(Confirmation::OverwriteTree { nodes: 14 })
        ));

        editor.import("[{\"name\": \"Solo\"}]", true).unwrap();
        assert_eq!(editor.forest().len(), 1);
    }

    #[test]
    fn test_write_failure_is_reported_not_rolled_back() {
        let mut editor = Editor::open(ReadOnlyStore::default(), STORAGE_KEY);
        let report = editor.delete_all(true).unwrap();

        assert!(!report.persisted());
        assert!(report.storage_warning.unwrap().contains("disk full"));
        assert!(editor.forest().is_empty());
    }

    #[test]
    fn test_deep_tree_survives_reopen() {
        let mut node = TreeNode::new("Level 200");
        for level in (0..200).rev() {
            node = TreeNode::new(format!("Level {level:03}")).with_child(node);
        }
        let deep = Forest::from_roots(vec![node]);

        let mut editor = empty_editor();
        let report = editor.import(&codec::encode(&deep).unwrap(), true).unwrap();
        assert!(report.persisted());

        let reopened = Editor::open(editor.store().clone(), STORAGE_KEY);
        assert_eq!(reopened.source(), LoadSource::Stored);
        assert_eq!(reopened.max_depth(), 200);
        assert_eq!(*reopened.forest(), deep);
    }

    #[test]
    fn test_export_round_trips() {
        let editor = Editor::open(MemoryStore::new(), STORAGE_KEY);
        let export = editor.export().unwrap();
        assert!(export.file_name.starts_with("TreeData_"));
        assert!(export.file_name.ends_with(".json"));
        assert_eq!(codec::decode(&export.contents).unwrap(), *editor.forest());
    }

    #[test]
    fn test_search_uses_current_records() {
        let editor = Editor::open(MemoryStore::new(), STORAGE_KEY);
        let result = editor.search("jose", SearchView::Tree);
        assert_eq!(result.records.len(), 1);
        assert!(result.expanded.unwrap().contains("Advisory Council"));
    }
}
