use pretty_assertions::assert_eq;
use store::{
    read_import, write_export, Config, Editor, FileStore, KeyValueStore, LoadSource, STORAGE_KEY,
};
use tempfile::TempDir;
use tree_model::validate::NodeDraft;
use tree_model::ROOT_SENTINEL;

fn open(dir: &TempDir) -> Editor<FileStore> {
    let config = Config::resolve(Some(dir.path().to_path_buf()));
    Editor::open(config.open_store(), config.storage_key)
}

#[test]
fn test_changes_survive_reopen() {
    let temp = TempDir::new().unwrap();

    let mut editor = open(&temp);
    assert_eq!(editor.source(), LoadSource::Sample);
    editor.delete_all(true).unwrap();
    editor.add_node(NodeDraft::new("CEO"), ROOT_SENTINEL).unwrap();
    editor
        .add_node(NodeDraft::new("CTO").link("cto.example.com"), "CEO")
        .unwrap();

    let reopened = open(&temp);
    assert_eq!(reopened.source(), LoadSource::Stored);
    assert_eq!(reopened.forest(), editor.forest());
    assert_eq!(
        reopened.records()[1].link.as_deref(),
        Some("http://cto.example.com")
    );
}

#[test]
fn test_clearing_removes_stored_file() {
    let temp = TempDir::new().unwrap();

    let mut editor = open(&temp);
    editor.load_sample(true).unwrap();
    assert!(temp.path().join("treeData.json").exists());

    editor.delete_all(true).unwrap();
    assert!(!temp.path().join("treeData.json").exists());
    assert_eq!(editor.store().get(STORAGE_KEY).unwrap(), None);

    // nothing stored means the next session starts from the sample again
    assert_eq!(open(&temp).source(), LoadSource::Sample);
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let source_dir = TempDir::new().unwrap();
    let target_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();

    let mut editor = open(&source_dir);
    editor.delete_node("Human Resources", true).unwrap();
    let path = write_export(out_dir.path(), &editor.export().unwrap()).unwrap();

    let mut other = open(&target_dir);
    other.delete_all(true).unwrap();
    other.import(&read_import(&path).unwrap(), false).unwrap();

    assert_eq!(other.forest(), editor.forest());
    assert_eq!(other.forest().len(), 12);
}
