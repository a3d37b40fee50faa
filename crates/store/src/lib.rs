// Persistence and application state for the tree editor
// This crate owns the current forest, writes it through to storage, and handles import/export

mod config;
mod editor;
mod kv;
mod sample;
mod transfer;

pub use config::{default_data_dir, Config, DATA_DIR_ENV};
pub use editor::{CommitReport, Confirmation, Editor, EditorError, LoadSource};
pub use kv::{FileStore, KeyValueStore, MemoryStore, STORAGE_KEY};
pub use sample::{sample_forest, SAMPLE_JSON};
pub use transfer::{export_file_name, read_import, write_export, Export};
