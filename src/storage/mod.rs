//! Persistence collaborators of the scheduler.
//!
//! - `ProgressStore` - load/save the whole progress map, bulk reset
//! - `VocabularyCatalog` - ordered list of learnable items
//!
//! JSON file adapters back the binary; in-memory adapters back tests and
//! embedders that persist elsewhere.

pub mod catalog;
pub mod json_file;
pub mod memory;
pub mod migrate;

pub use catalog::JsonCatalog;
pub use json_file::JsonProgressStore;
pub use memory::{MemoryCatalog, MemoryProgressStore};
pub use migrate::{migrate_progress, migrate_record};

use std::path::PathBuf;

use thiserror::Error;

use crate::scheduler::{ProgressMap, VocabularyItem};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("integrity fault for {item_id}: {reason}")]
    Integrity { item_id: String, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn integrity(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Integrity {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

pub trait ProgressStore {
    fn load(&self) -> StorageResult<ProgressMap>;

    fn save(&self, progress: &ProgressMap) -> StorageResult<()>;

    /// Copies the current state aside. `None` when there is nothing to copy
    /// or the store keeps no backups.
    fn backup(&self) -> StorageResult<Option<PathBuf>>;

    /// Clears every record. Returns the backup location when one was written.
    fn reset(&self, backup: bool) -> StorageResult<Option<PathBuf>>;
}

pub trait VocabularyCatalog {
    /// Items in a stable order for the whole session.
    fn list_items(&self) -> StorageResult<Vec<VocabularyItem>>;
}
