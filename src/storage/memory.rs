use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use crate::scheduler::{ProgressMap, VocabularyItem};
use crate::storage::{ProgressStore, StorageError, StorageResult, VocabularyCatalog};

/// Progress kept in memory. `set_failing(true)` makes every save fail, to
/// exercise best-effort persistence.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    progress: RefCell<ProgressMap>,
    failing: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: ProgressMap) -> Self {
        Self {
            progress: RefCell::new(progress),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> ProgressMap {
        self.progress.borrow().clone()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> StorageResult<ProgressMap> {
        Ok(self.snapshot())
    }

    fn save(&self, progress: &ProgressMap) -> StorageResult<()> {
        if self.failing.get() {
            return Err(StorageError::Unavailable("memory store set to fail".to_string()));
        }
        *self.progress.borrow_mut() = progress.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn backup(&self) -> StorageResult<Option<PathBuf>> {
        Ok(None)
    }

    fn reset(&self, _backup: bool) -> StorageResult<Option<PathBuf>> {
        self.progress.borrow_mut().clear();
        Ok(None)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    items: Vec<VocabularyItem>,
}

impl MemoryCatalog {
    pub fn new(items: Vec<VocabularyItem>) -> Self {
        Self { items }
    }
}

impl VocabularyCatalog for MemoryCatalog {
    fn list_items(&self) -> StorageResult<Vec<VocabularyItem>> {
        Ok(self.items.clone())
    }
}
