//! Applies answers to progress records and persists them.
//!
//! The recorder is the only writer of the progress map. Persistence is best
//! effort: a failed save is logged, the in-memory map is kept, and the next
//! save writes everything again.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::scheduler::{
    record_attempt, AttemptOutcome, ItemId, ProgressMap, ProgressRecord, Selection,
    SelectionError, SrsParams, VocabularyItem, WordSelector,
};
use crate::storage::{ProgressStore, StorageResult};

/// Result of dropping records that have no catalog entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PruneOutcome {
    pub removed: Vec<ItemId>,
    pub backup: Option<PathBuf>,
}

pub struct ProgressRecorder<S> {
    store: S,
    progress: ProgressMap,
    selector: WordSelector,
    pending_save: bool,
}

impl<S: ProgressStore> ProgressRecorder<S> {
    /// Loads the progress map. Integrity faults in stored records surface here.
    pub fn open(store: S, params: SrsParams) -> StorageResult<Self> {
        let progress = store.load()?;
        Ok(Self::with_progress(store, progress, params))
    }

    pub fn with_progress(store: S, progress: ProgressMap, params: SrsParams) -> Self {
        Self {
            store,
            progress,
            selector: WordSelector::new(params),
            pending_save: false,
        }
    }

    pub fn params(&self) -> &SrsParams {
        self.selector.params()
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub fn record(&self, item_id: &str) -> Option<&ProgressRecord> {
        self.progress.get(item_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selector(&self) -> &WordSelector {
        &self.selector
    }

    /// True when the last save failed and changes are only held in memory.
    pub fn has_pending_save(&self) -> bool {
        self.pending_save
    }

    /// Selects the next item and seeds a record for a newly introduced one.
    pub fn next_item(
        &mut self,
        catalog: &[VocabularyItem],
        now: DateTime<Utc>,
    ) -> Result<Selection, SelectionError> {
        let selection = self.selector.select(catalog, &self.progress, now)?;
        if let Selection::New(candidate) = &selection {
            if self.introduce(&candidate.item.id, now) {
                self.save();
            }
        }
        Ok(selection)
    }

    /// Creates the seed record for `item_id` if it has none. Returns whether one was created.
    pub fn introduce(&mut self, item_id: &str, now: DateTime<Utc>) -> bool {
        if self.progress.contains_key(item_id) {
            return false;
        }
        let seed = ProgressRecord::seed(now, self.selector.params());
        self.progress.insert(item_id.to_string(), seed);
        tracing::info!(item_id, "introduced new item");
        true
    }

    /// Records one answered presentation of `item_id` and persists the map.
    ///
    /// Must be called exactly once per answer; duplicates count as extra attempts.
    pub fn record_answer(&mut self, item_id: &str, success: bool, now: DateTime<Utc>) -> AttemptOutcome {
        let params = self.selector.params();
        let record = self
            .progress
            .entry(item_id.to_string())
            .or_insert_with(|| ProgressRecord::seed(now, params));
        let outcome = record_attempt(record, success, now, params);
        tracing::debug!(
            item_id,
            success,
            interval = outcome.interval,
            easiness = outcome.easiness_factor,
            attempts = record.attempts,
            "recorded attempt"
        );
        self.save();
        outcome
    }

    /// Like [`record_answer`](Self::record_answer), but rejects ids the catalog
    /// does not list so a mistyped id cannot take an active-set slot.
    pub fn answer(
        &mut self,
        catalog: &[VocabularyItem],
        item_id: &str,
        success: bool,
        now: DateTime<Utc>,
    ) -> Result<AttemptOutcome, SelectionError> {
        if !catalog.iter().any(|item| item.id == item_id) {
            tracing::warn!(item_id, "answer for an item outside the catalog ignored");
            return Err(SelectionError::UnknownItem(item_id.to_string()));
        }
        Ok(self.record_answer(item_id, success, now))
    }

    /// Drops every record whose id is not in `catalog` and saves the result.
    ///
    /// Unlike answers, the save here is not best effort: a failure is returned,
    /// with the pruned map still held in memory and marked pending.
    pub fn prune_orphans(&mut self, catalog: &[VocabularyItem], backup: bool) -> StorageResult<PruneOutcome> {
        let known: HashSet<&str> = catalog.iter().map(|item| item.id.as_str()).collect();
        let removed: Vec<ItemId> = self
            .progress
            .keys()
            .filter(|id| !known.contains(id.as_str()))
            .cloned()
            .collect();
        if removed.is_empty() {
            return Ok(PruneOutcome::default());
        }

        let backup = if backup { self.store.backup()? } else { None };
        for id in &removed {
            self.progress.remove(id);
        }
        tracing::info!(removed = removed.len(), remaining = self.progress.len(), "pruned orphan records");

        if let Err(err) = self.store.save(&self.progress) {
            self.pending_save = true;
            return Err(err);
        }
        self.pending_save = false;
        Ok(PruneOutcome { removed, backup })
    }

    /// Best-effort save. Returns `false` when the store failed; the map is kept
    /// and the next save retries.
    pub fn save(&mut self) -> bool {
        match self.store.save(&self.progress) {
            Ok(()) => {
                if self.pending_save {
                    tracing::info!(records = self.progress.len(), "pending progress saved");
                }
                self.pending_save = false;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, records = self.progress.len(), "failed to save progress, keeping it in memory");
                self.pending_save = true;
                false
            }
        }
    }

    /// Clears all progress through the store; the in-memory map is cleared only on success.
    pub fn reset(&mut self, backup: bool) -> StorageResult<Option<PathBuf>> {
        let backup_path = self.store.reset(backup)?;
        self.progress.clear();
        self.pending_save = false;
        Ok(backup_path)
    }
}
