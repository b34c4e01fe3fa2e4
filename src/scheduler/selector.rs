use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scheduler::active_set::count_active;
use crate::scheduler::mastery::is_mastered;
use crate::scheduler::params::SrsParams;
use crate::scheduler::priority::{new_item_priority, priority};
use crate::scheduler::types::{ProgressMap, VocabularyItem};
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("data integrity fault for {item_id}: {reason}")]
    DataIntegrity { item_id: String, reason: String },
    #[error("unknown item {0}: not in the vocabulary catalog")]
    UnknownItem(String),
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub item: VocabularyItem,
    /// Position in catalog order
    pub position: usize,
    pub priority: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// First never-answered item in catalog order; it may already hold a seed record.
    New(Candidate),
    Review(Candidate),
    /// Nothing to review right now. Not an error.
    NoItemAvailable,
}

impl Selection {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::New(c) | Self::Review(c) => Some(c),
            Self::NoItemAvailable => None,
        }
    }

    pub fn item(&self) -> Option<&VocabularyItem> {
        self.candidate().map(|c| &c.item)
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }
}

/// Picks the next item to present. Never mutates the progress map.
#[derive(Debug, Clone, Default)]
pub struct WordSelector {
    params: SrsParams,
}

impl WordSelector {
    pub fn new(params: SrsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SrsParams {
        &self.params
    }

    pub fn select(
        &self,
        catalog: &[VocabularyItem],
        progress: &ProgressMap,
        now: DateTime<Utc>,
    ) -> Result<Selection, SelectionError> {
        validate(catalog, progress)?;
        if catalog.is_empty() {
            return Ok(Selection::NoItemAvailable);
        }

        let active_count = count_active(progress, now, &self.params);

        let mut best: Option<(usize, f64)> = None;
        let mut first_new: Option<usize> = None;
        for (position, item) in catalog.iter().enumerate() {
            // a seed record that was never answered is still new
            let Some(record) = progress.get(&item.id).filter(|r| r.attempts > 0) else {
                first_new.get_or_insert(position);
                continue;
            };
            if is_mastered(record, now, &self.params) {
                continue;
            }
            let p = priority(Some(record), active_count, now, &self.params);
            // strictly greater keeps the earliest catalog position on ties
            if best.map_or(true, |(_, max)| p > max) {
                best = Some((position, p));
            }
        }

        let max_existing = best.map_or(0.0, |(_, p)| p);
        let new_priority = new_item_priority(active_count, &self.params);

        if new_priority > max_existing {
            if let Some(position) = first_new {
                let item = &catalog[position];
                tracing::debug!(item_id = %item.id, priority = new_priority, active_count, "selected new item");
                return Ok(Selection::New(Candidate {
                    item: item.clone(),
                    position,
                    priority: new_priority,
                }));
            }
        }

        match best {
            Some((position, p)) if p > 0.0 => {
                let item = &catalog[position];
                tracing::debug!(item_id = %item.id, priority = p, active_count, "selected review item");
                Ok(Selection::Review(Candidate {
                    item: item.clone(),
                    position,
                    priority: p,
                }))
            }
            _ => {
                tracing::debug!(active_count, "no item available");
                Ok(Selection::NoItemAvailable)
            }
        }
    }

    /// Every answered, non-mastered catalog item by descending priority,
    /// ties in catalog order.
    pub fn rank(
        &self,
        catalog: &[VocabularyItem],
        progress: &ProgressMap,
        now: DateTime<Utc>,
    ) -> Result<Vec<Candidate>, SelectionError> {
        validate(catalog, progress)?;
        let active_count = count_active(progress, now, &self.params);

        let mut ranked: Vec<Candidate> = catalog
            .iter()
            .enumerate()
            .filter_map(|(position, item)| {
                let record = progress.get(&item.id).filter(|r| r.attempts > 0)?;
                if is_mastered(record, now, &self.params) {
                    return None;
                }
                Some(Candidate {
                    item: item.clone(),
                    position,
                    priority: priority(Some(record), active_count, now, &self.params),
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then(a.position.cmp(&b.position))
        });
        Ok(ranked)
    }
}

/// Integrity checks over the catalog and the records the catalog references.
pub fn validate(catalog: &[VocabularyItem], progress: &ProgressMap) -> Result<(), SelectionError> {
    let mut seen = HashSet::with_capacity(catalog.len());
    for (position, item) in catalog.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(SelectionError::DataIntegrity {
                item_id: format!("#{position}"),
                reason: "catalog item has an empty id".to_string(),
            });
        }
        if !seen.insert(item.id.as_str()) {
            return Err(SelectionError::DataIntegrity {
                item_id: item.id.clone(),
                reason: "duplicate id in catalog".to_string(),
            });
        }
        if item.text.trim().is_empty() || item.answer.trim().is_empty() {
            return Err(SelectionError::DataIntegrity {
                item_id: item.id.clone(),
                reason: "catalog item is missing its text or answer".to_string(),
            });
        }
        if let Some(record) = progress.get(&item.id) {
            record
                .validate()
                .map_err(|reason| SelectionError::DataIntegrity {
                    item_id: item.id.clone(),
                    reason,
                })?;
        }
    }
    Ok(())
}
