use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scheduler::active_set::is_active;
use crate::scheduler::interval::is_due;
use crate::scheduler::mastery::{is_mastered, mastery_report, MasteryReport};
use crate::scheduler::params::SrsParams;
use crate::scheduler::types::{AttemptEntry, ItemId, ProgressMap, VocabularyItem};

const SUCCESS_MARK: char = '✓';
const FAILURE_MARK: char = '✗';

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PracticeStats {
    pub total_words: usize,
    pub words_started: usize,
    pub words_active: usize,
    pub words_mastered: usize,
    pub words_due: usize,
    pub total_attempts: u64,
    pub total_successes: u64,
    pub success_rate: f64,
}

impl PracticeStats {
    /// Totals over catalog items; records without a catalog entry are ignored.
    pub fn compute(
        catalog: &[VocabularyItem],
        progress: &ProgressMap,
        now: DateTime<Utc>,
        params: &SrsParams,
    ) -> Self {
        let mut stats = Self {
            total_words: catalog.len(),
            ..Default::default()
        };

        for record in catalog
            .iter()
            .filter_map(|item| progress.get(&item.id))
            .filter(|record| record.attempts > 0)
        {
            stats.words_started += 1;
            stats.total_attempts += u64::from(record.attempts);
            stats.total_successes += u64::from(record.successes);
            if is_mastered(record, now, params) {
                stats.words_mastered += 1;
                continue;
            }
            if is_active(record, now, params) {
                stats.words_active += 1;
            }
            if is_due(record, now) {
                stats.words_due += 1;
            }
        }

        if stats.total_attempts > 0 {
            stats.success_rate = stats.total_successes as f64 / stats.total_attempts as f64;
        }
        stats
    }
}

/// One row of the per-item view: an answered record and its mastery diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct ItemStats {
    pub item_id: ItemId,
    pub report: MasteryReport,
    /// Attempts oldest first, `✓` for a success and `✗` for a failure.
    pub history: String,
    /// False when the record has no entry in the catalog.
    pub in_catalog: bool,
}

/// Per-item statistics for every answered record, ordered by id.
pub fn item_stats(
    catalog: &[VocabularyItem],
    progress: &ProgressMap,
    now: DateTime<Utc>,
    params: &SrsParams,
) -> Vec<ItemStats> {
    progress
        .iter()
        .filter(|(_, record)| record.attempts > 0)
        .map(|(item_id, record)| ItemStats {
            item_id: item_id.clone(),
            report: mastery_report(record, now, params),
            history: history_marks(&record.attempt_history),
            in_catalog: catalog.iter().any(|item| &item.id == item_id),
        })
        .collect()
}

pub fn history_marks(history: &[AttemptEntry]) -> String {
    history
        .iter()
        .map(|a| if a.success { SUCCESS_MARK } else { FAILURE_MARK })
        .collect()
}

/// Renders an interval in hours as e.g. "1 day, 2 hours and 5 minutes".
pub fn format_interval(hours: f64) -> String {
    if hours == 0.0 {
        return "as soon as possible".to_string();
    }

    let total_minutes = hours * 60.0;
    if total_minutes < 1.0 {
        let seconds = (total_minutes * 60.0).round() as i64;
        return format!("{seconds} seconds");
    }

    let total_minutes = total_minutes.round() as i64;
    let days = total_minutes / (24 * 60);
    let hours_part = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    let parts: Vec<String> = [(days, "day"), (hours_part, "hour"), (minutes, "minute")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n} {unit}{}", if n > 1 { "s" } else { "" }))
        .collect();

    match parts.as_slice() {
        [] => "less than 1 minute".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
