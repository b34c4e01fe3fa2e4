use chrono::{DateTime, Utc};

use crate::scheduler::params::SrsParams;
use crate::scheduler::types::ProgressRecord;

/// Priority score in `[0, 1]`.
///
/// `None` scores the option of introducing a brand-new item, gated on the
/// active set having room. Existing records score by how overdue they are,
/// plus a flat bonus when the last attempt failed.
pub fn priority(
    record: Option<&ProgressRecord>,
    active_count: usize,
    now: DateTime<Utc>,
    params: &SrsParams,
) -> f64 {
    let Some(record) = record else {
        return new_item_priority(active_count, params);
    };

    if record.interval <= 0.0 {
        return 0.0;
    }

    let overdue_ratio = record.hours_since_last_seen(now) / record.interval;
    let bonus = if record.last_attempt_was_failure {
        params.failed_priority_bonus
    } else {
        0.0
    };
    (overdue_ratio.max(0.0) + bonus).min(1.0)
}

pub fn new_item_priority(active_count: usize, params: &SrsParams) -> f64 {
    if active_count < params.max_active_words {
        params.new_item_priority
    } else {
        0.0
    }
}
