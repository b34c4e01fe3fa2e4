//! SM-2 style interval and ease progression.
//!
//! The phase of an item is read off its current interval:
//! - `0` → Unseen, first success schedules `first_success_interval`
//! - `first_success_interval` → Seeded, next success schedules `second_success_interval`
//! - anything else → Established, success schedules `elapsed × easiness`
//!
//! A failure from any phase drops back to `first_success_interval`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scheduler::params::SrsParams;
use crate::scheduler::types::{AttemptEntry, ProgressRecord};

const LANDMARK_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePhase {
    Unseen,
    Seeded,
    Established,
}

impl SchedulePhase {
    /// Only an exact (or negative) zero is Unseen; a tiny computed interval
    /// stays Established.
    pub fn of(interval: f64, params: &SrsParams) -> Self {
        if interval <= 0.0 {
            Self::Unseen
        } else if (interval - params.first_success_interval).abs() < LANDMARK_EPSILON {
            Self::Seeded
        } else {
            Self::Established
        }
    }
}

/// Interval after a successful review.
///
/// Established items grow from the time actually elapsed, not the planned gap;
/// when no time has elapsed the planned gap is used so the item cannot fall
/// back to Unseen.
pub fn next_interval(current_interval: f64, easiness_factor: f64, hours_since_last: f64, params: &SrsParams) -> f64 {
    match SchedulePhase::of(current_interval, params) {
        SchedulePhase::Unseen => params.first_success_interval,
        SchedulePhase::Seeded => params.second_success_interval,
        SchedulePhase::Established => {
            if hours_since_last > 0.0 {
                hours_since_last * easiness_factor
            } else {
                current_interval * easiness_factor
            }
        }
    }
}

pub fn next_easiness(easiness_factor: f64, success: bool, params: &SrsParams) -> f64 {
    if success {
        (easiness_factor + params.easiness_increase).min(params.initial_easiness)
    } else {
        (easiness_factor - params.easiness_decrease).max(params.min_easiness)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptOutcome {
    pub success: bool,
    pub phase_before: SchedulePhase,
    pub previous_interval: f64,
    pub interval: f64,
    pub previous_easiness: f64,
    pub easiness_factor: f64,
    pub hours_since_last: f64,
}

/// Applies one answered presentation to `record`.
///
/// Everything is computed before the record is touched, then written in one
/// go; callers must invoke this exactly once per answer.
pub fn record_attempt(
    record: &mut ProgressRecord,
    success: bool,
    now: DateTime<Utc>,
    params: &SrsParams,
) -> AttemptOutcome {
    let hours_since_last = record.hours_since_last_seen(now);
    let previous_interval = record.interval;
    let previous_easiness = record.easiness_factor;
    let phase_before = SchedulePhase::of(previous_interval, params);

    let interval = if success {
        next_interval(previous_interval, previous_easiness, hours_since_last, params)
    } else {
        params.first_success_interval
    };
    let easiness_factor = next_easiness(previous_easiness, success, params);

    record.review_intervals.push(hours_since_last);
    let overflow = record
        .review_intervals
        .len()
        .saturating_sub(params.max_review_intervals);
    if overflow > 0 {
        record.review_intervals.drain(..overflow);
    }
    record.attempt_history.push(AttemptEntry {
        timestamp: now,
        success,
    });
    record.attempts += 1;
    if success {
        record.successes += 1;
    }
    record.interval = interval;
    record.easiness_factor = easiness_factor;
    record.last_seen = now;
    record.last_attempt_was_failure = !success;

    AttemptOutcome {
        success,
        phase_before,
        previous_interval,
        interval,
        previous_easiness,
        easiness_factor,
        hours_since_last,
    }
}

/// Hours until the record is due; negative when overdue, `0` for an unscheduled record.
pub fn hours_until_due(record: &ProgressRecord, now: DateTime<Utc>) -> f64 {
    if record.interval <= 0.0 {
        return 0.0;
    }
    record.interval - record.hours_since_last_seen(now)
}

pub fn is_due(record: &ProgressRecord, now: DateTime<Utc>) -> bool {
    record.interval > 0.0 && hours_until_due(record, now) <= 0.0
}

pub fn is_newly_introduced(record: &ProgressRecord) -> bool {
    record.attempts == 1
}
