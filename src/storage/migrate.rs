//! Load-time migration from loosely-typed progress JSON.
//!
//! Older files may lack `review_intervals`, `last_attempt_was_failure`,
//! `attempt_history` or `first_introduced`, and may carry naive timestamps or
//! an easiness factor outside the current bounds. Those are defaulted or
//! clamped; a record missing its counters or schedule is an integrity fault.

use serde::Deserialize;
use serde_json::Value;

use crate::scheduler::types::timestamp;
use crate::scheduler::{AttemptEntry, ProgressMap, ProgressRecord, SrsParams};
use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Deserialize)]
struct RawAttempt {
    timestamp: String,
    success: bool,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    attempts: Option<u32>,
    successes: Option<u32>,
    interval: Option<f64>,
    easiness_factor: Option<f64>,
    last_seen: Option<String>,
    last_attempt_was_failure: Option<bool>,
    review_intervals: Option<Vec<f64>>,
    attempt_history: Option<Vec<RawAttempt>>,
    first_introduced: Option<String>,
}

fn required<T>(value: Option<T>, item_id: &str, field: &str) -> StorageResult<T> {
    value.ok_or_else(|| StorageError::integrity(item_id, format!("missing required field {field}")))
}

fn parse_time(raw: &str, item_id: &str, field: &str) -> StorageResult<chrono::DateTime<chrono::Utc>> {
    timestamp::parse(raw)
        .ok_or_else(|| StorageError::integrity(item_id, format!("invalid {field} timestamp {raw:?}")))
}

pub fn migrate_record(item_id: &str, value: Value, params: &SrsParams) -> StorageResult<ProgressRecord> {
    let raw: RawRecord = serde_json::from_value(value)
        .map_err(|e| StorageError::integrity(item_id, format!("malformed record: {e}")))?;

    let attempts = required(raw.attempts, item_id, "attempts")?;
    let successes = required(raw.successes, item_id, "successes")?;
    let interval = required(raw.interval, item_id, "interval")?;
    let easiness = required(raw.easiness_factor, item_id, "easiness_factor")?;
    let last_seen = parse_time(&required(raw.last_seen, item_id, "last_seen")?, item_id, "last_seen")?;

    let first_introduced = match raw.first_introduced {
        Some(s) => parse_time(&s, item_id, "first_introduced")?,
        None => last_seen,
    };

    let attempt_history = raw
        .attempt_history
        .unwrap_or_default()
        .into_iter()
        .map(|a| {
            Ok(AttemptEntry {
                timestamp: parse_time(&a.timestamp, item_id, "attempt_history")?,
                success: a.success,
            })
        })
        .collect::<StorageResult<Vec<_>>>()?;

    let mut review_intervals = raw.review_intervals.unwrap_or_default();
    let overflow = review_intervals.len().saturating_sub(params.max_review_intervals);
    review_intervals.drain(..overflow);

    let easiness_factor = params.clamp_easiness(easiness);
    if easiness_factor != easiness {
        tracing::debug!(item_id, from = easiness, to = easiness_factor, "clamped easiness factor");
    }

    let record = ProgressRecord {
        attempts,
        successes,
        interval,
        easiness_factor,
        last_seen,
        last_attempt_was_failure: raw.last_attempt_was_failure.unwrap_or(false),
        review_intervals,
        attempt_history,
        first_introduced,
    };
    record
        .validate()
        .map_err(|reason| StorageError::integrity(item_id, reason))?;
    Ok(record)
}

/// Migrates a whole progress document (a JSON object keyed by item id).
pub fn migrate_progress(document: Value, params: &SrsParams) -> StorageResult<ProgressMap> {
    let Value::Object(entries) = document else {
        return Err(StorageError::integrity(
            "<root>",
            "progress document must be an object keyed by item id",
        ));
    };

    entries
        .into_iter()
        .map(|(item_id, value)| {
            let record = migrate_record(&item_id, value, params)?;
            Ok((item_id, record))
        })
        .collect()
}
