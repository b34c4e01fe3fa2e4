use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::params::SrsParams;

pub type ItemId = String;

/// Progress records keyed by item id. Ordered so persisted output is stable.
pub type ProgressMap = BTreeMap<ItemId, ProgressRecord>;

/// A learnable flashcard as provided by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: ItemId,
    pub text: String,
    pub answer: String,
}

impl VocabularyItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptEntry {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub attempts: u32,
    pub successes: u32,
    /// Hours until the item is due again, measured from `last_seen`.
    pub interval: f64,
    pub easiness_factor: f64,
    #[serde(with = "timestamp")]
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub last_attempt_was_failure: bool,
    /// Elapsed hours between consecutive presentations, newest last.
    #[serde(default)]
    pub review_intervals: Vec<f64>,
    #[serde(default)]
    pub attempt_history: Vec<AttemptEntry>,
    #[serde(with = "timestamp")]
    pub first_introduced: DateTime<Utc>,
}

impl ProgressRecord {
    /// Seed state for an item presented for the first time.
    pub fn seed(now: DateTime<Utc>, params: &SrsParams) -> Self {
        Self {
            attempts: 0,
            successes: 0,
            interval: 0.0,
            easiness_factor: params.initial_easiness,
            last_seen: now,
            last_attempt_was_failure: false,
            review_intervals: Vec::new(),
            attempt_history: Vec::new(),
            first_introduced: now,
        }
    }

    pub fn hours_since_last_seen(&self, now: DateTime<Utc>) -> f64 {
        elapsed_hours(self.last_seen, now)
    }

    pub fn raw_success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.successes as f64 / self.attempts as f64
    }

    /// Structural checks a record must pass before the scheduler trusts it.
    pub fn validate(&self) -> Result<(), String> {
        if self.successes > self.attempts {
            return Err(format!(
                "successes ({}) exceed attempts ({})",
                self.successes, self.attempts
            ));
        }
        if self.attempt_history.len() > self.attempts as usize {
            return Err(format!(
                "attempt history holds {} entries but attempts is {}",
                self.attempt_history.len(),
                self.attempts
            ));
        }
        if !self.interval.is_finite() || self.interval < 0.0 {
            return Err(format!("invalid interval {}", self.interval));
        }
        if !self.easiness_factor.is_finite() || self.easiness_factor <= 0.0 {
            return Err(format!("invalid easiness factor {}", self.easiness_factor));
        }
        Ok(())
    }
}

/// Signed elapsed time in hours from `from` to `to`.
pub fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        None => delta.num_seconds() as f64 / 3600.0,
    }
}

/// RFC 3339 timestamps, tolerant of the naive ISO-8601 strings older files carry.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
