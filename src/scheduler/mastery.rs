use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scheduler::decay::weighted_success_rate;
use crate::scheduler::params::SrsParams;
use crate::scheduler::types::ProgressRecord;

/// Mastered iff enough lifetime successes AND a high enough decay-weighted rate.
///
/// Pure function of the history and `now`: a mastered item can fall back to
/// unmastered with no new attempt as its successes age.
pub fn is_mastered(record: &ProgressRecord, now: DateTime<Utc>, params: &SrsParams) -> bool {
    if record.attempts == 0 || record.successes < params.mastery_min_successes {
        return false;
    }
    weighted_success_rate(&record.attempt_history, now, params) >= params.mastery_success_rate
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MasteryStatus {
    NotStarted,
    InProgress { needs_successes: bool, needs_rate: bool },
    Mastered,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasteryReport {
    pub status: MasteryStatus,
    pub successes: u32,
    pub attempts: u32,
    pub raw_success_rate: f64,
    pub weighted_success_rate: f64,
    pub min_successes: u32,
    pub required_rate: f64,
}

impl MasteryReport {
    pub fn is_mastered(&self) -> bool {
        self.status == MasteryStatus::Mastered
    }

    /// Human-readable reasons, e.g. for a "selecting word" diagnostic line.
    pub fn describe(&self) -> String {
        match &self.status {
            MasteryStatus::NotStarted => "not started".to_string(),
            MasteryStatus::Mastered => "ready for mastery".to_string(),
            MasteryStatus::InProgress {
                needs_successes,
                needs_rate,
            } => {
                let mut reasons = Vec::new();
                if *needs_successes {
                    reasons.push(format!(
                        "needs more successful reviews (minimum {})",
                        self.min_successes
                    ));
                }
                if *needs_rate {
                    reasons.push(format!(
                        "needs higher success rate (current: {:.1}%)",
                        self.weighted_success_rate * 100.0
                    ));
                }
                reasons.join(", ")
            }
        }
    }
}

pub fn mastery_report(record: &ProgressRecord, now: DateTime<Utc>, params: &SrsParams) -> MasteryReport {
    let weighted = weighted_success_rate(&record.attempt_history, now, params);
    let status = if record.attempts == 0 {
        MasteryStatus::NotStarted
    } else {
        let needs_successes = record.successes < params.mastery_min_successes;
        let needs_rate = weighted < params.mastery_success_rate;
        if needs_successes || needs_rate {
            MasteryStatus::InProgress {
                needs_successes,
                needs_rate,
            }
        } else {
            MasteryStatus::Mastered
        }
    };

    MasteryReport {
        status,
        successes: record.successes,
        attempts: record.attempts,
        raw_success_rate: record.raw_success_rate(),
        weighted_success_rate: weighted,
        min_successes: params.mastery_min_successes,
        required_rate: params.mastery_success_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::types::AttemptEntry;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record_with(outcomes: &[(i64, bool)]) -> ProgressRecord {
        let params = SrsParams::default();
        let mut record = ProgressRecord::seed(now() - Duration::days(2), &params);
        for &(minutes_ago, success) in outcomes {
            record.attempts += 1;
            if success {
                record.successes += 1;
            }
            record.attempt_history.push(AttemptEntry {
                timestamp: now() - Duration::minutes(minutes_ago),
                success,
            });
        }
        record
    }

    #[test]
    fn test_zero_attempts_never_mastered() {
        let params = SrsParams::default();
        let record = ProgressRecord::seed(now(), &params);
        assert!(!is_mastered(&record, now(), &params));
        assert_eq!(mastery_report(&record, now(), &params).status, MasteryStatus::NotStarted);
    }

    #[test]
    fn test_nine_of_ten_within_the_hour_is_mastered() {
        let params = SrsParams::default();
        let mut outcomes: Vec<(i64, bool)> = (1..=9).map(|m| (m * 5, true)).collect();
        outcomes.insert(0, (58, false));
        let record = record_with(&outcomes);
        assert_eq!(record.attempts, 10);
        assert_eq!(record.successes, 9);
        assert!(is_mastered(&record, now(), &params));
        assert!(mastery_report(&record, now(), &params).is_mastered());
    }

    #[test]
    fn test_mastery_lost_after_400_days() {
        let params = SrsParams::default();
        let mut outcomes: Vec<(i64, bool)> = (1..=9).map(|m| (m * 5, true)).collect();
        outcomes.insert(0, (58, false));
        let record = record_with(&outcomes);
        let later = now() + Duration::days(400);
        let rate = weighted_success_rate(&record.attempt_history, later, &params);
        assert!(rate < 0.02, "rate was {rate}");
        assert!(!is_mastered(&record, later, &params));
    }

    #[test]
    fn test_too_few_successes() {
        let params = SrsParams::default();
        let record = record_with(&[(4, true), (3, true), (2, true), (1, true)]);
        assert!(!is_mastered(&record, now(), &params));
        let report = mastery_report(&record, now(), &params);
        assert_eq!(
            report.status,
            MasteryStatus::InProgress {
                needs_successes: true,
                needs_rate: false
            }
        );
        assert_eq!(report.describe(), "needs more successful reviews (minimum 5)");
    }

    #[test]
    fn test_recent_failures_block_mastery() {
        let params = SrsParams::default();
        let record = record_with(&[
            (60, true),
            (50, true),
            (40, true),
            (30, true),
            (20, true),
            (10, false),
            (5, false),
        ]);
        assert!(!is_mastered(&record, now(), &params));
        assert!(mastery_report(&record, now(), &params)
            .describe()
            .starts_with("needs higher success rate"));
    }
}
