use chrono::{DateTime, Utc};

use crate::scheduler::mastery::is_mastered;
use crate::scheduler::params::SrsParams;
use crate::scheduler::types::{ProgressMap, ProgressRecord};

pub fn is_active(record: &ProgressRecord, now: DateTime<Utc>, params: &SrsParams) -> bool {
    record.attempts > 0 && !is_mastered(record, now, params)
}

/// Items with at least one attempt that are not yet mastered.
pub fn count_active(progress: &ProgressMap, now: DateTime<Utc>, params: &SrsParams) -> usize {
    progress
        .values()
        .filter(|record| is_active(record, now, params))
        .count()
}

pub fn has_room(active_count: usize, params: &SrsParams) -> bool {
    active_count < params.max_active_words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::interval::record_attempt;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_seed_and_mastered_records_do_not_count() {
        let params = SrsParams::default();
        let mut progress = ProgressMap::new();

        progress.insert("000001".into(), ProgressRecord::seed(t0(), &params));

        let mut learning = ProgressRecord::seed(t0(), &params);
        record_attempt(&mut learning, false, t0() + Duration::minutes(1), &params);
        progress.insert("000002".into(), learning);

        let mut mastered = ProgressRecord::seed(t0(), &params);
        for i in 0..6 {
            record_attempt(&mut mastered, true, t0() + Duration::minutes(i), &params);
        }
        progress.insert("000003".into(), mastered);

        let now = t0() + Duration::minutes(10);
        assert_eq!(count_active(&progress, now, &params), 1);
        assert!(has_room(1, &params));
        assert!(!has_room(params.max_active_words, &params));
    }
}
