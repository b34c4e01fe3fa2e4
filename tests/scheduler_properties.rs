//! Property-Based Tests for the scheduling engine
//!
//! Tests the following invariants:
//! - Mastery never flips from false to true as time passes without attempts
//! - A failure resets the interval to the first landmark from any state
//! - Easiness stays within its bounds under any outcome sequence
//! - A full active set never yields a new item
//! - Selection is deterministic for identical inputs
//! - An unanswered item is always reachable while the active set has room

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use vocab_srs::scheduler::{
    count_active, is_mastered, priority, record_attempt, weighted_success_rate, AttemptEntry,
    ProgressMap, ProgressRecord, Selection, SrsParams, VocabularyItem, WordSelector,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Attempt history over the 200 days before `base_time`, sorted oldest first.
fn arb_history() -> impl Strategy<Value = Vec<AttemptEntry>> {
    prop::collection::vec((0i64..200 * 24 * 60, any::<bool>()), 0..40).prop_map(|mut raw| {
        raw.sort_by(|a, b| b.0.cmp(&a.0));
        raw.into_iter()
            .map(|(minutes_ago, success)| AttemptEntry {
                timestamp: base_time() - Duration::minutes(minutes_ago),
                success,
            })
            .collect()
    })
}

fn record_from_history(history: Vec<AttemptEntry>) -> ProgressRecord {
    let params = SrsParams::default();
    let start = history.first().map_or(base_time(), |a| a.timestamp);
    let mut record = ProgressRecord::seed(start, &params);
    record.attempts = history.len() as u32;
    record.successes = history.iter().filter(|a| a.success).count() as u32;
    if let Some(last) = history.last() {
        record.last_seen = last.timestamp;
        record.last_attempt_was_failure = !last.success;
        record.interval = 24.0;
    }
    record.attempt_history = history;
    record
}

fn arb_interval() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(SrsParams::default().first_success_interval),
        Just(24.0),
        0.05f64..5000.0,
    ]
}

fn catalog(n: usize) -> Vec<VocabularyItem> {
    (1..=n)
        .map(|i| VocabularyItem::new(format!("{i:06}"), format!("word {i}"), format!("answer {i}")))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_weighted_rate_in_unit_interval(history in arb_history(), offset_hours in 0i64..20_000) {
        let params = SrsParams::default();
        let rate = weighted_success_rate(&history, base_time() + Duration::hours(offset_hours), &params);
        prop_assert!((0.0..=1.0).contains(&rate));
    }

    #[test]
    fn prop_mastery_monotone_in_time(
        history in arb_history(),
        first in 0i64..10_000,
        gap in 1i64..10_000,
    ) {
        let params = SrsParams::default();
        let record = record_from_history(history);
        let t1 = base_time() + Duration::hours(first);
        let t2 = t1 + Duration::hours(gap);

        let r1 = weighted_success_rate(&record.attempt_history, t1, &params);
        let r2 = weighted_success_rate(&record.attempt_history, t2, &params);
        prop_assert!(r2 <= r1 + 1e-12, "rate rose from {} to {}", r1, r2);

        if !is_mastered(&record, t1, &params) {
            prop_assert!(!is_mastered(&record, t2, &params));
        }
    }

    #[test]
    fn prop_failure_resets_interval(
        interval in arb_interval(),
        easiness in 1.3f64..=2.5,
        elapsed_minutes in 0i64..100_000,
    ) {
        let params = SrsParams::default();
        let mut record = ProgressRecord::seed(base_time(), &params);
        record.interval = interval;
        record.easiness_factor = easiness;
        record.attempts = 3;
        record.successes = 2;

        record_attempt(&mut record, false, base_time() + Duration::minutes(elapsed_minutes), &params);
        prop_assert_eq!(record.interval, params.first_success_interval);
        prop_assert!(record.last_attempt_was_failure);
    }

    #[test]
    fn prop_easiness_bounded(outcomes in prop::collection::vec((any::<bool>(), 0i64..5_000), 1..60)) {
        let params = SrsParams::default();
        let mut record = ProgressRecord::seed(base_time(), &params);
        let mut now = base_time();
        for (success, gap_minutes) in outcomes {
            now += Duration::minutes(gap_minutes);
            record_attempt(&mut record, success, now, &params);
            prop_assert!(record.easiness_factor >= params.min_easiness);
            prop_assert!(record.easiness_factor <= params.initial_easiness);
            prop_assert!(record.interval > 0.0);
            prop_assert!(record.successes <= record.attempts);
            prop_assert_eq!(record.attempts as usize, record.attempt_history.len());
            prop_assert!(record.review_intervals.len() <= params.max_review_intervals);
        }
    }

    #[test]
    fn prop_full_active_set_never_selects_new(
        extra in 0usize..30,
        elapsed_minutes in 0i64..100_000,
        failed_mask in any::<u8>(),
    ) {
        let params = SrsParams::default();
        let selector = WordSelector::new(params.clone());
        let items = catalog(params.max_active_words + extra);

        let mut progress = ProgressMap::new();
        for (i, item) in items.iter().take(params.max_active_words).enumerate() {
            let mut record = ProgressRecord::seed(base_time(), &params);
            record_attempt(&mut record, failed_mask & (1 << i) == 0, base_time(), &params);
            progress.insert(item.id.clone(), record);
        }

        let now = base_time() + Duration::minutes(elapsed_minutes);
        prop_assert_eq!(count_active(&progress, now, &params), params.max_active_words);
        prop_assert_eq!(priority(None, params.max_active_words, now, &params), 0.0);

        let selection = selector.select(&items, &progress, now).unwrap();
        prop_assert!(!selection.is_new());
    }

    #[test]
    fn prop_selection_deterministic(
        answered in prop::collection::vec((any::<bool>(), 0i64..3_000), 0..12),
        extra in 0usize..5,
        elapsed_minutes in 0i64..10_000,
    ) {
        let params = SrsParams::default();
        let selector = WordSelector::new(params.clone());
        let items = catalog(answered.len() + extra);

        let mut progress = ProgressMap::new();
        for (item, (success, minutes_ago)) in items.iter().zip(&answered) {
            let at = base_time() - Duration::minutes(*minutes_ago);
            let mut record = ProgressRecord::seed(at, &params);
            record_attempt(&mut record, *success, at, &params);
            progress.insert(item.id.clone(), record);
        }

        let now = base_time() + Duration::minutes(elapsed_minutes);
        let first = selector.select(&items, &progress, now).unwrap();
        let second = selector.select(&items, &progress, now).unwrap();
        prop_assert_eq!(&first, &second);

        if items.is_empty() {
            prop_assert_eq!(first, Selection::NoItemAvailable);
        }
    }

    #[test]
    fn prop_unanswered_items_are_never_stranded(
        states in prop::collection::vec(prop::option::of((any::<bool>(), 0i64..3_000)), 1..7),
        elapsed_minutes in 0i64..100_000,
    ) {
        let params = SrsParams::default();
        let selector = WordSelector::new(params.clone());
        // one extra catalog item that only ever holds a seed record
        let items = catalog(states.len() + 1);

        let mut progress = ProgressMap::new();
        for (item, state) in items.iter().zip(&states) {
            let record = match state {
                Some((success, minutes_ago)) => {
                    let at = base_time() - Duration::minutes(*minutes_ago);
                    let mut record = ProgressRecord::seed(at, &params);
                    record_attempt(&mut record, *success, at, &params);
                    record
                }
                None => ProgressRecord::seed(base_time(), &params),
            };
            progress.insert(item.id.clone(), record);
        }
        let last = &items[states.len()];
        progress.insert(last.id.clone(), ProgressRecord::seed(base_time(), &params));

        let now = base_time() + Duration::minutes(elapsed_minutes);
        prop_assert!(count_active(&progress, now, &params) < params.max_active_words);
        let selection = selector.select(&items, &progress, now).unwrap();
        prop_assert_ne!(selection, Selection::NoItemAvailable);
    }
}
