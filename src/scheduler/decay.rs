//! Temporal decay weighting of attempt history.
//!
//! Every attempt contributes `w = e^(-λ·hoursAgo)` with `λ = ln 2 / half-life`.
//! The rate is `Σ(w·success) / (Σw + anchor)`: the anchor is a fixed-weight
//! present-moment observation that does not age, so an unreviewed history
//! loses standing as its real weights shrink. With `anchor = 0` this is the
//! plain weighted ratio.

use chrono::{DateTime, Utc};

use crate::scheduler::params::SrsParams;
use crate::scheduler::types::{elapsed_hours, AttemptEntry};

/// Weight of a single attempt made `hours_ago` hours before now.
pub fn attempt_weight(hours_ago: f64, params: &SrsParams) -> f64 {
    (-params.decay_rate_per_hour() * hours_ago.max(0.0)).exp()
}

/// Recency-weighted success rate in `[0, 1]`. Empty history yields `0.0`.
pub fn weighted_success_rate(history: &[AttemptEntry], now: DateTime<Utc>, params: &SrsParams) -> f64 {
    if history.is_empty() {
        return 0.0;
    }

    let (weighted_successes, total_weight) =
        history.iter().fold((0.0, 0.0), |(successes, total), attempt| {
            let w = attempt_weight(elapsed_hours(attempt.timestamp, now), params);
            let hit = if attempt.success { w } else { 0.0 };
            (successes + hit, total + w)
        });

    let denominator = total_weight + params.decay_anchor_weight;
    if denominator <= 0.0 {
        return 0.0;
    }
    (weighted_successes / denominator).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const EPSILON: f64 = 1e-9;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn attempt(hours_ago: i64, success: bool) -> AttemptEntry {
        AttemptEntry {
            timestamp: now() - Duration::hours(hours_ago),
            success,
        }
    }

    #[test]
    fn test_empty_history_is_zero() {
        let params = SrsParams::default();
        assert_eq!(weighted_success_rate(&[], now(), &params), 0.0);
        assert_eq!(weighted_success_rate(&[], now() + Duration::days(900), &params), 0.0);
    }

    #[test]
    fn test_half_life_weight() {
        let params = SrsParams::default();
        assert!((attempt_weight(0.0, &params) - 1.0).abs() < EPSILON);
        assert!((attempt_weight(30.0 * 24.0, &params) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_future_attempts_count_as_now() {
        let params = SrsParams::default();
        assert!((attempt_weight(-48.0, &params) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_plain_ratio_without_anchor() {
        let params = SrsParams {
            decay_anchor_weight: 0.0,
            ..Default::default()
        };
        // success now (w=1), failure one half-life ago (w=0.5)
        let history = vec![attempt(30 * 24, false), attempt(0, true)];
        let rate = weighted_success_rate(&history, now(), &params);
        assert!((rate - 1.0 / 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_recent_attempts_dominate() {
        let params = SrsParams::default();
        let old_successes_recent_failures = vec![
            attempt(90 * 24, true),
            attempt(90 * 24, true),
            attempt(90 * 24, true),
            attempt(1, false),
            attempt(0, false),
        ];
        let rate = weighted_success_rate(&old_successes_recent_failures, now(), &params);
        assert!(rate < 0.5, "rate was {rate}");
    }

    #[test]
    fn test_rate_decays_without_new_attempts() {
        let params = SrsParams::default();
        let history: Vec<_> = (0..6).map(|h| attempt(h, true)).collect();
        let fresh = weighted_success_rate(&history, now(), &params);
        let stale = weighted_success_rate(&history, now() + Duration::days(400), &params);
        assert!(fresh > 0.98);
        assert!(stale < 0.05, "stale rate was {stale}");
    }
}
