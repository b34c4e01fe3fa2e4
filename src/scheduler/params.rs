use serde::{Deserialize, Serialize};

pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;
pub const MIN_EASINESS_FACTOR: f64 = 1.3;
pub const EASINESS_INCREASE: f64 = 0.1;
pub const EASINESS_DECREASE: f64 = 0.2;
/// 2 minutes, in hours
pub const FIRST_SUCCESS_INTERVAL: f64 = 0.0333;
/// 1 day, in hours
pub const SECOND_SUCCESS_INTERVAL: f64 = 24.0;
pub const MAX_ACTIVE_WORDS: usize = 8;
pub const MASTERY_MIN_SUCCESSES: u32 = 5;
pub const MASTERY_SUCCESS_RATE: f64 = 0.85;
pub const FAILED_WORD_PRIORITY_BONUS: f64 = 0.3;
pub const NEW_ITEM_PRIORITY: f64 = 0.8;
pub const HALF_LIFE_DAYS: f64 = 30.0;
/// Weight of the present-moment "not recalled" pseudo-observation in the decay ratio
pub const DECAY_ANCHOR_WEIGHT: f64 = 0.05;
pub const MAX_REVIEW_INTERVALS_HISTORY: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },
}

/// Scheduler tuning. `Default` carries the canonical trainer values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsParams {
    pub initial_easiness: f64,
    pub min_easiness: f64,
    pub easiness_increase: f64,
    pub easiness_decrease: f64,
    pub first_success_interval: f64,
    pub second_success_interval: f64,
    pub max_active_words: usize,
    pub mastery_min_successes: u32,
    pub mastery_success_rate: f64,
    pub failed_priority_bonus: f64,
    pub new_item_priority: f64,
    pub half_life_days: f64,
    pub decay_anchor_weight: f64,
    pub max_review_intervals: usize,
}

impl Default for SrsParams {
    fn default() -> Self {
        Self {
            initial_easiness: INITIAL_EASINESS_FACTOR,
            min_easiness: MIN_EASINESS_FACTOR,
            easiness_increase: EASINESS_INCREASE,
            easiness_decrease: EASINESS_DECREASE,
            first_success_interval: FIRST_SUCCESS_INTERVAL,
            second_success_interval: SECOND_SUCCESS_INTERVAL,
            max_active_words: MAX_ACTIVE_WORDS,
            mastery_min_successes: MASTERY_MIN_SUCCESSES,
            mastery_success_rate: MASTERY_SUCCESS_RATE,
            failed_priority_bonus: FAILED_WORD_PRIORITY_BONUS,
            new_item_priority: NEW_ITEM_PRIORITY,
            half_life_days: HALF_LIFE_DAYS,
            decay_anchor_weight: DECAY_ANCHOR_WEIGHT,
            max_review_intervals: MAX_REVIEW_INTERVALS_HISTORY,
        }
    }
}

impl SrsParams {
    /// Decay constant λ per hour: ln 2 / half-life in hours.
    pub fn decay_rate_per_hour(&self) -> f64 {
        std::f64::consts::LN_2 / (self.half_life_days * 24.0)
    }

    pub fn clamp_easiness(&self, ef: f64) -> f64 {
        ef.clamp(self.min_easiness, self.initial_easiness)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let floats = [
            ("initial_easiness", self.initial_easiness),
            ("min_easiness", self.min_easiness),
            ("easiness_increase", self.easiness_increase),
            ("easiness_decrease", self.easiness_decrease),
            ("first_success_interval", self.first_success_interval),
            ("second_success_interval", self.second_success_interval),
            ("mastery_success_rate", self.mastery_success_rate),
            ("failed_priority_bonus", self.failed_priority_bonus),
            ("new_item_priority", self.new_item_priority),
            ("half_life_days", self.half_life_days),
            ("decay_anchor_weight", self.decay_anchor_weight),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
        }

        if self.min_easiness <= 0.0 || self.min_easiness > self.initial_easiness {
            return Err(ParamsError::OutOfRange {
                name: "min_easiness",
                reason: format!(
                    "expected 0 < {} <= initial_easiness ({})",
                    self.min_easiness, self.initial_easiness
                ),
            });
        }
        if self.easiness_increase < 0.0 || self.easiness_decrease < 0.0 {
            return Err(ParamsError::OutOfRange {
                name: "easiness_step",
                reason: "easiness steps must be non-negative".to_string(),
            });
        }
        if self.first_success_interval <= 0.0
            || self.second_success_interval <= self.first_success_interval
        {
            return Err(ParamsError::OutOfRange {
                name: "success_intervals",
                reason: format!(
                    "expected 0 < {} < {}",
                    self.first_success_interval, self.second_success_interval
                ),
            });
        }
        for (name, value) in [
            ("mastery_success_rate", self.mastery_success_rate),
            ("new_item_priority", self.new_item_priority),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::OutOfRange {
                    name,
                    reason: format!("{value} not in [0, 1]"),
                });
            }
        }
        if self.failed_priority_bonus < 0.0 {
            return Err(ParamsError::OutOfRange {
                name: "failed_priority_bonus",
                reason: "must be non-negative".to_string(),
            });
        }
        if self.half_life_days <= 0.0 {
            return Err(ParamsError::OutOfRange {
                name: "half_life_days",
                reason: "must be positive".to_string(),
            });
        }
        if self.decay_anchor_weight < 0.0 {
            return Err(ParamsError::OutOfRange {
                name: "decay_anchor_weight",
                reason: "must be non-negative".to_string(),
            });
        }
        if self.max_review_intervals == 0 {
            return Err(ParamsError::OutOfRange {
                name: "max_review_intervals",
                reason: "history must hold at least one entry".to_string(),
            });
        }
        Ok(())
    }
}
