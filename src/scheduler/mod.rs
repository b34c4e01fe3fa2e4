//! Spaced-repetition scheduling engine.
//!
//! Contains:
//! - Temporal decay - recency-weighted success rate over attempt history
//! - Mastery - minimum successes plus decay-weighted rate threshold
//! - Interval - SM-2 style interval/ease progression and the attempt mutation
//! - Priority - overdue ratio with failure bonus, new-item score
//! - Active set - caps how many unmastered items are in flight
//! - Selector - picks the single next item to present
//!
//! Every function takes `now` explicitly; nothing here reads the clock.

pub mod active_set;
pub mod decay;
pub mod interval;
pub mod mastery;
pub mod params;
pub mod priority;
pub mod selector;
pub mod stats;
pub mod types;

pub use active_set::{count_active, has_room, is_active};
pub use decay::{attempt_weight, weighted_success_rate};
pub use interval::{
    hours_until_due, is_due, is_newly_introduced, next_easiness, next_interval, record_attempt,
    AttemptOutcome, SchedulePhase,
};
pub use mastery::{is_mastered, mastery_report, MasteryReport, MasteryStatus};
pub use params::{ParamsError, SrsParams};
pub use priority::{new_item_priority, priority};
pub use selector::{Candidate, Selection, SelectionError, WordSelector};
pub use stats::{format_interval, history_marks, item_stats, ItemStats, PracticeStats};
pub use types::{elapsed_hours, AttemptEntry, ItemId, ProgressMap, ProgressRecord, VocabularyItem};
