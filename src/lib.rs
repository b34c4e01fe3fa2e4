//! # vocab-srs
//!
//! Spaced-repetition scheduling for a vocabulary flashcard trainer.
//!
//! - [`scheduler`] - decay-weighted mastery, SM-2 style intervals, priority,
//!   active-set gating and next-item selection
//! - [`recorder`] - applies answers to the progress map and persists it
//! - [`storage`] - progress store and vocabulary catalog contracts with JSON
//!   and in-memory adapters
//!
//! ```rust
//! use chrono::Utc;
//! use vocab_srs::scheduler::{Selection, SrsParams, VocabularyItem};
//! use vocab_srs::storage::MemoryProgressStore;
//! use vocab_srs::ProgressRecorder;
//!
//! let catalog = vec![VocabularyItem::new("000001", "ねこ", "chat")];
//! let mut recorder = ProgressRecorder::open(MemoryProgressStore::new(), SrsParams::default()).unwrap();
//!
//! let now = Utc::now();
//! if let Selection::New(candidate) = recorder.next_item(&catalog, now).unwrap() {
//!     recorder.record_answer(&candidate.item.id, true, now);
//! }
//! assert_eq!(recorder.record("000001").unwrap().attempts, 1);
//! ```

pub mod config;
pub mod logging;
pub mod recorder;
pub mod scheduler;
pub mod storage;

pub use recorder::{ProgressRecorder, PruneOutcome};
pub use scheduler::{Selection, SelectionError, SrsParams, WordSelector};
pub use storage::{ProgressStore, StorageError, StorageResult, VocabularyCatalog};
