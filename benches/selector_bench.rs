//! Benchmark suite for vocab-srs
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vocab_srs::scheduler::{
    record_attempt, ProgressMap, ProgressRecord, SrsParams, VocabularyItem, WordSelector,
};

fn bench_select_large_catalog(c: &mut Criterion) {
    let params = SrsParams::default();
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let catalog: Vec<VocabularyItem> = (1..=5_000)
        .map(|i| VocabularyItem::new(format!("{i:06}"), format!("word {i}"), format!("answer {i}")))
        .collect();

    let mut progress = ProgressMap::new();
    for (i, item) in catalog.iter().take(2_000).enumerate() {
        let mut record = ProgressRecord::seed(t0, &params);
        let mut at = t0;
        for n in 0..(i % 12) {
            at += Duration::hours(n as i64 + 1);
            record_attempt(&mut record, (i + n) % 4 != 0, at, &params);
        }
        progress.insert(item.id.clone(), record);
    }

    let selector = WordSelector::new(params);
    let now = t0 + Duration::days(60);
    c.bench_function("WordSelector::select 5k items", |b| {
        b.iter(|| selector.select(black_box(&catalog), black_box(&progress), now))
    });
}

criterion_group!(benches, bench_select_large_catalog);
criterion_main!(benches);
