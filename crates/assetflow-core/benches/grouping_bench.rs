//! # Grouping Benchmarks
//!
//! Performance benchmarks for version grouping and ranking.
//!
//! Run with: `cargo bench -p assetflow-core`

use assetflow_core::{FileVariant, group_by_base_name, rank_variants};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::{Duration, SystemTime};

/// A folder of `size` files spread over groups of five versions each.
fn create_folder_listing(size: u64) -> Vec<FileVariant> {
    (0..size)
        .map(|i| {
            let name = format!(
                "PV025_AEN_02_DOC{:05}_2024-01-{:02}_v{:02}.pdf",
                i / 5,
                i % 28 + 1,
                i % 5 + 1
            );
            let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(i * 60);
            FileVariant::new(name.clone(), name, modified)
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by_base_name");

    for size in [100u64, 1000, 10000].iter() {
        let listing = create_folder_listing(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &listing, |b, listing| {
            b.iter(|| black_box(group_by_base_name(listing.iter().cloned())));
        });
    }

    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_variants");

    for size in [10u64, 100, 1000].iter() {
        let listing = create_folder_listing(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &listing, |b, listing| {
            b.iter(|| {
                let mut variants = listing.clone();
                rank_variants(&mut variants);
                black_box(variants)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grouping, bench_ranking);
criterion_main!(benches);
