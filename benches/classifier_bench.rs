//! Classifier throughput benchmarks.
//!
//! Every line of every sync snapshot passes through the classifier, so this
//! is the hottest path when a large snapshot arrives.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `classify` | Single lines that hit the first, a middle, and no pattern |
//! | `classify_corpus` | A 1 000-line mixed corpus |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench classifier_bench
//! open target/criterion/report/index.html
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use giftfeed_core::classify;

const REFINE: &str = "2024年05月01日 20:00:02 恭喜 @(word:Bob) 炼化获得 @(word:紫晶) (520豆)x2";
const LOTTERY: &str = "2024年05月01日 20:01:00 恭喜@(word:Dave)触发@(word:36)倍，获得@(word:1296)豆";
const UNKNOWN: &str = "2024年05月01日 20:04:00 @(word:Ned) 进入了直播间";

fn corpus(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| match i % 4 {
            0 => REFINE.to_string(),
            1 => LOTTERY.to_string(),
            2 => format!("2024年05月01日 20:02:00 @(word:u{i}) 送 @(word:主播) @(word:1) 个 @(word:<扭蛋礼物>机长)，"),
            _ => format!("{UNKNOWN} #{i}"),
        })
        .collect()
}

fn single_line_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));
    for (name, line) in [("first_pattern", REFINE), ("last_pattern", LOTTERY), ("no_match", UNKNOWN)] {
        group.bench_with_input(BenchmarkId::new(name, ""), &line, |b, line| {
            b.iter(|| black_box(classify(black_box(line))))
        });
    }
    group.finish();
}

fn corpus_bench(c: &mut Criterion) {
    let lines = corpus(1_000);
    let mut group = c.benchmark_group("classify_corpus");
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("mixed_1000", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(classify(line));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, single_line_bench, corpus_bench);
criterion_main!(benches);
