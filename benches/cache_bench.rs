// ABOUTME: Criterion benchmarks for the tool result cache
// ABOUTME: Measures hit/miss latency of get_or_compute and per-user prefix eviction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! Criterion benchmarks for the tool result cache.
//!
//! Query results are short JSON-bearing strings keyed by `domain:user:parts`;
//! the payload sizes below bracket what a page of records renders to.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use healthlife_server::cache::{CacheKey, InMemoryResultCache, ResultCache, ResultCacheConfig};
use tokio::runtime::Runtime;

/// Rendered query sizes
#[derive(Debug, Clone, Copy)]
enum PayloadSize {
    Small,
    Page,
    LargePage,
}

impl PayloadSize {
    const fn bytes(self) -> usize {
        match self {
            Self::Small => 100,
            Self::Page => 2_000,
            Self::LargePage => 20_000,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Small => "100B",
            Self::Page => "2KB",
            Self::LargePage => "20KB",
        }
    }
}

fn query_key(user: usize, page: usize) -> String {
    CacheKey::new("diet.query", Some(&user.to_string()))
        .opt_part(None::<&str>)
        .opt_part(None::<&str>)
        .opt_part(None::<&str>)
        .part(page)
        .part(10)
        .to_string()
}

/// No background sweeper, long TTL so nothing expires mid-run
fn bench_cache() -> InMemoryResultCache {
    InMemoryResultCache::new(ResultCacheConfig {
        ttl: Duration::from_secs(3600),
        cleanup_interval: Duration::from_secs(3600),
        enable_background_cleanup: false,
    })
}

fn bench_get_or_compute(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("result_cache_get_or_compute");

    for size in [PayloadSize::Small, PayloadSize::Page, PayloadSize::LargePage] {
        let payload = "x".repeat(size.bytes());
        let cache = bench_cache();
        rt.block_on(async {
            for user in 0..100 {
                let value = payload.clone();
                cache
                    .get_or_compute(&query_key(user, 1), Box::pin(async move { value }))
                    .await;
            }
        });

        group.throughput(Throughput::Bytes(size.bytes() as u64));
        group.bench_with_input(BenchmarkId::new("hit", size.name()), &payload, |b, payload| {
            let mut user = 0_usize;
            b.iter(|| {
                let key = query_key(user % 100, 1);
                user = user.wrapping_add(1);
                let value = payload.clone();
                rt.block_on(async {
                    black_box(cache.get_or_compute(black_box(&key), Box::pin(async move { value })).await)
                })
            });
        });

        group.bench_with_input(BenchmarkId::new("miss", size.name()), &payload, |b, payload| {
            let mut page = 1_000_usize;
            b.iter(|| {
                let key = query_key(0, page);
                page = page.wrapping_add(1);
                let value = payload.clone();
                rt.block_on(async {
                    black_box(cache.get_or_compute(black_box(&key), Box::pin(async move { value })).await)
                })
            });
        });
    }

    group.finish();
}

fn bench_evict_by_prefix(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("result_cache_evict_by_prefix");

    for entries in [100_usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("one_user", entries), &entries, |b, &entries| {
            b.iter_batched(
                || {
                    let cache = bench_cache();
                    rt.block_on(async {
                        for i in 0..entries {
                            cache
                                .get_or_compute(
                                    &query_key(i % 50, i),
                                    Box::pin(async { "cached".to_owned() }),
                                )
                                .await;
                        }
                    });
                    cache
                },
                |cache| {
                    let prefix = CacheKey::user_prefix("diet.query", Some("7"));
                    black_box(cache.evict_by_prefix(black_box(&prefix)))
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_or_compute, bench_evict_by_prefix);
criterion_main!(benches);
