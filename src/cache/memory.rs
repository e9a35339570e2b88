// ABOUTME: In-memory result cache with TTL freshness checks and prefix eviction
// ABOUTME: Includes background cleanup task for expired entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use super::{Clock, ComputeFuture, ResultCache, ResultCacheConfig, SystemClock};

/// Stored tool output. Entries are replaced, never updated in place.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) <= ttl
    }
}

/// Process-wide result cache on a sharded concurrent map.
///
/// No guard is ever held across the `compute` await, so a slow gateway call never
/// blocks readers of other keys.
pub struct InMemoryResultCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl InMemoryResultCache {
    /// Create a cache on the system clock
    #[must_use]
    pub fn new(config: ResultCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache on a caller-supplied clock
    #[must_use]
    pub fn with_clock(config: ResultCacheConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(DashMap::new());

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let store_clone = Arc::clone(&store);
            let clock_clone = Arc::clone(&clock);
            let ttl = config.ttl;
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone, clock_clone.now(), ttl);
                        }
                        _ = shutdown_rx.recv() => {
                            debug!("Result cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(shutdown_tx)
        } else {
            None
        };

        Self {
            store,
            ttl: config.ttl,
            clock,
            shutdown_tx,
        }
    }

    /// Configured TTL
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, fresh or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn cleanup_expired(store: &DashMap<String, CacheEntry>, now: Instant, ttl: Duration) {
        let before = store.len();
        store.retain(|_, entry| entry.is_fresh(now, ttl));
        let removed = before.saturating_sub(store.len());
        if removed > 0 {
            debug!("Cleaned up {} expired result cache entries", removed);
        }
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn get_or_compute(&self, key: &str, compute: ComputeFuture<'_>) -> String {
        let now = self.clock.now();
        let cached = self
            .store
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone());

        if let Some(value) = cached {
            debug!(cache_key = %key, "Result cache hit");
            return value;
        }

        debug!(cache_key = %key, "Result cache miss");
        let value = compute.await;
        self.store.insert(
            key.to_owned(),
            CacheEntry {
                value: value.clone(),
                stored_at: self.clock.now(),
            },
        );
        value
    }

    fn evict_by_prefix(&self, prefix: &str) -> usize {
        if prefix.is_empty() {
            return 0;
        }
        let before = self.store.len();
        self.store.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.store.len());
        debug!(prefix = %prefix, removed, "Evicted result cache entries");
        removed
    }
}

impl Drop for InMemoryResultCache {
    fn drop(&mut self) {
        if let Some(tx) = &self.shutdown_tx {
            if let Err(e) = tx.try_send(()) {
                debug!(error = ?e, "Result cache shutdown signal send failed (channel likely closed)");
            }
        }
    }
}
