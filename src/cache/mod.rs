// ABOUTME: Result cache abstraction for memoizing tool-call output within a conversation turn
// ABOUTME: Key builder, TTL configuration, and the injectable ResultCache trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// Time source used for TTL decisions
pub mod clock;
/// In-memory result cache backed by a concurrent map
pub mod memory;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;

use crate::constants::cache::{
    ANONYMOUS_USER, DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_RESULT_TTL_SECS, KEY_SEPARATOR,
    NULL_PART,
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::InMemoryResultCache;

/// Deferred computation handed to [`ResultCache::get_or_compute`].
///
/// Futures are lazy, so on a hit the computation is dropped without ever running.
pub type ComputeFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Time-boxed memoization of tool results with prefix invalidation.
///
/// # Examples
///
/// ```rust,no_run
/// use healthlife_server::cache::{CacheKey, InMemoryResultCache, ResultCache, ResultCacheConfig};
/// # async fn example() {
/// let cache = InMemoryResultCache::new(ResultCacheConfig::default());
/// let key = CacheKey::new("body.query", Some("42")).part(1).part(10).to_string();
///
/// let first = cache.get_or_compute(&key, Box::pin(async { "rows".to_owned() })).await;
/// let second = cache.get_or_compute(&key, Box::pin(async { "never runs".to_owned() })).await;
/// assert_eq!(first, second);
///
/// cache.evict_by_prefix(&CacheKey::user_prefix("body.query", Some("42")));
/// # }
/// ```
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Return the stored value when it is still within TTL, otherwise run
    /// `compute` once, store its output, and return it.
    ///
    /// Concurrent misses on one key may each compute; the last store wins.
    async fn get_or_compute(&self, key: &str, compute: ComputeFuture<'_>) -> String;

    /// Remove every entry whose key starts with `prefix`. An empty prefix removes nothing.
    ///
    /// Returns the number of entries removed.
    fn evict_by_prefix(&self, prefix: &str) -> usize;
}

/// Configuration for the result cache
#[derive(Debug, Clone)]
pub struct ResultCacheConfig {
    /// How long an entry stays valid after it was stored
    pub ttl: Duration,
    /// Interval between sweeps of expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_RESULT_TTL_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

impl ResultCacheConfig {
    /// Build a configuration from a raw TTL in seconds; non-positive values use the default
    #[must_use]
    pub fn with_ttl_secs(ttl_secs: i64) -> Self {
        Self {
            ttl: resolve_ttl(ttl_secs),
            ..Self::default()
        }
    }
}

/// Map a configured TTL to a duration, falling back to the default when `ttl_secs <= 0`
#[must_use]
pub fn resolve_ttl(ttl_secs: i64) -> Duration {
    u64::try_from(ttl_secs)
        .ok()
        .filter(|secs| *secs > 0)
        .map_or(Duration::from_secs(DEFAULT_RESULT_TTL_SECS), Duration::from_secs)
}

/// Structured cache key: `domain:user:part:part...`
///
/// A missing user renders as `anonymous`; a missing part renders as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    domain: String,
    user: String,
    parts: Vec<String>,
}

impl CacheKey {
    /// Start a key for `domain` scoped to `user`
    #[must_use]
    pub fn new(domain: &str, user: Option<&str>) -> Self {
        Self {
            domain: domain.to_owned(),
            user: user.unwrap_or(ANONYMOUS_USER).to_owned(),
            parts: Vec::new(),
        }
    }

    /// Append a present part
    #[must_use]
    pub fn part(mut self, part: impl fmt::Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Append an optional part, rendering `None` as `null`
    #[must_use]
    pub fn opt_part<T: fmt::Display>(mut self, part: Option<T>) -> Self {
        self.parts
            .push(part.map_or_else(|| NULL_PART.to_owned(), |p| p.to_string()));
        self
    }

    /// Prefix covering every key of `domain` for `user`.
    ///
    /// Ends with the separator so user `1` never matches keys of user `12`.
    #[must_use]
    pub fn user_prefix(domain: &str, user: Option<&str>) -> String {
        format!(
            "{domain}{KEY_SEPARATOR}{}{KEY_SEPARATOR}",
            user.unwrap_or(ANONYMOUS_USER)
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.domain, self.user)?;
        for part in &self.parts {
            write!(f, "{KEY_SEPARATOR}{part}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_renders_anonymous_and_null() {
        let key = CacheKey::new("sleep.query", None)
            .opt_part(None::<&str>)
            .opt_part(Some("2025-01-31"))
            .part(1)
            .part(10);
        assert_eq!(key.to_string(), "sleep.query:anonymous:null:2025-01-31:1:10");
    }

    #[test]
    fn test_user_prefix_is_separator_terminated() {
        let prefix = CacheKey::user_prefix("diet.query", Some("1"));
        assert_eq!(prefix, "diet.query:1:");
        let other = CacheKey::new("diet.query", Some("12")).part(1).to_string();
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_resolve_ttl_falls_back_for_non_positive() {
        assert_eq!(resolve_ttl(0), Duration::from_secs(10));
        assert_eq!(resolve_ttl(-5), Duration::from_secs(10));
        assert_eq!(resolve_ttl(30), Duration::from_secs(30));
    }
}
