// ABOUTME: Concurrent in-memory implementation of the session registry
// ABOUTME: Uses sharded map entry locking so concurrent first access yields one store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use super::{ConversationMemory, SessionStore};

/// Process-wide session registry. No eviction or expiry.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Arc<ConversationMemory>>,
}

impl InMemorySessionStore {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a live session
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: &str) -> Arc<ConversationMemory> {
        // entry() holds the shard lock, so racing first calls agree on one instance
        let entry = self
            .sessions
            .entry(user_id.to_owned())
            .or_insert_with(|| {
                debug!(user_id = %user_id, "Creating conversation memory");
                Arc::new(ConversationMemory::new())
            });
        Arc::clone(entry.value())
    }

    fn clear(&self, user_id: &str) -> bool {
        let removed = self.sessions.remove(user_id).is_some();
        info!(user_id = %user_id, removed, "Cleared conversation memory");
        removed
    }
}
