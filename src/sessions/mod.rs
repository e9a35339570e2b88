// ABOUTME: Per-user conversation memory registry for the chat assistant
// ABOUTME: Lazily created append-only turn logs, cleared explicitly, never persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Session Memory
//!
//! Each user owns one [`ConversationMemory`]. The registry hands out the same
//! shared instance on every call until the user resets the conversation.

/// In-memory session registry
pub mod memory;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::llm::ChatMessage;

pub use memory::InMemorySessionStore;

/// Ordered, append-only log of conversation turns
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: RwLock<Vec<ChatMessage>>,
}

impl ConversationMemory {
    /// Empty memory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append turns in order
    pub async fn append(&self, messages: impl IntoIterator<Item = ChatMessage> + Send) {
        self.turns.write().await.extend(messages);
    }

    /// The `n` most recent turns, oldest first
    pub async fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let turns = self.turns.read().await;
        let start = turns.len().saturating_sub(n);
        turns[start..].to_vec()
    }

    /// Number of stored turns
    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    /// Whether no turn was stored yet
    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }
}

/// Registry mapping a user to their conversation memory
pub trait SessionStore: Send + Sync {
    /// Memory for `user_id`, created empty on first access.
    ///
    /// Every call returns the same instance until [`SessionStore::clear`].
    fn get(&self, user_id: &str) -> Arc<ConversationMemory>;

    /// Drop the association; returns whether one existed
    fn clear(&self, user_id: &str) -> bool;
}
