// ABOUTME: Tests for per-user conversation memory and the session registry
// ABOUTME: Shared instances per user, recency window, clearing and isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use healthlife_server::llm::ChatMessage;
use healthlife_server::sessions::{ConversationMemory, InMemorySessionStore, SessionStore};

#[tokio::test]
async fn test_same_user_gets_same_memory() {
    let store = InMemorySessionStore::new();

    let first = store.get("1");
    first.append([ChatMessage::user("hi")]).await;
    let second = store.get("1");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len().await, 1);
    assert!(store.get("2").is_empty().await);
    assert_eq!(store.active_sessions(), 2);
}

#[tokio::test]
async fn test_recent_returns_tail_in_order() {
    let memory = ConversationMemory::new();
    memory
        .append((1..=6).map(|n| ChatMessage::user(format!("m{n}"))))
        .await;

    let recent = memory.recent(3).await;
    let contents: Vec<_> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m4", "m5", "m6"]);

    assert_eq!(memory.recent(50).await.len(), 6);
    assert!(memory.recent(0).await.is_empty());
}

#[tokio::test]
async fn test_clear_starts_fresh_conversation() {
    let store = InMemorySessionStore::new();
    store
        .get("1")
        .append([ChatMessage::user("q"), ChatMessage::assistant("a")])
        .await;

    assert!(store.clear("1"));
    assert!(!store.clear("1"));
    assert!(store.get("1").is_empty().await);
}

#[tokio::test]
async fn test_concurrent_first_access_agrees_on_one_instance() {
    let store = Arc::new(InMemorySessionStore::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let memory = store.get("shared");
                memory.append([ChatMessage::user("x")]).await;
                memory
            })
        })
        .collect();

    let mut memories = Vec::new();
    for handle in handles {
        memories.push(handle.await.unwrap());
    }

    assert!(memories.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(store.get("shared").len().await, 16);
}
