// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Scripted model provider, counting gateway, and tool/server resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `healthlife_server`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use futures_util::stream;
use healthlife_core::models::HealthRecord;
use healthlife_core::pagination::{Page, PageQuery};
use healthlife_server::{
    auth::JwtAuthenticator,
    cache::{InMemoryResultCache, ResultCache, ResultCacheConfig},
    errors::{AppError, AppResult},
    gateway::{HealthDataGateway, InMemoryRecordStore, RecordGateway},
    llm::{ChatRequest, ChatStream, LlmCapabilities, LlmProvider, StreamChunk, ToolCallDelta},
    resources::ServerResources,
    tools::{ToolContext, ToolRegistry},
};

static INIT_LOGGER: Once = Once::new();

/// Secret used to sign test tokens
pub const TEST_JWT_SECRET: &str = "healthlife-test-secret";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Cache without the background sweeper
pub fn test_cache() -> Arc<InMemoryResultCache> {
    Arc::new(InMemoryResultCache::new(ResultCacheConfig {
        enable_background_cleanup: false,
        ..ResultCacheConfig::default()
    }))
}

/// Tool context over in-memory storage and a fresh cache
pub fn test_context() -> ToolContext {
    init_test_logging();
    ToolContext::new(HealthDataGateway::in_memory(), test_cache())
}

/// Tool context over `gateway` and a fresh cache
pub fn context_with_gateway(gateway: HealthDataGateway) -> ToolContext {
    init_test_logging();
    ToolContext::new(gateway, test_cache())
}

/// Wraps an in-memory store and counts `page` calls
pub struct CountingGateway<R> {
    inner: InMemoryRecordStore<R>,
    pages: AtomicUsize,
}

impl<R: HealthRecord> CountingGateway<R> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryRecordStore::new(),
            pages: AtomicUsize::new(0),
        })
    }

    pub fn page_calls(&self) -> usize {
        self.pages.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: HealthRecord> RecordGateway<R> for CountingGateway<R> {
    async fn page(&self, query: &PageQuery) -> AppResult<Page<R>> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        self.inner.page(query).await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<R>> {
        self.inner.get_by_id(id).await
    }

    async fn insert(&self, record: R) -> AppResult<R> {
        self.inner.insert(record).await
    }

    async fn update(&self, record: &R) -> AppResult<()> {
        self.inner.update(record).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.inner.delete(id).await
    }
}

/// One scripted model round
pub enum Round {
    /// Stream these chunks, then end
    Chunks(Vec<Result<StreamChunk, AppError>>),
    /// Fail before streaming
    Fail(AppError),
    /// Open a stream that never yields
    Stall,
}

impl Round {
    /// Text deltas followed by a stop chunk
    pub fn text(parts: &[&str]) -> Self {
        let mut chunks: Vec<_> = parts.iter().map(|part| Ok(StreamChunk::text(*part))).collect();
        chunks.push(Ok(StreamChunk::done("stop")));
        Self::Chunks(chunks)
    }

    /// A single tool call split into two argument fragments
    pub fn tool_call(id: &str, name: &str, arguments: &str) -> Self {
        let split = arguments.len() / 2;
        let split = (0..=split)
            .rev()
            .find(|i| arguments.is_char_boundary(*i))
            .unwrap_or(0);
        Self::Chunks(vec![
            Ok(StreamChunk {
                tool_calls: vec![ToolCallDelta {
                    index: 0,
                    id: Some(id.to_owned()),
                    name: Some(name.to_owned()),
                    arguments: Some(arguments[..split].to_owned()),
                }],
                ..StreamChunk::default()
            }),
            Ok(StreamChunk {
                tool_calls: vec![ToolCallDelta {
                    index: 0,
                    id: None,
                    name: None,
                    arguments: Some(arguments[split..].to_owned()),
                }],
                ..StreamChunk::default()
            }),
            Ok(StreamChunk::done("tool_calls")),
        ])
    }
}

/// Model provider that replays scripted rounds and records every request
pub struct ScriptedProvider {
    rounds: Mutex<VecDeque<Round>>,
    requests: Mutex<Vec<ChatRequest>>,
    capabilities: LlmCapabilities,
}

impl ScriptedProvider {
    pub fn new(rounds: Vec<Round>) -> Arc<Self> {
        Self::with_capabilities(rounds, LlmCapabilities::tool_streaming())
    }

    /// Provider advertising `capabilities` instead of full tool streaming
    pub fn with_capabilities(rounds: Vec<Round>, capabilities: LlmCapabilities) -> Arc<Self> {
        Arc::new(Self {
            rounds: Mutex::new(rounds.into()),
            requests: Mutex::new(Vec::new()),
            capabilities,
        })
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete_stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let round = self.rounds.lock().unwrap().pop_front();
        match round {
            Some(Round::Chunks(chunks)) => Ok(Box::pin(stream::iter(chunks))),
            Some(Round::Fail(error)) => Err(error),
            Some(Round::Stall) => Ok(Box::pin(stream::pending())),
            None => Ok(Box::pin(stream::iter(vec![Ok(StreamChunk::done("stop"))]))),
        }
    }
}

/// Server resources over in-memory storage and `provider`
pub fn test_resources(provider: Arc<dyn LlmProvider>) -> ServerResources {
    test_resources_with(provider, |builder| builder)
}

/// Server resources with extra builder customisation
pub fn test_resources_with(
    provider: Arc<dyn LlmProvider>,
    customise: impl FnOnce(
        healthlife_server::resources::ServerResourcesBuilder,
    ) -> healthlife_server::resources::ServerResourcesBuilder,
) -> ServerResources {
    init_test_logging();
    let cache: Arc<dyn ResultCache> = test_cache();
    let builder = ServerResources::builder()
        .with_authenticator(JwtAuthenticator::new(TEST_JWT_SECRET))
        .with_provider(provider)
        .with_cache(cache);
    customise(builder).build().expect("test resources")
}

/// Registry over in-memory storage
pub fn test_registry() -> ToolRegistry {
    ToolRegistry::new(test_context())
}

/// Signed token for `user_id`
pub fn token_for(user_id: &str) -> String {
    JwtAuthenticator::new(TEST_JWT_SECRET)
        .issue(user_id, chrono::Duration::hours(1))
        .expect("token")
}
