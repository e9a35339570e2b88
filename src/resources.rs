// ABOUTME: Shared resource container handed to every HTTP route
// ABOUTME: Wires authenticator, cache, sessions, tool registry, and streaming pipeline once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Server Resources
//!
//! Everything a request needs is built once at startup and shared behind an
//! `Arc`. Tests assemble the same container through [`ServerResourcesBuilder`]
//! with a scripted model provider and in-memory storage.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use healthlife_core::constants::chat::{DEFAULT_RETRIEVE_SIZE, DEFAULT_STREAM_TIMEOUT_SECS};

use crate::auth::JwtAuthenticator;
use crate::cache::{InMemoryResultCache, ResultCache, ResultCacheConfig};
use crate::chat::{ModelRuntime, StreamingPipeline};
use crate::config::{ServerConfig, StorageBackend};
use crate::errors::AppResult;
use crate::gateway::{HealthDataGateway, SqliteHealthStore};
use crate::llm::{LlmProvider, OpenAiCompatibleProvider};
use crate::sessions::{InMemorySessionStore, SessionStore};
use crate::tools::implementations::web_search::WebSearchClient;
use crate::tools::{ToolContext, ToolRegistry};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Token verification
    pub authenticator: Arc<JwtAuthenticator>,
    /// Per-user conversation memory
    pub sessions: Arc<dyn SessionStore>,
    /// Tool result cache
    pub cache: Arc<dyn ResultCache>,
    /// Tool catalogue bound to storage and cache
    pub tools: ToolRegistry,
    /// Chat turn to SSE framing
    pub pipeline: StreamingPipeline,
}

impl ServerResources {
    /// Create a new builder for `ServerResources`
    #[must_use]
    pub fn builder() -> ServerResourcesBuilder {
        ServerResourcesBuilder::new()
    }

    /// Build production resources from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or an HTTP client cannot be built
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let gateway = match &config.storage {
            StorageBackend::InMemory => {
                info!("Using in-memory health record storage");
                HealthDataGateway::in_memory()
            }
            StorageBackend::Sqlite(url) => {
                let store = SqliteHealthStore::connect(url).await?;
                HealthDataGateway::sqlite(&store)
            }
        };

        let web_search = if config.web_search_enabled {
            Some(Arc::new(WebSearchClient::new(config.web_search.clone())?))
        } else {
            None
        };

        let provider = OpenAiCompatibleProvider::new(config.llm.clone())?;

        let mut builder = Self::builder()
            .with_authenticator(JwtAuthenticator::new(&config.jwt_secret))
            .with_provider(Arc::new(provider))
            .with_gateway(gateway)
            .with_cache(Arc::new(InMemoryResultCache::new(
                ResultCacheConfig::with_ttl_secs(config.cache_ttl_secs),
            )))
            .with_stream_timeout(config.stream_timeout)
            .with_retrieve_size(config.retrieve_size)
            .with_model(config.llm.default_model.clone());
        if let Some(client) = web_search {
            builder = builder.with_web_search(client);
        }
        builder.build_resources()
    }
}

/// Builder for [`ServerResources`]
pub struct ServerResourcesBuilder {
    authenticator: Option<JwtAuthenticator>,
    provider: Option<Arc<dyn LlmProvider>>,
    gateway: Option<HealthDataGateway>,
    cache: Option<Arc<dyn ResultCache>>,
    sessions: Option<Arc<dyn SessionStore>>,
    web_search: Option<Arc<WebSearchClient>>,
    stream_timeout: Duration,
    retrieve_size: usize,
    model: Option<String>,
}

impl ServerResourcesBuilder {
    /// Builder with in-memory defaults for storage, cache, and sessions
    #[must_use]
    pub fn new() -> Self {
        Self {
            authenticator: None,
            provider: None,
            gateway: None,
            cache: None,
            sessions: None,
            web_search: None,
            stream_timeout: Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECS),
            retrieve_size: DEFAULT_RETRIEVE_SIZE,
            model: None,
        }
    }

    /// Set the token authenticator
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: JwtAuthenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Set the chat model provider
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the record gateway
    #[must_use]
    pub fn with_gateway(mut self, gateway: HealthDataGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the result cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the session registry
    #[must_use]
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Enable the web search tool
    #[must_use]
    pub fn with_web_search(mut self, client: Arc<WebSearchClient>) -> Self {
        self.web_search = Some(client);
        self
    }

    /// Whole-stream timeout
    #[must_use]
    pub const fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Remembered turns attached to each model request
    #[must_use]
    pub const fn with_retrieve_size(mut self, retrieve_size: usize) -> Self {
        self.retrieve_size = retrieve_size;
        self
    }

    /// Model id sent upstream
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the `ServerResources`
    ///
    /// # Errors
    ///
    /// Returns an error if the authenticator or provider is missing
    pub fn build(self) -> Result<ServerResources, &'static str> {
        let authenticator = self.authenticator.ok_or("Authenticator is required")?;
        let provider = self.provider.ok_or("LLM provider is required")?;
        let gateway = self.gateway.unwrap_or_else(HealthDataGateway::in_memory);
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(InMemoryResultCache::new(ResultCacheConfig::default())));
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));

        let mut context = ToolContext::new(gateway, Arc::clone(&cache));
        if let Some(client) = self.web_search {
            context = context.with_web_search(client);
        }
        let tools = ToolRegistry::new(context);

        let mut runtime = ModelRuntime::new(provider, tools.clone(), Arc::clone(&sessions))
            .with_retrieve_size(self.retrieve_size);
        if let Some(model) = self.model {
            runtime = runtime.with_model(model);
        }
        let pipeline =
            StreamingPipeline::new(Arc::new(runtime)).with_timeout(self.stream_timeout);

        Ok(ServerResources {
            authenticator: Arc::new(authenticator),
            sessions,
            cache,
            tools,
            pipeline,
        })
    }

    /// Build the `ServerResources` wrapped in an `Arc`
    ///
    /// # Errors
    ///
    /// Returns an error if any required fields are missing
    pub fn build_arc(self) -> Result<Arc<ServerResources>, &'static str> {
        Ok(Arc::new(self.build()?))
    }

    fn build_resources(self) -> AppResult<ServerResources> {
        self.build().map_err(crate::errors::AppError::internal)
    }
}

impl Default for ServerResourcesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
