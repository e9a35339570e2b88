// ABOUTME: Shared dependencies handed to every tool invocation
// ABOUTME: Bundles the health data gateway, the result cache, and the web search client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::future::Future;
use std::sync::Arc;

use healthlife_core::models::RecordKind;
use tracing::debug;

use crate::cache::{CacheKey, ResultCache};
use crate::gateway::HealthDataGateway;

use super::implementations::web_search::WebSearchClient;

/// Dependencies for tool execution
#[derive(Clone)]
pub struct ToolContext {
    /// Record storage
    pub gateway: HealthDataGateway,
    /// Memoization of read tool output
    pub cache: Arc<dyn ResultCache>,
    /// Web search client, `None` when the tool is disabled
    pub web_search: Option<Arc<WebSearchClient>>,
}

impl ToolContext {
    /// Context without web search
    #[must_use]
    pub fn new(gateway: HealthDataGateway, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            gateway,
            cache,
            web_search: None,
        }
    }

    /// Attach a web search client
    #[must_use]
    pub fn with_web_search(mut self, client: Arc<WebSearchClient>) -> Self {
        self.web_search = Some(client);
        self
    }

    /// Serve `key` from the cache or compute and store it
    pub async fn cached<'a, F>(&'a self, key: &CacheKey, compute: F) -> String
    where
        F: Future<Output = String> + Send + 'a,
    {
        self.cache.get_or_compute(&key.to_string(), Box::pin(compute)).await
    }

    /// Drop cached query and detail results for `user_id` after a write.
    ///
    /// Detail reads made without a user id are cached under the anonymous
    /// prefix; those are dropped too since any record may have changed.
    pub fn evict_queries_and_details(&self, kind: RecordKind, user_id: &str) {
        let detail = format!("{}.detail", kind.domain());
        self.evict(&format!("{}.query", kind.domain()), Some(user_id));
        self.evict(&detail, Some(user_id));
        self.evict(&detail, None);
    }

    fn evict(&self, domain: &str, user_id: Option<&str>) {
        let prefix = CacheKey::user_prefix(domain, user_id);
        let removed = self.cache.evict_by_prefix(&prefix);
        debug!(prefix = %prefix, removed, "Evicted cached tool results");
    }
}
