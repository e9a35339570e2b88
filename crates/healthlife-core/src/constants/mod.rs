// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Cache, chat, exercise, paging, and endpoint constants for the HealthLife server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! Constants grouped by domain.

/// Result cache TTL and cleanup constants
pub mod cache;
/// Chat pipeline constants (timeouts, framing, user-facing messages)
pub mod chat;
/// Calorie estimation constants
pub mod exercise;

/// Paging defaults for tool requests and gateway queries
pub mod paging {
    /// Default 1-based page number
    pub const DEFAULT_PAGE: u32 = 1;
    /// Default rows per page
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Upper bound on rows per page
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// HTTP endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Plain-text chat endpoint
    pub const CHAT: &str = "/chat";
    /// Streaming chat endpoint
    pub const CHAT_STREAM: &str = "/chat/stream";
    /// Conversation reset endpoint
    pub const CHAT_MEMORY: &str = "/chat/memory";
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}
