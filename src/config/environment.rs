// ABOUTME: Environment-based server configuration for ports, secrets, cache, chat, and model access
// ABOUTME: Parses every variable once at startup and renders a secret-free summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use healthlife_core::constants::cache::DEFAULT_RESULT_TTL_SECS;
use healthlife_core::constants::chat::{DEFAULT_RETRIEVE_SIZE, DEFAULT_STREAM_TIMEOUT_SECS};
use healthlife_core::constants::ports::{DEFAULT_HOST, DEFAULT_HTTP_PORT};

use crate::llm::OpenAiCompatibleConfig;
use crate::tools::implementations::web_search::WebSearchConfig;

/// Where health records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local maps, lost on restart
    InMemory,
    /// `SQLite` database at the given URL
    Sqlite(String),
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// HS256 signing secret shared with the account service
    pub jwt_secret: String,
    /// Result cache TTL in seconds; non-positive values fall back to the default
    pub cache_ttl_secs: i64,
    /// Whole-stream timeout for chat responses
    pub stream_timeout: Duration,
    /// Remembered turns attached to each model request
    pub retrieve_size: usize,
    /// Model endpoint settings
    pub llm: OpenAiCompatibleConfig,
    /// Whether the web search tool talks to the network
    pub web_search_enabled: bool,
    /// Web search endpoints and timeouts
    pub web_search: WebSearchConfig,
    /// Record storage
    pub storage: StorageBackend,
    /// Comma-separated origins, or `*`
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when `JWT_SECRET` is missing or a variable does not parse
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let defaults = OpenAiCompatibleConfig::default();
        let api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("DASHSCOPE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let config = Self {
            http_port: env_parse("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            host: env_var_or("HOST", DEFAULT_HOST),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|secret| !secret.is_empty())
                .context("JWT_SECRET must be set")?,
            cache_ttl_secs: env_parse(
                "AI_FUNCTION_CACHE_TTL_SECS",
                i64::try_from(DEFAULT_RESULT_TTL_SECS).unwrap_or(i64::MAX),
            )?,
            stream_timeout: Duration::from_secs(env_parse(
                "CHAT_STREAM_TIMEOUT_SECS",
                DEFAULT_STREAM_TIMEOUT_SECS,
            )?),
            retrieve_size: env_parse("CHAT_RETRIEVE_SIZE", DEFAULT_RETRIEVE_SIZE)?,
            llm: OpenAiCompatibleConfig {
                base_url: env_var_or("LLM_BASE_URL", &defaults.base_url),
                api_key,
                default_model: env_var_or("LLM_MODEL", &defaults.default_model),
                connect_timeout: Duration::from_secs(env_parse(
                    "LLM_CONNECT_TIMEOUT_SECS",
                    defaults.connect_timeout.as_secs(),
                )?),
                capabilities: defaults.capabilities,
            },
            web_search_enabled: env_parse_bool("WEB_SEARCH_ENABLED", true)?,
            web_search: WebSearchConfig::default(),
            storage: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .map_or(StorageBackend::InMemory, StorageBackend::Sqlite),
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        info!("{}", config.summary());
        Ok(config)
    }

    /// Human-readable summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "HealthLife Server Configuration:\n\
             - Listen: {}:{}\n\
             - Storage: {}\n\
             - Result Cache TTL: {}s\n\
             - Chat Stream Timeout: {}s\n\
             - Memory Retrieve Size: {}\n\
             - Model: {} at {}\n\
             - Model API Key: {}\n\
             - Web Search: {}",
            self.host,
            self.http_port,
            match &self.storage {
                StorageBackend::InMemory => "in-memory",
                StorageBackend::Sqlite(_) => "SQLite",
            },
            self.cache_ttl_secs,
            self.stream_timeout.as_secs(),
            self.retrieve_size,
            self.llm.default_model,
            self.llm.base_url,
            if self.llm.api_key.is_some() { "configured" } else { "missing" },
            if self.web_search_enabled { "Enabled" } else { "Disabled" },
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value for {key}: {raw:?} ({e})")),
        _ => Ok(default),
    }
}

fn env_parse_bool(key: &str, default: bool) -> Result<bool> {
    match env::var(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        Ok(raw) if raw.is_empty() => Ok(default),
        Ok(raw) => match raw.as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("Invalid value for {key}: {raw:?} (expected true or false)")),
        },
        Err(_) => Ok(default),
    }
}
