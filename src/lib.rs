// ABOUTME: Main library entry point for the HealthLife assistant server
// ABOUTME: Conversational orchestration over personal health records with streamed answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![deny(unsafe_code)]

//! # HealthLife Server
//!
//! A chat assistant that answers health questions over a user's own records.
//! The model is given a closed catalogue of functions over body metrics, diet,
//! exercise, and sleep records (plus web search); answers stream back to the
//! client as server-sent events.
//!
//! ## Architecture
//!
//! - **Gateway**: record storage per kind, in memory or `SQLite`
//! - **Cache**: short-lived memoization of read tools, evicted by writes
//! - **Tools**: typed handlers that always answer with a status string
//! - **Chat**: model runtime with the function-calling loop and the SSE pipeline
//! - **Sessions**: per-user conversation memory
//! - **Routes**: axum handlers behind JWT authentication
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use healthlife_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("HealthLife server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT authentication
pub mod auth;

/// Result cache for read tools
pub mod cache;

/// Model runtime and streaming pipeline
pub mod chat;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Error types
pub mod errors;

/// Health record storage
pub mod gateway;

/// Chat model providers
pub mod llm;

/// Logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Server assembly and lifecycle
pub mod server;

/// Conversation memory
pub mod sessions;

/// Function catalogue exposed to the model
pub mod tools;
