// ABOUTME: Route module organization for HealthLife HTTP endpoints
// ABOUTME: Chat streaming, conversation reset, and health checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! Route module for the HealthLife server
//!
//! Each domain module holds route definitions and thin handlers that delegate
//! to the chat pipeline and session registry in [`ServerResources`].

use std::sync::Arc;

use axum::Router;

use crate::resources::ServerResources;

/// Chat streaming and memory routes
pub mod chat;
/// Health check routes
pub mod health;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;

/// Every route the server exposes
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(ChatRoutes::routes(resources))
}
