// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Unauthenticated liveness probe returning a fixed JSON body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use axum::{routing::get, Json, Router};

use crate::constants::endpoints::HEALTH_CHECK;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({ "status": "ok" }))
        }

        Router::new().route(HEALTH_CHECK, get(health_handler))
    }
}
