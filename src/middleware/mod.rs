// ABOUTME: HTTP middleware layers applied around every route
// ABOUTME: Currently cross-origin resource sharing for browser clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// CORS configuration
pub mod cors;

pub use cors::setup_cors;
