// ABOUTME: Health data functions exposed to the chat model and their dispatch
// ABOUTME: Catalogue, typed requests, handlers, and the cache-aware execution context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Tools
//!
//! The model sees a closed catalogue of functions. Reads are memoized per user in
//! the result cache; writes evict the affected user's cached reads before they
//! return. Every outcome, including failures, is a human-readable string.

/// MET calorie estimate
pub mod calories;
/// Tool ids, descriptions, and parameter schemas
pub mod catalogue;
/// Dependencies shared by handlers
pub mod context;
/// Handlers per record kind
pub mod implementations;
/// Name-to-handler dispatch
pub mod registry;
/// Typed argument structs
pub mod requests;
/// JSON Schema builders
pub mod schema;
/// Shared parsing and formatting helpers
pub mod support;

pub use catalogue::{Operation, ToolId};
pub use context::ToolContext;
pub use registry::ToolRegistry;
