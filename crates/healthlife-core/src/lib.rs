// ABOUTME: Core types and constants for the HealthLife assistant server
// ABOUTME: Foundation crate with error handling, record models, paging, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![deny(unsafe_code)]

//! # `HealthLife` Core
//!
//! Foundation crate providing shared types for the `HealthLife` assistant server.
//! It changes rarely, which keeps incremental builds of the server crate cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ToolError`
//! - **models**: Health record kinds (body, diet, exercise, sleep) and their enumerations
//! - **pagination**: Offset paging contract shared by every record gateway
//! - **constants**: Application-wide constants organized by domain

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Health record models and closed enumerations (meal type, exercise type)
pub mod models;

/// Offset pagination (`page`, `page_size`) with total counts
pub mod pagination;

/// Application constants organized by domain
pub mod constants;
