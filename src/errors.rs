// ABOUTME: Error types for the HealthLife server, re-exported from the core crate
// ABOUTME: AppError, ErrorCode, ToolError, and the JSON error response shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Unified Error Handling
//!
//! The error types are defined in `healthlife-core`; this module keeps
//! `crate::errors::*` paths stable inside the server crate.

pub use healthlife_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails, ToolError,
};
