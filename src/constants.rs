// ABOUTME: Server-wide constants, re-exported from the core crate
// ABOUTME: Cache, chat, exercise, paging, endpoint, and port defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Constants Module
//!
//! Constants live in `healthlife-core` so both crates agree on them.

pub use healthlife_core::constants::*;
