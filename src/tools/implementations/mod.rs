// ABOUTME: Handlers behind each catalogue tool, grouped by record kind
// ABOUTME: Every handler returns a status string; nothing propagates to the model as an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// Body metric tools
pub mod body;
/// Diet tools
pub mod diet;
/// Exercise tools
pub mod exercise;
/// Flows shared across record kinds
pub mod records;
/// Sleep tools
pub mod sleep;
/// Web search tool
pub mod web_search;
