// ABOUTME: Result cache constants for TTL and cleanup intervals
// ABOUTME: Short-lived memoization of tool-call output within a conversation turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// Default result cache TTL, also used when a non-positive TTL is configured
pub const DEFAULT_RESULT_TTL_SECS: u64 = 10;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Key segment used when no user is known
pub const ANONYMOUS_USER: &str = "anonymous";

/// Key segment used for an absent part
pub const NULL_PART: &str = "null";

/// Separator between key segments
pub const KEY_SEPARATOR: char = ':';
