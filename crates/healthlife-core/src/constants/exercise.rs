// ABOUTME: Calorie estimation and record range constants
// ABOUTME: Bounds checked by the tool layer before any gateway call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// Body weight used when the user has no body record
pub const DEFAULT_WEIGHT_KG: f64 = 65.0;

/// Shortest accepted workout
pub const MIN_DURATION_MINUTES: i32 = 1;

/// Longest accepted workout
pub const MAX_DURATION_MINUTES: i32 = 600;

/// Accepted height range in centimetres
pub const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);

/// Accepted weight range in kilograms
pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 300.0);
