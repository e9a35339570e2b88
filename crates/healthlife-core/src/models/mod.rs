// ABOUTME: Health record models shared by the gateway, tools, and storage layers
// ABOUTME: Body, diet, exercise, and sleep records plus their closed enumerations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! Record models.
//!
//! Field names serialize in the camelCase the model sees in tool schemas
//! (`userID`, `recordDate`, ...), so a rendered row reads the same as the
//! arguments the model sends back.

mod exercise;
mod meal;
mod records;

pub use exercise::ExerciseType;
pub use meal::MealType;
pub use records::{
    date_time_format, BodyRecord, DietRecord, ExerciseRecord, HealthRecord, RecordKind,
    SleepRecord,
};
