// ABOUTME: Typed argument structs for every catalogue tool, decoded from model JSON
// ABOUTME: Wire names match the parameter schemas; paging fields default to 1 and 10
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use serde::Deserialize;

use super::support::{default_page, default_page_size, optional_user_id, user_id};

/// Paged listing arguments shared by the four query tools
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRecordsRequest {
    /// Owner whose records are listed
    #[serde(rename = "userID", deserialize_with = "user_id")]
    pub user_id: String,
    /// Inclusive lower date bound
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    /// Inclusive upper date bound
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
    /// `mealType` for diet, `exerciseType` for exercise
    #[serde(default, alias = "mealType", alias = "exerciseType")]
    pub type_filter: Option<String>,
    /// Page number, from 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: u32,
}

/// Single record lookup; the user id is optional and checks ownership
#[derive(Debug, Clone, Deserialize)]
pub struct DetailRequest {
    /// Record id
    #[serde(
        alias = "bodyMetricID",
        alias = "dietItemID",
        alias = "exerciseItemID",
        alias = "sleepItemID"
    )]
    pub id: i64,
    /// Caller-asserted owner
    #[serde(rename = "userID", default, deserialize_with = "optional_user_id")]
    pub user_id: Option<String>,
}

/// Record removal
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    /// Record id
    #[serde(
        alias = "bodyMetricID",
        alias = "dietItemID",
        alias = "exerciseItemID",
        alias = "sleepItemID"
    )]
    pub id: i64,
}

/// `addBodyMetric` / `updateBodyMetric`
#[derive(Debug, Clone, Deserialize)]
pub struct BodyMetricRequest {
    /// Record id, update only
    #[serde(rename = "bodyMetricID", default)]
    pub id: Option<i64>,
    /// Owner
    #[serde(rename = "userID", deserialize_with = "user_id")]
    pub user_id: String,
    /// Height in centimetres
    #[serde(rename = "heightCM")]
    pub height_cm: f64,
    /// Weight in kilograms
    #[serde(rename = "weightKG")]
    pub weight_kg: f64,
    /// `yyyy-MM-dd`
    #[serde(rename = "recordDate")]
    pub record_date: String,
}

/// `addDietRecord` / `updateDietRecord`
#[derive(Debug, Clone, Deserialize)]
pub struct DietRecordRequest {
    /// Record id, update only
    #[serde(rename = "dietItemID", default)]
    pub id: Option<i64>,
    /// Owner
    #[serde(rename = "userID", deserialize_with = "user_id")]
    pub user_id: String,
    /// `yyyy-MM-dd`
    #[serde(rename = "recordDate")]
    pub record_date: String,
    /// Food description
    #[serde(rename = "foodName")]
    pub food_name: String,
    /// 早餐, 午餐, 晚餐 or 加餐
    #[serde(rename = "mealType")]
    pub meal_type: String,
    /// Energy intake, must be positive
    #[serde(rename = "estimatedCalories")]
    pub estimated_calories: i32,
}

/// `addExerciseRecord` / `updateExerciseRecord`
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseRecordRequest {
    /// Record id, update only
    #[serde(rename = "exerciseItemID", default)]
    pub id: Option<i64>,
    /// Owner
    #[serde(rename = "userID", deserialize_with = "user_id")]
    pub user_id: String,
    /// `yyyy-MM-dd`
    #[serde(rename = "recordDate")]
    pub record_date: String,
    /// One of the supported activity names
    #[serde(rename = "exerciseType")]
    pub exercise_type: String,
    /// 1-600 minutes
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: i32,
    /// Optional on add; required and positive on update
    #[serde(rename = "estimatedCaloriesBurned", default)]
    pub estimated_calories_burned: Option<i32>,
}

/// `addSleepRecord` / `updateSleepRecord`
#[derive(Debug, Clone, Deserialize)]
pub struct SleepRecordRequest {
    /// Record id, update only
    #[serde(rename = "sleepItemID", default)]
    pub id: Option<i64>,
    /// Owner
    #[serde(rename = "userID", deserialize_with = "user_id")]
    pub user_id: String,
    /// `yyyy-MM-dd`
    #[serde(rename = "recordDate")]
    pub record_date: String,
    /// `yyyy-MM-dd HH:mm:ss`
    #[serde(rename = "bedTime")]
    pub bed_time: String,
    /// `yyyy-MM-dd HH:mm:ss`
    #[serde(rename = "wakeTime")]
    pub wake_time: String,
}

/// `webSearch`
#[derive(Debug, Clone, Deserialize)]
pub struct WebSearchRequest {
    /// Search terms
    pub query: String,
    /// Result count, default 5, capped at 10
    #[serde(rename = "maxResults", default)]
    pub max_results: Option<u32>,
}
