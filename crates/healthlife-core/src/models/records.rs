// ABOUTME: The four health record kinds and the HealthRecord trait over them
// ABOUTME: Carries identity, ownership, and record date for generic gateway code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{ExerciseType, MealType};

/// Record kind, used for cache domains and user-facing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Height and weight
    Body,
    /// Food intake
    Diet,
    /// Workouts
    Exercise,
    /// Sleep sessions
    Sleep,
}

impl RecordKind {
    /// Cache domain root (`body`, `diet`, ...)
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Diet => "diet",
            Self::Exercise => "exercise",
            Self::Sleep => "sleep",
        }
    }

    /// Short label used in not-found and ownership messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Body => "身体",
            Self::Diet => "饮食",
            Self::Exercise => "运动",
            Self::Sleep => "睡眠",
        }
    }

    /// Noun used in query summaries (`共找到 N 条{noun}记录`)
    #[must_use]
    pub const fn query_noun(self) -> &'static str {
        match self {
            Self::Body => "身体数据",
            Self::Diet => "饮食",
            Self::Exercise => "运动",
            Self::Sleep => "睡眠",
        }
    }

    /// Storage table name
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Diet => "diet",
            Self::Exercise => "exercise",
            Self::Sleep => "sleep",
        }
    }
}

/// Common view over every record kind.
pub trait HealthRecord: Clone + Send + Sync + 'static {
    /// Which kind this is
    const KIND: RecordKind;

    /// Record identifier (0 before insertion)
    fn id(&self) -> i64;
    /// Assign the identifier after insertion
    fn set_id(&mut self, id: i64);
    /// Owning user
    fn user_id(&self) -> &str;
    /// Calendar date of the record
    fn record_date(&self) -> NaiveDate;
    /// Value matched by the optional type filter of a page query
    fn type_tag(&self) -> Option<&str> {
        None
    }
}

/// `yyyy-MM-dd HH:mm:ss` (de)serialization for sleep timestamps
pub mod date_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Wire format for date-times
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Serialize a date-time
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    /// Deserialize a date-time
    ///
    /// # Errors
    /// Fails when the text is not in `yyyy-MM-dd HH:mm:ss` form.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Body metrics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    /// Identifier
    #[serde(rename = "bodyMetricID")]
    pub id: i64,
    /// Owner
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Height in centimetres
    #[serde(rename = "heightCM")]
    pub height_cm: f64,
    /// Weight in kilograms
    #[serde(rename = "weightKG")]
    pub weight_kg: f64,
    /// Date of measurement
    #[serde(rename = "recordDate")]
    pub record_date: NaiveDate,
}

impl HealthRecord for BodyRecord {
    const KIND: RecordKind = RecordKind::Body;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn record_date(&self) -> NaiveDate {
        self.record_date
    }
}

/// Diet record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietRecord {
    /// Identifier
    #[serde(rename = "dietItemID")]
    pub id: i64,
    /// Owner
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Date eaten
    #[serde(rename = "recordDate")]
    pub record_date: NaiveDate,
    /// Food description
    #[serde(rename = "foodName")]
    pub food_name: String,
    /// Meal slot
    #[serde(rename = "mealType")]
    pub meal_type: MealType,
    /// Estimated energy intake
    #[serde(rename = "estimatedCalories")]
    pub estimated_calories: i32,
}

impl HealthRecord for DietRecord {
    const KIND: RecordKind = RecordKind::Diet;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn record_date(&self) -> NaiveDate {
        self.record_date
    }
    fn type_tag(&self) -> Option<&str> {
        Some(self.meal_type.as_str())
    }
}

/// Exercise record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Identifier
    #[serde(rename = "exerciseItemID")]
    pub id: i64,
    /// Owner
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Date of the workout
    #[serde(rename = "recordDate")]
    pub record_date: NaiveDate,
    /// Activity
    #[serde(rename = "exerciseType")]
    pub exercise_type: ExerciseType,
    /// Length of the workout in minutes (1-600)
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: i32,
    /// Energy burned, provided or estimated
    #[serde(rename = "estimatedCaloriesBurned")]
    pub estimated_calories_burned: i32,
}

impl HealthRecord for ExerciseRecord {
    const KIND: RecordKind = RecordKind::Exercise;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn record_date(&self) -> NaiveDate {
        self.record_date
    }
    fn type_tag(&self) -> Option<&str> {
        Some(self.exercise_type.as_str())
    }
}

/// Sleep record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Identifier
    #[serde(rename = "sleepItemID")]
    pub id: i64,
    /// Owner
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Night the session belongs to
    #[serde(rename = "recordDate")]
    pub record_date: NaiveDate,
    /// Time the user went to bed
    #[serde(rename = "bedTime", with = "date_time_format")]
    pub bed_time: NaiveDateTime,
    /// Time the user woke up
    #[serde(rename = "wakeTime", with = "date_time_format")]
    pub wake_time: NaiveDateTime,
}

impl SleepRecord {
    /// Sleep length in hours, from whole minutes
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        (self.wake_time - self.bed_time).num_minutes() as f64 / 60.0
    }
}

impl HealthRecord for SleepRecord {
    const KIND: RecordKind = RecordKind::Sleep;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn record_date(&self) -> NaiveDate {
        self.record_date
    }
}
