// ABOUTME: Closed catalogue of the functions the model may call, with names and schemas
// ABOUTME: Each ToolId binds one model-visible name to a description and parameter schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Tool Catalogue
//!
//! Twenty record tools (query, add, update, detail, delete for each of the four
//! record kinds) plus `webSearch`. Names and field names are what the model sees.

use std::fmt;

use serde_json::Value;

use healthlife_core::models::{ExerciseType, MealType, RecordKind};

use super::schema::{enumeration, integer, number, string, ParameterSchema};

/// Operation a record tool performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Paged listing
    Query,
    /// Create
    Add,
    /// Overwrite
    Update,
    /// Single record lookup
    Detail,
    /// Remove
    Delete,
}

/// Every tool the model may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// `queryBodyMetrics`
    QueryBodyMetrics,
    /// `addBodyMetric`
    AddBodyMetric,
    /// `getBodyMetricDetail`
    GetBodyMetricDetail,
    /// `updateBodyMetric`
    UpdateBodyMetric,
    /// `deleteBodyMetric`
    DeleteBodyMetric,
    /// `queryDietRecords`
    QueryDietRecords,
    /// `addDietRecord`
    AddDietRecord,
    /// `updateDietRecord`
    UpdateDietRecord,
    /// `getDietRecordDetail`
    GetDietRecordDetail,
    /// `deleteDietRecord`
    DeleteDietRecord,
    /// `queryExerciseRecords`
    QueryExerciseRecords,
    /// `addExerciseRecord`
    AddExerciseRecord,
    /// `updateExerciseRecord`
    UpdateExerciseRecord,
    /// `getExerciseRecordDetail`
    GetExerciseRecordDetail,
    /// `deleteExerciseRecord`
    DeleteExerciseRecord,
    /// `querySleepRecords`
    QuerySleepRecords,
    /// `addSleepRecord`
    AddSleepRecord,
    /// `updateSleepRecord`
    UpdateSleepRecord,
    /// `getSleepRecordDetail`
    GetSleepRecordDetail,
    /// `deleteSleepRecord`
    DeleteSleepRecord,
    /// `webSearch`
    WebSearch,
}

const USER_ID: &str = "用户 ID";
const START_DATE: &str = "开始日期 (格式: yyyy-MM-dd)";
const END_DATE: &str = "结束日期 (格式: yyyy-MM-dd)";
const RECORD_DATE: &str = "记录日期 (格式: yyyy-MM-dd)";
const PAGE: &str = "页码，默认 1";
const PAGE_SIZE: &str = "每页大小，默认 10";
const HEIGHT: &str = "身高（厘米），范围 100-250";
const WEIGHT: &str = "体重（千克），范围 30-300";
const MEAL_TYPE: &str = "餐次类型（早餐、午餐、晚餐、加餐）";
const DIET_CALORIES: &str = "预估卡路里（必须大于 0）";
const EXERCISE_TYPE_HINT: &str = "运动类型（如：跑步、游泳、骑行等）";
const DURATION: &str = "运动时长（分钟），范围 1-600";
const BED_TIME: &str = "入睡时间 (格式: yyyy-MM-dd HH:mm:ss)";
const WAKE_TIME: &str = "起床时间 (格式: yyyy-MM-dd HH:mm:ss)";

impl ToolId {
    /// All tools in catalogue order
    pub const ALL: [Self; 21] = [
        Self::QueryBodyMetrics,
        Self::AddBodyMetric,
        Self::GetBodyMetricDetail,
        Self::UpdateBodyMetric,
        Self::DeleteBodyMetric,
        Self::QuerySleepRecords,
        Self::AddSleepRecord,
        Self::UpdateSleepRecord,
        Self::GetSleepRecordDetail,
        Self::DeleteSleepRecord,
        Self::QueryDietRecords,
        Self::AddDietRecord,
        Self::UpdateDietRecord,
        Self::GetDietRecordDetail,
        Self::DeleteDietRecord,
        Self::QueryExerciseRecords,
        Self::AddExerciseRecord,
        Self::UpdateExerciseRecord,
        Self::GetExerciseRecordDetail,
        Self::DeleteExerciseRecord,
        Self::WebSearch,
    ];

    /// Model-visible function name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QueryBodyMetrics => "queryBodyMetrics",
            Self::AddBodyMetric => "addBodyMetric",
            Self::GetBodyMetricDetail => "getBodyMetricDetail",
            Self::UpdateBodyMetric => "updateBodyMetric",
            Self::DeleteBodyMetric => "deleteBodyMetric",
            Self::QueryDietRecords => "queryDietRecords",
            Self::AddDietRecord => "addDietRecord",
            Self::UpdateDietRecord => "updateDietRecord",
            Self::GetDietRecordDetail => "getDietRecordDetail",
            Self::DeleteDietRecord => "deleteDietRecord",
            Self::QueryExerciseRecords => "queryExerciseRecords",
            Self::AddExerciseRecord => "addExerciseRecord",
            Self::UpdateExerciseRecord => "updateExerciseRecord",
            Self::GetExerciseRecordDetail => "getExerciseRecordDetail",
            Self::DeleteExerciseRecord => "deleteExerciseRecord",
            Self::QuerySleepRecords => "querySleepRecords",
            Self::AddSleepRecord => "addSleepRecord",
            Self::UpdateSleepRecord => "updateSleepRecord",
            Self::GetSleepRecordDetail => "getSleepRecordDetail",
            Self::DeleteSleepRecord => "deleteSleepRecord",
            Self::WebSearch => "webSearch",
        }
    }

    /// Look up a tool by its model-visible name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Record kind and operation, `None` for web search
    #[must_use]
    pub const fn target(self) -> Option<(RecordKind, Operation)> {
        use Operation::{Add, Delete, Detail, Query, Update};
        use RecordKind::{Body, Diet, Exercise, Sleep};

        Some(match self {
            Self::QueryBodyMetrics => (Body, Query),
            Self::AddBodyMetric => (Body, Add),
            Self::GetBodyMetricDetail => (Body, Detail),
            Self::UpdateBodyMetric => (Body, Update),
            Self::DeleteBodyMetric => (Body, Delete),
            Self::QueryDietRecords => (Diet, Query),
            Self::AddDietRecord => (Diet, Add),
            Self::UpdateDietRecord => (Diet, Update),
            Self::GetDietRecordDetail => (Diet, Detail),
            Self::DeleteDietRecord => (Diet, Delete),
            Self::QueryExerciseRecords => (Exercise, Query),
            Self::AddExerciseRecord => (Exercise, Add),
            Self::UpdateExerciseRecord => (Exercise, Update),
            Self::GetExerciseRecordDetail => (Exercise, Detail),
            Self::DeleteExerciseRecord => (Exercise, Delete),
            Self::QuerySleepRecords => (Sleep, Query),
            Self::AddSleepRecord => (Sleep, Add),
            Self::UpdateSleepRecord => (Sleep, Update),
            Self::GetSleepRecordDetail => (Sleep, Detail),
            Self::DeleteSleepRecord => (Sleep, Delete),
            Self::WebSearch => return None,
        })
    }

    /// Description shown to the model
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::QueryBodyMetrics => "查询用户的身体数据（身高、体重）记录",
            Self::AddBodyMetric => "添加用户的身体数据记录（身高、体重）",
            Self::GetBodyMetricDetail => "根据记录 ID 查询单条身体数据详情",
            Self::UpdateBodyMetric => "更新用户的身体数据记录",
            Self::DeleteBodyMetric => "删除指定的身体数据记录",
            Self::QueryDietRecords => "查询用户的饮食记录",
            Self::AddDietRecord => "添加用户的饮食记录",
            Self::UpdateDietRecord => "更新用户的饮食记录",
            Self::GetDietRecordDetail => "根据记录 ID 查询饮食记录详情",
            Self::DeleteDietRecord => "删除指定的饮食记录",
            Self::QueryExerciseRecords => "查询用户的运动记录",
            Self::AddExerciseRecord => {
                "添加用户的运动记录。如果不提供消耗热量，系统将使用 MET 公式自动计算"
            }
            Self::UpdateExerciseRecord => "更新用户的运动记录，运动类型必须是系统支持的类型之一",
            Self::GetExerciseRecordDetail => "根据记录 ID 查询运动记录详情",
            Self::DeleteExerciseRecord => "删除指定的运动记录",
            Self::QuerySleepRecords => "查询用户的睡眠记录",
            Self::AddSleepRecord => "添加用户的睡眠记录",
            Self::UpdateSleepRecord => "更新用户的睡眠记录",
            Self::GetSleepRecordDetail => "根据记录 ID 查询睡眠记录详情",
            Self::DeleteSleepRecord => "删除指定的睡眠记录",
            Self::WebSearch => {
                "在互联网上搜索信息，获取最新的健康、营养、运动等相关知识。当用户询问需要最新信息或实时数据的问题时使用此功能。"
            }
        }
    }

    /// JSON Schema of the arguments object
    #[must_use]
    pub fn parameters(self) -> Value {
        let Some((kind, operation)) = self.target() else {
            return ParameterSchema::new()
                .required("query", string("搜索关键词或问题"))
                .optional("maxResults", integer("最大搜索结果数量，默认 5，最大 10"))
                .build();
        };

        let (id_field, id_description) = id_field(kind);
        match operation {
            Operation::Query => {
                let schema = ParameterSchema::new()
                    .required("userID", string(USER_ID))
                    .optional("startDate", string(START_DATE))
                    .optional("endDate", string(END_DATE));
                let schema = match kind {
                    RecordKind::Diet => schema.optional("mealType", string(MEAL_TYPE)),
                    RecordKind::Exercise => {
                        schema.optional("exerciseType", string(EXERCISE_TYPE_HINT))
                    }
                    RecordKind::Body | RecordKind::Sleep => schema,
                };
                schema
                    .optional("page", integer(PAGE))
                    .optional("pageSize", integer(PAGE_SIZE))
                    .build()
            }
            Operation::Detail => {
                let user_description = if kind == RecordKind::Body {
                    "用户 ID，可选，用于校验记录归属"
                } else {
                    "用户 ID，可选"
                };
                ParameterSchema::new()
                    .required(id_field, integer(id_description))
                    .optional("userID", string(user_description))
                    .build()
            }
            Operation::Delete => ParameterSchema::new()
                .required(id_field, integer(id_description))
                .build(),
            Operation::Add | Operation::Update => {
                let schema = if operation == Operation::Update {
                    ParameterSchema::new().required(id_field, integer(id_description))
                } else {
                    ParameterSchema::new()
                };
                record_fields(schema.required("userID", string(USER_ID)), kind, operation).build()
            }
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire name and description of a kind's id field
#[must_use]
pub const fn id_field(kind: RecordKind) -> (&'static str, &'static str) {
    match kind {
        RecordKind::Body => ("bodyMetricID", "身体记录 ID"),
        RecordKind::Diet => ("dietItemID", "饮食记录 ID"),
        RecordKind::Exercise => ("exerciseItemID", "运动记录 ID"),
        RecordKind::Sleep => ("sleepItemID", "睡眠记录 ID"),
    }
}

fn record_fields(schema: ParameterSchema, kind: RecordKind, operation: Operation) -> ParameterSchema {
    match kind {
        RecordKind::Body => schema
            .required("heightCM", number(HEIGHT))
            .required("weightKG", number(WEIGHT))
            .required("recordDate", string(RECORD_DATE)),
        RecordKind::Diet => {
            let meals: Vec<&str> = MealType::ALL.into_iter().map(MealType::as_str).collect();
            schema
                .required("recordDate", string(RECORD_DATE))
                .required("foodName", string("食物名称"))
                .required("mealType", enumeration(MEAL_TYPE, &meals))
                .required("estimatedCalories", integer(DIET_CALORIES))
        }
        RecordKind::Exercise => {
            let types: Vec<&str> = ExerciseType::ALL.into_iter().map(ExerciseType::as_str).collect();
            let type_description = if operation == Operation::Add {
                format!("运动类型，必须是以下之一：{}", ExerciseType::supported_list())
            } else {
                EXERCISE_TYPE_HINT.to_owned()
            };
            let schema = schema
                .required("recordDate", string(RECORD_DATE))
                .required("exerciseType", enumeration(&type_description, &types))
                .required("durationMinutes", integer(DURATION));
            if operation == Operation::Add {
                schema.optional(
                    "estimatedCaloriesBurned",
                    integer("预估消耗卡路里（可选，如不提供将根据 MET 公式自动计算）"),
                )
            } else {
                schema.required("estimatedCaloriesBurned", integer("预估消耗卡路里（必须大于 0）"))
            }
        }
        RecordKind::Sleep => schema
            .required("recordDate", string(RECORD_DATE))
            .required("bedTime", string(BED_TIME))
            .required("wakeTime", string(WAKE_TIME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_and_are_unique() {
        for tool in ToolId::ALL {
            assert_eq!(ToolId::from_name(tool.name()), Some(tool));
        }
        let mut names: Vec<&str> = ToolId::ALL.into_iter().map(ToolId::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 21);
        assert_eq!(ToolId::from_name("dropTables"), None);
    }

    #[test]
    fn test_exercise_add_makes_calories_optional() {
        let add = ToolId::AddExerciseRecord.parameters();
        let required: Vec<&str> = add["required"]
            .as_array()
            .map(|v| v.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        assert!(required.contains(&"durationMinutes"));
        assert!(!required.contains(&"estimatedCaloriesBurned"));

        let update = ToolId::UpdateExerciseRecord.parameters();
        assert!(update["required"]
            .as_array()
            .is_some_and(|v| v.iter().any(|f| f == "estimatedCaloriesBurned")));
    }
}
