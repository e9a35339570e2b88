// ABOUTME: Integration tests for the exercise record tools
// ABOUTME: Calorie estimation, validation, cache reuse and eviction after writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use healthlife_core::models::ExerciseRecord;
use healthlife_server::gateway::HealthDataGateway;
use healthlife_server::tools::ToolRegistry;
use serde_json::json;

use common::{context_with_gateway, test_registry, CountingGateway};

fn registry_with_counting_exercise() -> (ToolRegistry, Arc<CountingGateway<ExerciseRecord>>) {
    let counting = CountingGateway::<ExerciseRecord>::new();
    let gateway = HealthDataGateway {
        exercise: counting.clone(),
        ..HealthDataGateway::in_memory()
    };
    (ToolRegistry::new(context_with_gateway(gateway)), counting)
}

fn run_args(minutes: i32) -> String {
    json!({
        "userID": "1",
        "recordDate": "2025-01-15",
        "exerciseType": "跑步",
        "durationMinutes": minutes
    })
    .to_string()
}

#[tokio::test]
async fn test_add_without_body_record_uses_default_weight() {
    let registry = test_registry();

    let result = registry.dispatch("addExerciseRecord", &run_args(30)).await;

    assert!(result.starts_with("成功添加运动记录！记录 ID: 1"), "{result}");
    assert!(result.contains("运动: 跑步"));
    assert!(result.contains("消耗: 319 kcal"), "{result}");
    assert!(result.contains("使用默认体重 65.0 kg"));
    assert!(result.contains("⚠️ 提示：您还没有记录身体数据"));
}

#[tokio::test]
async fn test_add_uses_latest_recorded_weight() {
    let registry = test_registry();
    registry
        .dispatch(
            "addBodyMetric",
            &json!({"userID": "1", "heightCM": 175, "weightKG": 80, "recordDate": "2025-01-10"})
                .to_string(),
        )
        .await;

    let result = registry.dispatch("addExerciseRecord", &run_args(60)).await;

    // 9.8 MET x 80 kg x 1 h
    assert!(result.contains("消耗: 784 kcal"), "{result}");
    assert!(result.contains("基于体重 80.0 kg"));
    assert!(!result.contains("⚠️"));
}

#[tokio::test]
async fn test_provided_calories_are_kept() {
    let registry = test_registry();
    let args = json!({
        "userID": "1",
        "recordDate": "2025-01-15",
        "exerciseType": "瑜伽",
        "durationMinutes": 45,
        "estimatedCaloriesBurned": 150
    });

    let result = registry.dispatch("addExerciseRecord", &args.to_string()).await;

    assert!(result.contains("消耗: 150 kcal（用户提供）"), "{result}");
    assert!(!result.contains("⚠️"));
}

#[tokio::test]
async fn test_rejects_unknown_type_and_bad_duration() {
    let registry = test_registry();

    let unknown = json!({
        "userID": "1",
        "recordDate": "2025-01-15",
        "exerciseType": "冲浪",
        "durationMinutes": 30
    });
    let result = registry.dispatch("addExerciseRecord", &unknown.to_string()).await;
    assert!(result.starts_with("错误：不支持的运动类型 '冲浪'"), "{result}");
    assert!(result.contains("跑步、游泳"));

    let too_long = registry.dispatch("addExerciseRecord", &run_args(601)).await;
    assert_eq!(too_long, "错误：运动时长必须在 1-600 分钟之间");

    let zero = registry.dispatch("addExerciseRecord", &run_args(0)).await;
    assert_eq!(zero, "错误：运动时长必须在 1-600 分钟之间");
}

#[tokio::test]
async fn test_bad_date_is_reported_as_add_failure() {
    let registry = test_registry();
    let args = json!({
        "userID": "1",
        "recordDate": "15/01/2025",
        "exerciseType": "跑步",
        "durationMinutes": 30
    });

    let result = registry.dispatch("addExerciseRecord", &args.to_string()).await;

    assert!(result.starts_with("添加运动记录失败: "), "{result}");
}

#[tokio::test]
async fn test_repeated_query_is_served_from_cache() {
    let (registry, counting) = registry_with_counting_exercise();
    let query = json!({"userID": "1"}).to_string();

    let first = registry.dispatch("queryExerciseRecords", &query).await;
    let second = registry.dispatch("queryExerciseRecords", &query).await;

    assert_eq!(first, second);
    assert_eq!(first, "查询成功，共找到 0 条运动记录。数据: []");
    assert_eq!(counting.page_calls(), 1);
}

#[tokio::test]
async fn test_add_evicts_cached_queries_for_the_user() {
    let (registry, counting) = registry_with_counting_exercise();
    let query = json!({"userID": "1"}).to_string();

    let before = registry.dispatch("queryExerciseRecords", &query).await;
    assert!(before.contains("共找到 0 条"));

    registry.dispatch("addExerciseRecord", &run_args(30)).await;
    let after = registry.dispatch("queryExerciseRecords", &query).await;

    assert!(after.contains("共找到 1 条运动记录"), "{after}");
    assert_eq!(counting.page_calls(), 2);
}

#[tokio::test]
async fn test_writes_leave_other_users_cache_alone() {
    let (registry, counting) = registry_with_counting_exercise();
    let other = json!({"userID": "2"}).to_string();

    registry.dispatch("queryExerciseRecords", &other).await;
    registry.dispatch("addExerciseRecord", &run_args(30)).await;
    registry.dispatch("queryExerciseRecords", &other).await;

    assert_eq!(counting.page_calls(), 1);
}

#[tokio::test]
async fn test_type_filter_narrows_results() {
    let registry = test_registry();
    registry.dispatch("addExerciseRecord", &run_args(30)).await;
    registry
        .dispatch(
            "addExerciseRecord",
            &json!({
                "userID": "1",
                "recordDate": "2025-01-16",
                "exerciseType": "游泳",
                "durationMinutes": 40
            })
            .to_string(),
        )
        .await;

    let swims = registry
        .dispatch(
            "queryExerciseRecords",
            &json!({"userID": "1", "exerciseType": "游泳"}).to_string(),
        )
        .await;

    assert!(swims.contains("共找到 1 条运动记录"), "{swims}");
    assert!(swims.contains("游泳"));
    assert!(!swims.contains("跑步"));
}

#[tokio::test]
async fn test_update_requires_positive_calories_and_ownership() {
    let registry = test_registry();
    registry.dispatch("addExerciseRecord", &run_args(30)).await;

    let missing_calories = json!({
        "exerciseItemID": 1,
        "userID": "1",
        "recordDate": "2025-01-15",
        "exerciseType": "跑步",
        "durationMinutes": 40
    });
    let result = registry
        .dispatch("updateExerciseRecord", &missing_calories.to_string())
        .await;
    assert_eq!(result, "错误：消耗卡路里必须大于 0");

    let foreign = json!({
        "exerciseItemID": 1,
        "userID": "2",
        "recordDate": "2025-01-15",
        "exerciseType": "跑步",
        "durationMinutes": 40,
        "estimatedCaloriesBurned": 400
    });
    let result = registry.dispatch("updateExerciseRecord", &foreign.to_string()).await;
    assert_eq!(result, "错误：该运动记录不属于指定用户");

    let owned = json!({
        "exerciseItemID": 1,
        "userID": "1",
        "recordDate": "2025-01-15",
        "exerciseType": "跑步",
        "durationMinutes": 40,
        "estimatedCaloriesBurned": 400
    });
    let result = registry.dispatch("updateExerciseRecord", &owned.to_string()).await;
    assert_eq!(result, "成功更新运动记录 ID: 1，运动: 跑步，时长: 40 分钟，消耗: 400 kcal");
}

#[tokio::test]
async fn test_update_evicts_cached_detail() {
    let registry = test_registry();
    registry.dispatch("addExerciseRecord", &run_args(30)).await;
    let detail_args = json!({"exerciseItemID": 1, "userID": "1"}).to_string();

    let before = registry.dispatch("getExerciseRecordDetail", &detail_args).await;
    assert!(before.contains("时长: 30 分钟"), "{before}");

    registry
        .dispatch(
            "updateExerciseRecord",
            &json!({
                "exerciseItemID": 1,
                "userID": "1",
                "recordDate": "2025-01-15",
                "exerciseType": "跑步",
                "durationMinutes": 50,
                "estimatedCaloriesBurned": 500
            })
            .to_string(),
        )
        .await;
    let after = registry.dispatch("getExerciseRecordDetail", &detail_args).await;

    assert!(after.contains("时长: 50 分钟"), "{after}");
    assert!(after.contains("消耗: 500 kcal"));
}

#[tokio::test]
async fn test_add_evicts_cached_missing_detail() {
    let registry = test_registry();
    let detail_args = json!({"exerciseItemID": 1, "userID": "1"}).to_string();

    let before = registry.dispatch("getExerciseRecordDetail", &detail_args).await;
    assert_eq!(before, "未找到运动记录 ID: 1");

    let added = registry.dispatch("addExerciseRecord", &run_args(30)).await;
    assert!(added.contains("记录 ID: 1"), "{added}");
    let after = registry.dispatch("getExerciseRecordDetail", &detail_args).await;

    assert!(after.starts_with("运动记录详情 - ID: 1"), "{after}");
    assert!(after.contains("消耗: 319 kcal"));
}

#[tokio::test]
async fn test_writes_evict_detail_read_without_user() {
    let registry = test_registry();
    registry.dispatch("addExerciseRecord", &run_args(30)).await;
    let anonymous_detail = json!({"exerciseItemID": 1}).to_string();

    let before = registry.dispatch("getExerciseRecordDetail", &anonymous_detail).await;
    assert!(before.contains("时长: 30 分钟"), "{before}");

    registry
        .dispatch("deleteExerciseRecord", &json!({"exerciseItemID": 1}).to_string())
        .await;
    let after = registry.dispatch("getExerciseRecordDetail", &anonymous_detail).await;

    assert_eq!(after, "未找到运动记录 ID: 1");
}

#[tokio::test]
async fn test_delete_missing_and_existing() {
    let registry = test_registry();

    let missing = registry
        .dispatch("deleteExerciseRecord", &json!({"exerciseItemID": 9}).to_string())
        .await;
    assert_eq!(missing, "未找到运动记录 ID: 9");

    registry.dispatch("addExerciseRecord", &run_args(30)).await;
    let deleted = registry
        .dispatch("deleteExerciseRecord", &json!({"exerciseItemID": 1}).to_string())
        .await;
    assert_eq!(deleted, "成功删除运动记录 ID: 1，原运动类型: 跑步");

    let detail = registry
        .dispatch("getExerciseRecordDetail", &json!({"exerciseItemID": 1}).to_string())
        .await;
    assert_eq!(detail, "未找到运动记录 ID: 1");
}
