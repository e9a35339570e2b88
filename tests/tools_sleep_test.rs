// ABOUTME: Integration tests for the sleep record tools
// ABOUTME: Bed/wake ordering, duration reporting and date-time parsing failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use serde_json::json;

use common::test_registry;

fn night(bed: &str, wake: &str) -> String {
    json!({"userID": "1", "recordDate": "2025-01-15", "bedTime": bed, "wakeTime": wake}).to_string()
}

#[tokio::test]
async fn test_add_reports_duration() {
    let registry = test_registry();

    let result = registry
        .dispatch(
            "addSleepRecord",
            &night("2025-01-14 23:30:00", "2025-01-15 07:00:00"),
        )
        .await;

    assert_eq!(result, "成功添加睡眠记录！记录 ID: 1，睡眠时长: 7.5 小时（建议 7-9 小时）");
}

#[tokio::test]
async fn test_bed_after_wake_is_rejected() {
    let registry = test_registry();

    let result = registry
        .dispatch(
            "addSleepRecord",
            &night("2025-01-15 08:00:00", "2025-01-15 07:00:00"),
        )
        .await;

    assert_eq!(result, "错误：入睡时间不能晚于起床时间");
}

#[tokio::test]
async fn test_malformed_time_is_add_failure() {
    let registry = test_registry();

    let result = registry
        .dispatch("addSleepRecord", &night("昨晚十一点", "2025-01-15 07:00:00"))
        .await;

    assert!(result.starts_with("添加睡眠记录失败: bedTime"), "{result}");
}

#[tokio::test]
async fn test_detail_and_update() {
    let registry = test_registry();
    registry
        .dispatch(
            "addSleepRecord",
            &night("2025-01-14 23:00:00", "2025-01-15 07:00:00"),
        )
        .await;

    let detail = registry
        .dispatch(
            "getSleepRecordDetail",
            &json!({"sleepItemID": 1, "userID": "1"}).to_string(),
        )
        .await;
    assert_eq!(
        detail,
        "睡眠记录详情 - ID: 1，日期: 2025-01-15，入睡: 2025-01-14 23:00:00，起床: 2025-01-15 07:00:00，时长: 8.0 小时"
    );

    let updated = registry
        .dispatch(
            "updateSleepRecord",
            &json!({
                "sleepItemID": 1,
                "userID": "1",
                "recordDate": "2025-01-15",
                "bedTime": "2025-01-15 00:30:00",
                "wakeTime": "2025-01-15 06:00:00"
            })
            .to_string(),
        )
        .await;
    assert_eq!(updated, "成功更新睡眠记录 ID: 1，新的睡眠时长: 5.5 小时");
}

#[tokio::test]
async fn test_delete_and_query() {
    let registry = test_registry();
    registry
        .dispatch(
            "addSleepRecord",
            &night("2025-01-14 23:00:00", "2025-01-15 07:00:00"),
        )
        .await;

    let deleted = registry
        .dispatch("deleteSleepRecord", &json!({"sleepItemID": 1}).to_string())
        .await;
    assert_eq!(deleted, "成功删除睡眠记录 ID: 1，原日期: 2025-01-15");

    let listing = registry
        .dispatch("querySleepRecords", &json!({"userID": "1"}).to_string())
        .await;
    assert_eq!(listing, "查询成功，共找到 0 条睡眠记录。数据: []");
}
