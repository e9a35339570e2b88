// ABOUTME: Record gateway tests run against both the in-memory and SQLite backends
// ABOUTME: Paging order, filters, not-found updates and deletes, latest weight lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use chrono::NaiveDate;
use healthlife_core::models::{BodyRecord, DietRecord, MealType};
use healthlife_core::pagination::PageQuery;
use healthlife_server::errors::ErrorCode;
use healthlife_server::gateway::{HealthDataGateway, SqliteHealthStore};

use common::init_test_logging;

async fn backends() -> Vec<(&'static str, HealthDataGateway)> {
    init_test_logging();
    let store = SqliteHealthStore::connect("sqlite::memory:").await.expect("sqlite");
    vec![
        ("memory", HealthDataGateway::in_memory()),
        ("sqlite", HealthDataGateway::sqlite(&store)),
    ]
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

fn body(user: &str, weight: f64, day: u32) -> BodyRecord {
    BodyRecord {
        id: 0,
        user_id: user.to_owned(),
        height_cm: 175.0,
        weight_kg: weight,
        record_date: date(day),
    }
}

fn meal(food: &str, meal_type: MealType, day: u32) -> DietRecord {
    DietRecord {
        id: 0,
        user_id: "1".to_owned(),
        record_date: date(day),
        food_name: food.to_owned(),
        meal_type,
        estimated_calories: 300,
    }
}

#[tokio::test]
async fn test_insert_assigns_ids_and_get_round_trips() {
    for (name, gateway) in backends().await {
        let first = gateway.body.insert(body("1", 70.0, 1)).await.unwrap();
        let second = gateway.body.insert(body("1", 71.0, 2)).await.unwrap();
        assert_eq!(first.id, 1, "{name}");
        assert_eq!(second.id, 2, "{name}");

        let fetched = gateway.body.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(fetched, second, "{name}");
        assert!(gateway.body.get_by_id(99).await.unwrap().is_none(), "{name}");
    }
}

#[tokio::test]
async fn test_page_orders_newest_first_and_counts_total() {
    for (name, gateway) in backends().await {
        for day in [3, 1, 5, 2, 4] {
            gateway.body.insert(body("1", 70.0, day)).await.unwrap();
        }
        gateway.body.insert(body("2", 60.0, 9)).await.unwrap();

        let page = gateway
            .body
            .page(&PageQuery::for_user("1", 2, 2))
            .await
            .unwrap();

        assert_eq!(page.total, 5, "{name}");
        let days: Vec<_> = page.rows.iter().map(|r| r.record_date).collect();
        assert_eq!(days, vec![date(3), date(2)], "{name}");
    }
}

#[tokio::test]
async fn test_same_day_rows_tie_break_on_id() {
    for (name, gateway) in backends().await {
        gateway.body.insert(body("1", 70.0, 1)).await.unwrap();
        gateway.body.insert(body("1", 72.0, 1)).await.unwrap();

        let page = gateway.body.page(&PageQuery::for_user("1", 1, 10)).await.unwrap();

        assert!((page.rows[0].weight_kg - 72.0).abs() < f64::EPSILON, "{name}");
    }
}

#[tokio::test]
async fn test_range_and_type_filters() {
    for (name, gateway) in backends().await {
        gateway.diet.insert(meal("粥", MealType::Breakfast, 1)).await.unwrap();
        gateway.diet.insert(meal("面", MealType::Lunch, 2)).await.unwrap();
        gateway.diet.insert(meal("饭", MealType::Lunch, 5)).await.unwrap();

        let lunches_early = gateway
            .diet
            .page(
                &PageQuery::for_user("1", 1, 10)
                    .with_range(Some(date(1)), Some(date(3)))
                    .with_type_filter(Some("午餐".to_owned())),
            )
            .await
            .unwrap();

        assert_eq!(lunches_early.total, 1, "{name}");
        assert_eq!(lunches_early.rows[0].food_name, "面", "{name}");
        assert_eq!(lunches_early.rows[0].meal_type, MealType::Lunch, "{name}");
    }
}

#[tokio::test]
async fn test_update_and_delete_missing_rows_are_not_found() {
    for (name, gateway) in backends().await {
        let mut ghost = body("1", 70.0, 1);
        ghost.id = 42;

        let update = gateway.body.update(&ghost).await.unwrap_err();
        assert_eq!(update.code, ErrorCode::ResourceNotFound, "{name}");

        let delete = gateway.body.delete(42).await.unwrap_err();
        assert_eq!(delete.code, ErrorCode::ResourceNotFound, "{name}");
    }
}

#[tokio::test]
async fn test_update_replaces_fields() {
    for (name, gateway) in backends().await {
        let mut saved = gateway.body.insert(body("1", 70.0, 1)).await.unwrap();
        saved.weight_kg = 68.5;
        gateway.body.update(&saved).await.unwrap();

        let fetched = gateway.body.get_by_id(saved.id).await.unwrap().unwrap();
        assert!((fetched.weight_kg - 68.5).abs() < f64::EPSILON, "{name}");
    }
}

#[tokio::test]
async fn test_latest_weight_uses_newest_record() {
    for (name, gateway) in backends().await {
        assert_eq!(gateway.latest_weight("1").await, None, "{name}");

        gateway.body.insert(body("1", 80.0, 10)).await.unwrap();
        gateway.body.insert(body("1", 75.0, 3)).await.unwrap();

        assert_eq!(gateway.latest_weight("1").await, Some(80.0), "{name}");
        assert_eq!(gateway.latest_weight("2").await, None, "{name}");
    }
}
