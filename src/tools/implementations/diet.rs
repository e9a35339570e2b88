// ABOUTME: Diet tools: query, add, detail, update, delete meal records
// ABOUTME: Meal slot must be one of the four known meals and calories must be positive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use healthlife_core::models::{DietRecord, MealType, RecordKind};

use super::records::{delete_record, owned_record, query_records, record_detail, settle, Lookup};
use crate::tools::catalogue::Operation;
use crate::tools::context::ToolContext;
use crate::tools::requests::{DeleteRequest, DetailRequest, DietRecordRequest, QueryRecordsRequest};
use crate::tools::support::{parse_date, ToolFailure};

const KIND: RecordKind = RecordKind::Diet;

fn meal_list() -> String {
    MealType::ALL.map(MealType::as_str).join("、")
}

/// Validated record, or a rejection message
fn to_record(request: &DietRecordRequest, id: i64) -> Result<Result<DietRecord, String>, ToolFailure> {
    let Some(meal_type) = MealType::from_name(request.meal_type.trim()) else {
        return Ok(Err(format!(
            "错误：不支持的餐次类型 '{}'。支持的餐次类型有：{}",
            request.meal_type,
            meal_list()
        )));
    };
    if request.estimated_calories <= 0 {
        return Ok(Err("错误：卡路里必须大于 0".to_owned()));
    }
    Ok(Ok(DietRecord {
        id,
        user_id: request.user_id.clone(),
        record_date: parse_date("recordDate", &request.record_date)?,
        food_name: request.food_name.clone(),
        meal_type,
        estimated_calories: request.estimated_calories,
    }))
}

/// `queryDietRecords`
pub async fn query(ctx: &ToolContext, request: QueryRecordsRequest) -> String {
    query_records(ctx, ctx.gateway.diet.as_ref(), request).await
}

/// `addDietRecord`
pub async fn add(ctx: &ToolContext, request: DietRecordRequest) -> String {
    settle(KIND, Operation::Add, async move {
        let record = match to_record(&request, 0)? {
            Ok(record) => record,
            Err(rejection) => return Ok(rejection),
        };
        let saved = ctx.gateway.diet.insert(record).await?;
        ctx.evict_queries_and_details(KIND, &saved.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功添加饮食记录！记录 ID: {}，食物: {}，餐次: {}，卡路里: {} kcal",
            saved.id, saved.food_name, saved.meal_type, saved.estimated_calories
        ))
    })
    .await
}

/// `updateDietRecord`
pub async fn update(ctx: &ToolContext, id: i64, request: DietRecordRequest) -> String {
    settle(KIND, Operation::Update, async move {
        let record = match to_record(&request, id)? {
            Ok(record) => record,
            Err(rejection) => return Ok(rejection),
        };
        let gateway = ctx.gateway.diet.as_ref();
        if let Lookup::Rejected(rejection) = owned_record(gateway, id, &record.user_id).await? {
            return Ok(rejection);
        }
        gateway.update(&record).await?;
        ctx.evict_queries_and_details(KIND, &record.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功更新饮食记录 ID: {id}，食物: {}，餐次: {}，卡路里: {} kcal",
            record.food_name, record.meal_type, record.estimated_calories
        ))
    })
    .await
}

/// `getDietRecordDetail`
pub async fn detail(ctx: &ToolContext, request: DetailRequest) -> String {
    record_detail(ctx, ctx.gateway.diet.as_ref(), request, |diet: &DietRecord| {
        format!(
            "饮食记录详情 - ID: {}，日期: {}，餐次: {}，食物: {}，卡路里: {} kcal",
            diet.id, diet.record_date, diet.meal_type, diet.food_name, diet.estimated_calories
        )
    })
    .await
}

/// `deleteDietRecord`
pub async fn delete(ctx: &ToolContext, request: DeleteRequest) -> String {
    delete_record(ctx, ctx.gateway.diet.as_ref(), request.id, |existing: &DietRecord| {
        format!("成功删除饮食记录 ID: {}，原餐次: {}", existing.id, existing.meal_type)
    })
    .await
}
