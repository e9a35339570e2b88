// ABOUTME: Exercise tools: query, add, detail, update, delete workout records
// ABOUTME: Adds fill in missing calories from MET values and the user's latest weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use healthlife_core::constants::exercise::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use healthlife_core::models::{ExerciseRecord, ExerciseType, RecordKind};
use tracing::debug;

use super::records::{delete_record, owned_record, query_records, record_detail, settle, Lookup};
use crate::tools::calories::{estimate_calories, WeightSource};
use crate::tools::catalogue::Operation;
use crate::tools::context::ToolContext;
use crate::tools::requests::{
    DeleteRequest, DetailRequest, ExerciseRecordRequest, QueryRecordsRequest,
};
use crate::tools::support::{parse_date, ToolFailure};

const KIND: RecordKind = RecordKind::Exercise;

const DEFAULT_WEIGHT_NUDGE: &str = "\n\n⚠️ 提示：您还没有记录身体数据，热量计算使用了默认体重 65 kg。建议先记录您的身高体重数据，以获得更准确的热量消耗计算。";

/// Type and duration checks shared by add and update
fn validate(request: &ExerciseRecordRequest) -> Result<ExerciseType, String> {
    let Some(exercise_type) = ExerciseType::from_name(request.exercise_type.trim()) else {
        return Err(format!(
            "错误：不支持的运动类型 '{}'。支持的运动类型有：{}",
            request.exercise_type,
            ExerciseType::supported_list()
        ));
    };
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&request.duration_minutes) {
        return Err(format!(
            "错误：运动时长必须在 {MIN_DURATION_MINUTES}-{MAX_DURATION_MINUTES} 分钟之间"
        ));
    }
    Ok(exercise_type)
}

/// `queryExerciseRecords`
pub async fn query(ctx: &ToolContext, request: QueryRecordsRequest) -> String {
    query_records(ctx, ctx.gateway.exercise.as_ref(), request).await
}

/// `addExerciseRecord`
pub async fn add(ctx: &ToolContext, request: ExerciseRecordRequest) -> String {
    settle(KIND, Operation::Add, async move {
        let exercise_type = match validate(&request) {
            Ok(exercise_type) => exercise_type,
            Err(rejection) => return Ok(rejection),
        };
        let record_date = parse_date("recordDate", &request.record_date)?;

        let weight = WeightSource::from_latest(ctx.gateway.latest_weight(&request.user_id).await);
        let (calories, source) = match request.estimated_calories_burned.filter(|kcal| *kcal > 0) {
            Some(provided) => (provided, "用户提供".to_owned()),
            None => (
                estimate_calories(exercise_type, request.duration_minutes, weight.kilograms()),
                weight.disclosure(),
            ),
        };
        debug!(user_id = %request.user_id, calories, source = %source, "Resolved exercise calories");

        let saved = ctx
            .gateway
            .exercise
            .insert(ExerciseRecord {
                id: 0,
                user_id: request.user_id.clone(),
                record_date,
                exercise_type,
                duration_minutes: request.duration_minutes,
                estimated_calories_burned: calories,
            })
            .await?;
        ctx.evict_queries_and_details(KIND, &saved.user_id);

        let mut confirmation = format!(
            "成功添加运动记录！记录 ID: {}，运动: {}，时长: {} 分钟，消耗: {} kcal（{source}）",
            saved.id, saved.exercise_type, saved.duration_minutes, calories
        );
        if weight.is_default() {
            confirmation.push_str(DEFAULT_WEIGHT_NUDGE);
        }
        Ok::<_, ToolFailure>(confirmation)
    })
    .await
}

/// `updateExerciseRecord`
pub async fn update(ctx: &ToolContext, id: i64, request: ExerciseRecordRequest) -> String {
    settle(KIND, Operation::Update, async move {
        let exercise_type = match validate(&request) {
            Ok(exercise_type) => exercise_type,
            Err(rejection) => return Ok(rejection),
        };
        let Some(calories) = request.estimated_calories_burned.filter(|kcal| *kcal > 0) else {
            return Ok("错误：消耗卡路里必须大于 0".to_owned());
        };
        let record = ExerciseRecord {
            id,
            user_id: request.user_id.clone(),
            record_date: parse_date("recordDate", &request.record_date)?,
            exercise_type,
            duration_minutes: request.duration_minutes,
            estimated_calories_burned: calories,
        };

        let gateway = ctx.gateway.exercise.as_ref();
        if let Lookup::Rejected(rejection) = owned_record(gateway, id, &record.user_id).await? {
            return Ok(rejection);
        }
        gateway.update(&record).await?;
        ctx.evict_queries_and_details(KIND, &record.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功更新运动记录 ID: {id}，运动: {}，时长: {} 分钟，消耗: {calories} kcal",
            record.exercise_type, record.duration_minutes
        ))
    })
    .await
}

/// `getExerciseRecordDetail`
pub async fn detail(ctx: &ToolContext, request: DetailRequest) -> String {
    record_detail(ctx, ctx.gateway.exercise.as_ref(), request, |exercise: &ExerciseRecord| {
        format!(
            "运动记录详情 - ID: {}，日期: {}，运动: {}，时长: {} 分钟，消耗: {} kcal",
            exercise.id,
            exercise.record_date,
            exercise.exercise_type,
            exercise.duration_minutes,
            exercise.estimated_calories_burned
        )
    })
    .await
}

/// `deleteExerciseRecord`
pub async fn delete(ctx: &ToolContext, request: DeleteRequest) -> String {
    delete_record(ctx, ctx.gateway.exercise.as_ref(), request.id, |existing: &ExerciseRecord| {
        format!(
            "成功删除运动记录 ID: {}，原运动类型: {}",
            existing.id, existing.exercise_type
        )
    })
    .await
}
