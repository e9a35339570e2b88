// ABOUTME: Body metric tools: query, add, detail, update, delete height and weight records
// ABOUTME: Confirmations report BMI; heights and weights are range checked before writing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use healthlife_core::constants::exercise::{HEIGHT_RANGE_CM, WEIGHT_RANGE_KG};
use healthlife_core::models::{BodyRecord, RecordKind};

use super::records::{
    delete_record, owned_record, query_records, record_detail, settle, Lookup,
};
use crate::tools::catalogue::Operation;
use crate::tools::context::ToolContext;
use crate::tools::requests::{BodyMetricRequest, DeleteRequest, DetailRequest, QueryRecordsRequest};
use crate::tools::support::{bmi, parse_date, ToolFailure};

const KIND: RecordKind = RecordKind::Body;

fn validate(request: &BodyMetricRequest) -> Option<String> {
    let (min_height, max_height) = HEIGHT_RANGE_CM;
    let (min_weight, max_weight) = WEIGHT_RANGE_KG;
    if !(min_height..=max_height).contains(&request.height_cm) {
        return Some(format!("错误：身高必须在 {min_height}-{max_height} 厘米之间"));
    }
    if !(min_weight..=max_weight).contains(&request.weight_kg) {
        return Some(format!("错误：体重必须在 {min_weight}-{max_weight} 千克之间"));
    }
    None
}

fn to_record(request: &BodyMetricRequest, id: i64) -> Result<BodyRecord, ToolFailure> {
    Ok(BodyRecord {
        id,
        user_id: request.user_id.clone(),
        height_cm: request.height_cm,
        weight_kg: request.weight_kg,
        record_date: parse_date("recordDate", &request.record_date)?,
    })
}

/// `queryBodyMetrics`
pub async fn query(ctx: &ToolContext, request: QueryRecordsRequest) -> String {
    query_records(ctx, ctx.gateway.body.as_ref(), request).await
}

/// `addBodyMetric`
pub async fn add(ctx: &ToolContext, request: BodyMetricRequest) -> String {
    settle(KIND, Operation::Add, async move {
        if let Some(rejection) = validate(&request) {
            return Ok(rejection);
        }
        let saved = ctx.gateway.body.insert(to_record(&request, 0)?).await?;
        ctx.evict_queries_and_details(KIND, &saved.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功添加身体数据！记录 ID: {}，BMI: {:.2}（正常范围 18.5-23.9）",
            saved.id,
            bmi(saved.height_cm, saved.weight_kg)
        ))
    })
    .await
}

/// `getBodyMetricDetail`
pub async fn detail(ctx: &ToolContext, request: DetailRequest) -> String {
    record_detail(ctx, ctx.gateway.body.as_ref(), request, |body: &BodyRecord| {
        format!(
            "身体记录详情 - ID: {}，日期: {}，身高: {:.2} cm，体重: {:.2} kg，BMI: {:.2}",
            body.id,
            body.record_date,
            body.height_cm,
            body.weight_kg,
            bmi(body.height_cm, body.weight_kg)
        )
    })
    .await
}

/// `updateBodyMetric`
pub async fn update(ctx: &ToolContext, id: i64, request: BodyMetricRequest) -> String {
    settle(KIND, Operation::Update, async move {
        if let Some(rejection) = validate(&request) {
            return Ok(rejection);
        }
        let gateway = ctx.gateway.body.as_ref();
        if let Lookup::Rejected(rejection) = owned_record(gateway, id, &request.user_id).await? {
            return Ok(rejection);
        }
        let record = to_record(&request, id)?;
        gateway.update(&record).await?;
        ctx.evict_queries_and_details(KIND, &record.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功更新身体记录 ID: {id}，新的 BMI: {:.2}",
            bmi(record.height_cm, record.weight_kg)
        ))
    })
    .await
}

/// `deleteBodyMetric`
pub async fn delete(ctx: &ToolContext, request: DeleteRequest) -> String {
    delete_record(ctx, ctx.gateway.body.as_ref(), request.id, |existing: &BodyRecord| {
        format!(
            "成功删除身体记录 ID: {}，原记录日期: {}",
            existing.id, existing.record_date
        )
    })
    .await
}
