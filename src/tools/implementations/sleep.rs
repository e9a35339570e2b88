// ABOUTME: Sleep tools: query, add, detail, update, delete sleep sessions
// ABOUTME: Bed time may not follow wake time; confirmations report hours slept
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use healthlife_core::models::{date_time_format, RecordKind, SleepRecord};

use super::records::{delete_record, owned_record, query_records, record_detail, settle, Lookup};
use crate::tools::catalogue::Operation;
use crate::tools::context::ToolContext;
use crate::tools::requests::{DeleteRequest, DetailRequest, QueryRecordsRequest, SleepRecordRequest};
use crate::tools::support::{parse_date, parse_date_time, ToolFailure};

const KIND: RecordKind = RecordKind::Sleep;

const BED_AFTER_WAKE: &str = "错误：入睡时间不能晚于起床时间";

/// Parsed record, or the ordering rejection
fn to_record(request: &SleepRecordRequest, id: i64) -> Result<Result<SleepRecord, String>, ToolFailure> {
    let record = SleepRecord {
        id,
        user_id: request.user_id.clone(),
        record_date: parse_date("recordDate", &request.record_date)?,
        bed_time: parse_date_time("bedTime", &request.bed_time)?,
        wake_time: parse_date_time("wakeTime", &request.wake_time)?,
    };
    if record.bed_time > record.wake_time {
        return Ok(Err(BED_AFTER_WAKE.to_owned()));
    }
    Ok(Ok(record))
}

/// `querySleepRecords`
pub async fn query(ctx: &ToolContext, request: QueryRecordsRequest) -> String {
    query_records(ctx, ctx.gateway.sleep.as_ref(), request).await
}

/// `addSleepRecord`
pub async fn add(ctx: &ToolContext, request: SleepRecordRequest) -> String {
    settle(KIND, Operation::Add, async move {
        let record = match to_record(&request, 0)? {
            Ok(record) => record,
            Err(rejection) => return Ok(rejection),
        };
        let saved = ctx.gateway.sleep.insert(record).await?;
        ctx.evict_queries_and_details(KIND, &saved.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功添加睡眠记录！记录 ID: {}，睡眠时长: {:.1} 小时（建议 7-9 小时）",
            saved.id,
            saved.duration_hours()
        ))
    })
    .await
}

/// `updateSleepRecord`
pub async fn update(ctx: &ToolContext, id: i64, request: SleepRecordRequest) -> String {
    settle(KIND, Operation::Update, async move {
        let record = match to_record(&request, id)? {
            Ok(record) => record,
            Err(rejection) => return Ok(rejection),
        };
        let gateway = ctx.gateway.sleep.as_ref();
        if let Lookup::Rejected(rejection) = owned_record(gateway, id, &record.user_id).await? {
            return Ok(rejection);
        }
        gateway.update(&record).await?;
        ctx.evict_queries_and_details(KIND, &record.user_id);
        Ok::<_, ToolFailure>(format!(
            "成功更新睡眠记录 ID: {id}，新的睡眠时长: {:.1} 小时",
            record.duration_hours()
        ))
    })
    .await
}

/// `getSleepRecordDetail`
pub async fn detail(ctx: &ToolContext, request: DetailRequest) -> String {
    record_detail(ctx, ctx.gateway.sleep.as_ref(), request, |sleep: &SleepRecord| {
        format!(
            "睡眠记录详情 - ID: {}，日期: {}，入睡: {}，起床: {}，时长: {:.1} 小时",
            sleep.id,
            sleep.record_date,
            sleep.bed_time.format(date_time_format::FORMAT),
            sleep.wake_time.format(date_time_format::FORMAT),
            sleep.duration_hours()
        )
    })
    .await
}

/// `deleteSleepRecord`
pub async fn delete(ctx: &ToolContext, request: DeleteRequest) -> String {
    delete_record(ctx, ctx.gateway.sleep.as_ref(), request.id, |existing: &SleepRecord| {
        format!("成功删除睡眠记录 ID: {}，原日期: {}", existing.id, existing.record_date)
    })
    .await
}
