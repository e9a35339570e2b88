// ABOUTME: Query, detail, and delete flows shared by all four record kinds
// ABOUTME: Cached reads keyed per user; deletes evict the owner's cached reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::future::Future;

use serde::Serialize;

use healthlife_core::models::{HealthRecord, RecordKind};
use healthlife_core::pagination::PageQuery;

use crate::cache::CacheKey;
use crate::gateway::RecordGateway;
use crate::tools::catalogue::Operation;
use crate::tools::context::ToolContext;
use crate::tools::requests::{DetailRequest, QueryRecordsRequest};
use crate::tools::support::{
    failure_message, not_found_message, ownership_message, parse_optional_date, query_summary,
    ToolFailure,
};

/// Result of looking up a record before changing it
pub enum Lookup<R> {
    /// Present and owned by the caller
    Found(R),
    /// Status string explaining why not
    Rejected(String),
}

/// Run a tool body and fold a failure into `{label}失败: {error}`
pub async fn settle<F>(kind: RecordKind, operation: Operation, body: F) -> String
where
    F: Future<Output = Result<String, ToolFailure>> + Send,
{
    body.await
        .unwrap_or_else(|failure| failure_message(kind, operation, &failure))
}

/// Fetch `id` and check it belongs to `user_id`
///
/// # Errors
///
/// Propagates gateway failures
pub async fn owned_record<R: HealthRecord>(
    gateway: &dyn RecordGateway<R>,
    id: i64,
    user_id: &str,
) -> Result<Lookup<R>, ToolFailure> {
    Ok(match gateway.get_by_id(id).await? {
        None => Lookup::Rejected(not_found_message(R::KIND, id)),
        Some(existing) if existing.user_id() != user_id => {
            Lookup::Rejected(ownership_message(R::KIND))
        }
        Some(existing) => Lookup::Found(existing),
    })
}

fn query_key<R: HealthRecord>(request: &QueryRecordsRequest) -> CacheKey {
    let key = CacheKey::new(&format!("{}.query", R::KIND.domain()), Some(request.user_id.as_str()))
        .opt_part(request.start_date.as_deref())
        .opt_part(request.end_date.as_deref());
    let key = match R::KIND {
        RecordKind::Diet | RecordKind::Exercise => key.opt_part(request.type_filter.as_deref()),
        RecordKind::Body | RecordKind::Sleep => key,
    };
    key.part(request.page).part(request.page_size)
}

/// Paged listing through the result cache
pub async fn query_records<R>(
    ctx: &ToolContext,
    gateway: &dyn RecordGateway<R>,
    request: QueryRecordsRequest,
) -> String
where
    R: HealthRecord + Serialize,
{
    let kind = R::KIND;
    let key = query_key::<R>(&request);
    ctx.cached(
        &key,
        settle(kind, Operation::Query, async move {
            let type_filter = match kind {
                RecordKind::Diet | RecordKind::Exercise => request.type_filter.clone(),
                RecordKind::Body | RecordKind::Sleep => None,
            };
            let query = PageQuery::for_user(request.user_id.clone(), request.page, request.page_size)
                .with_range(
                    parse_optional_date("startDate", request.start_date.as_deref())?,
                    parse_optional_date("endDate", request.end_date.as_deref())?,
                )
                .with_type_filter(type_filter);
            let page = gateway.page(&query).await?;
            query_summary(kind, &page)
        }),
    )
    .await
}

/// Single record summary through the result cache
pub async fn record_detail<R, D>(
    ctx: &ToolContext,
    gateway: &dyn RecordGateway<R>,
    request: DetailRequest,
    describe: D,
) -> String
where
    R: HealthRecord,
    D: Fn(&R) -> String + Send + Sync,
{
    let kind = R::KIND;
    let key = CacheKey::new(&format!("{}.detail", kind.domain()), request.user_id.as_deref())
        .part(request.id);
    ctx.cached(
        &key,
        settle(kind, Operation::Detail, async move {
            Ok::<_, ToolFailure>(match gateway.get_by_id(request.id).await? {
                None => not_found_message(kind, request.id),
                Some(record)
                    if request
                        .user_id
                        .as_deref()
                        .is_some_and(|user| user != record.user_id()) =>
                {
                    ownership_message(kind)
                }
                Some(record) => describe(&record),
            })
        }),
    )
    .await
}

/// Remove a record and evict its owner's cached reads
pub async fn delete_record<R, C>(
    ctx: &ToolContext,
    gateway: &dyn RecordGateway<R>,
    id: i64,
    confirm: C,
) -> String
where
    R: HealthRecord,
    C: Fn(&R) -> String + Send + Sync,
{
    let kind = R::KIND;
    settle(kind, Operation::Delete, async move {
        let Some(existing) = gateway.get_by_id(id).await? else {
            return Ok(not_found_message(kind, id));
        };
        gateway.delete(id).await?;
        ctx.evict_queries_and_details(kind, existing.user_id());
        Ok::<_, ToolFailure>(confirm(&existing))
    })
    .await
}
