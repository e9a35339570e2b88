// ABOUTME: In-memory record store implementing the gateway contract for any record kind
// ABOUTME: Used by tests and by the server when no database URL is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use healthlife_core::models::HealthRecord;
use healthlife_core::pagination::{Page, PageQuery};

use super::{matches_query, sort_newest_first, RecordGateway};
use crate::errors::{AppError, AppResult};

/// Record store kept in process memory
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    records: RwLock<BTreeMap<i64, R>>,
    next_id: AtomicI64,
}

impl<R: HealthRecord> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HealthRecord> InMemoryRecordStore<R> {
    /// Empty store; ids start at 1
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl<R: HealthRecord> RecordGateway<R> for InMemoryRecordStore<R> {
    async fn page(&self, query: &PageQuery) -> AppResult<Page<R>> {
        let mut rows: Vec<R> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| matches_query(*record, query))
            .cloned()
            .collect();
        sort_newest_first(&mut rows);

        let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let rows = rows
            .into_iter()
            .skip(offset)
            .take(query.effective_page_size() as usize)
            .collect();
        Ok(Page { total, rows })
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<R>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn insert(&self, mut record: R) -> AppResult<R> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.set_id(id);
        self.records.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &R) -> AppResult<()> {
        let mut records = self.records.write().await;
        let slot = records.get_mut(&record.id()).ok_or_else(|| {
            AppError::not_found(format!("{} record {}", R::KIND.domain(), record.id()))
        })?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("{} record {id}", R::KIND.domain())))
    }
}
