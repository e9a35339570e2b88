// ABOUTME: Health data gateway contract over body, diet, exercise, and sleep records
// ABOUTME: Paged queries, lookups, writes, and the latest-weight lookup used for calories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Health Data Gateway
//!
//! The tool layer talks to storage only through [`RecordGateway`]. Rows come back
//! newest `record_date` first, ties broken by highest id, so the first row of a
//! one-row body page is the latest weight.

/// In-memory record stores
pub mod memory;
/// `SQLite` record stores
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use healthlife_core::models::{
    BodyRecord, DietRecord, ExerciseRecord, HealthRecord, SleepRecord,
};
use healthlife_core::pagination::{Page, PageQuery};

use crate::errors::AppResult;

pub use memory::InMemoryRecordStore;
pub use sqlite::{SqliteHealthStore, SqliteRecordStore};

/// Storage operations for one record kind
#[async_trait]
pub trait RecordGateway<R: HealthRecord>: Send + Sync {
    /// One page of matching rows plus the total match count
    async fn page(&self, query: &PageQuery) -> AppResult<Page<R>>;

    /// Record by id
    async fn get_by_id(&self, id: i64) -> AppResult<Option<R>>;

    /// Store a new record and return it with its assigned id
    async fn insert(&self, record: R) -> AppResult<R>;

    /// Overwrite an existing record; fails with not-found when the id is unknown
    async fn update(&self, record: &R) -> AppResult<()>;

    /// Remove a record; fails with not-found when the id is unknown
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// The four record gateways bundled together
#[derive(Clone)]
pub struct HealthDataGateway {
    /// Body metrics
    pub body: Arc<dyn RecordGateway<BodyRecord>>,
    /// Diet records
    pub diet: Arc<dyn RecordGateway<DietRecord>>,
    /// Exercise records
    pub exercise: Arc<dyn RecordGateway<ExerciseRecord>>,
    /// Sleep records
    pub sleep: Arc<dyn RecordGateway<SleepRecord>>,
}

impl HealthDataGateway {
    /// Gateway over fresh in-memory stores
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            body: Arc::new(InMemoryRecordStore::<BodyRecord>::new()),
            diet: Arc::new(InMemoryRecordStore::<DietRecord>::new()),
            exercise: Arc::new(InMemoryRecordStore::<ExerciseRecord>::new()),
            sleep: Arc::new(InMemoryRecordStore::<SleepRecord>::new()),
        }
    }

    /// Gateway over `SQLite` tables
    #[must_use]
    pub fn sqlite(store: &SqliteHealthStore) -> Self {
        Self {
            body: Arc::new(store.records::<BodyRecord>()),
            diet: Arc::new(store.records::<DietRecord>()),
            exercise: Arc::new(store.records::<ExerciseRecord>()),
            sleep: Arc::new(store.records::<SleepRecord>()),
        }
    }

    /// Weight of the user's most recent body record.
    ///
    /// Lookup failures are logged and reported as "no weight on file".
    pub async fn latest_weight(&self, user_id: &str) -> Option<f64> {
        match self.body.page(&PageQuery::for_user(user_id, 1, 1)).await {
            Ok(page) => page.rows.first().map(|body| body.weight_kg),
            Err(e) => {
                warn!(user_id = %user_id, "Failed to look up latest weight: {}", e);
                None
            }
        }
    }
}

/// Sort rows newest first, ties by highest id
pub(crate) fn sort_newest_first<R: HealthRecord>(rows: &mut [R]) {
    rows.sort_by(|a, b| {
        b.record_date()
            .cmp(&a.record_date())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

/// Whether `record` passes the filters of `query`
pub(crate) fn matches_query<R: HealthRecord>(record: &R, query: &PageQuery) -> bool {
    query
        .user_id
        .as_deref()
        .map_or(true, |user| record.user_id() == user)
        && query.start.map_or(true, |start| record.record_date() >= start)
        && query.end.map_or(true, |end| record.record_date() <= end)
        && query
            .type_filter
            .as_deref()
            .map_or(true, |tag| record.type_tag() == Some(tag))
}
