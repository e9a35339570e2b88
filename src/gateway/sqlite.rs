// ABOUTME: SQLite-backed record stores for the four health record kinds
// ABOUTME: Creates tables on startup and maps rows to records with dates stored as text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::marker::PhantomData;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow,
};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

use healthlife_core::models::{
    date_time_format, BodyRecord, DietRecord, ExerciseRecord, ExerciseType, HealthRecord,
    MealType, SleepRecord,
};
use healthlife_core::pagination::{Page, PageQuery};

use super::RecordGateway;
use crate::errors::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Table mapping for a record kind
pub trait SqlRecord: HealthRecord {
    /// Data columns in bind order, excluding `id`
    const COLUMNS: &'static [&'static str];
    /// Column definitions after `id` in `CREATE TABLE`
    const COLUMN_DEFS: &'static str;
    /// Column matched by the page query's type filter
    const TYPE_COLUMN: Option<&'static str> = None;

    /// Bind the data columns in [`SqlRecord::COLUMNS`] order
    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    /// Build a record from a full row
    ///
    /// # Errors
    ///
    /// Returns an error when a column is missing or holds an unparseable value
    fn from_row(row: &SqliteRow) -> AppResult<Self>;
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| AppError::database(format!("Failed to read column {name}: {e}")))
}

fn date_column(row: &SqliteRow, name: &str) -> AppResult<NaiveDate> {
    let raw: String = column(row, name)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| AppError::database(format!("Invalid date in column {name}: {e}")))
}

fn date_time_column(row: &SqliteRow, name: &str) -> AppResult<NaiveDateTime> {
    let raw: String = column(row, name)?;
    NaiveDateTime::parse_from_str(&raw, date_time_format::FORMAT)
        .map_err(|e| AppError::database(format!("Invalid date-time in column {name}: {e}")))
}

impl SqlRecord for BodyRecord {
    const COLUMNS: &'static [&'static str] = &["user_id", "height_cm", "weight_kg", "record_date"];
    const COLUMN_DEFS: &'static str = r"
        user_id TEXT NOT NULL,
        height_cm REAL NOT NULL,
        weight_kg REAL NOT NULL,
        record_date TEXT NOT NULL";

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.user_id.as_str())
            .bind(self.height_cm)
            .bind(self.weight_kg)
            .bind(self.record_date.format(DATE_FORMAT).to_string())
    }

    fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            height_cm: column(row, "height_cm")?,
            weight_kg: column(row, "weight_kg")?,
            record_date: date_column(row, "record_date")?,
        })
    }
}

impl SqlRecord for DietRecord {
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "record_date",
        "food_name",
        "meal_type",
        "estimated_calories",
    ];
    const COLUMN_DEFS: &'static str = r"
        user_id TEXT NOT NULL,
        record_date TEXT NOT NULL,
        food_name TEXT NOT NULL,
        meal_type TEXT NOT NULL,
        estimated_calories INTEGER NOT NULL";
    const TYPE_COLUMN: Option<&'static str> = Some("meal_type");

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.user_id.as_str())
            .bind(self.record_date.format(DATE_FORMAT).to_string())
            .bind(self.food_name.as_str())
            .bind(self.meal_type.as_str())
            .bind(self.estimated_calories)
    }

    fn from_row(row: &SqliteRow) -> AppResult<Self> {
        let meal: String = column(row, "meal_type")?;
        Ok(Self {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            record_date: date_column(row, "record_date")?,
            food_name: column(row, "food_name")?,
            meal_type: MealType::from_name(&meal)
                .ok_or_else(|| AppError::database(format!("Unknown meal type: {meal}")))?,
            estimated_calories: column(row, "estimated_calories")?,
        })
    }
}

impl SqlRecord for ExerciseRecord {
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "record_date",
        "exercise_type",
        "duration_minutes",
        "estimated_calories_burned",
    ];
    const COLUMN_DEFS: &'static str = r"
        user_id TEXT NOT NULL,
        record_date TEXT NOT NULL,
        exercise_type TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL,
        estimated_calories_burned INTEGER NOT NULL";
    const TYPE_COLUMN: Option<&'static str> = Some("exercise_type");

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.user_id.as_str())
            .bind(self.record_date.format(DATE_FORMAT).to_string())
            .bind(self.exercise_type.as_str())
            .bind(self.duration_minutes)
            .bind(self.estimated_calories_burned)
    }

    fn from_row(row: &SqliteRow) -> AppResult<Self> {
        let kind: String = column(row, "exercise_type")?;
        Ok(Self {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            record_date: date_column(row, "record_date")?,
            exercise_type: ExerciseType::from_name(&kind)
                .ok_or_else(|| AppError::database(format!("Unknown exercise type: {kind}")))?,
            duration_minutes: column(row, "duration_minutes")?,
            estimated_calories_burned: column(row, "estimated_calories_burned")?,
        })
    }
}

impl SqlRecord for SleepRecord {
    const COLUMNS: &'static [&'static str] = &["user_id", "record_date", "bed_time", "wake_time"];
    const COLUMN_DEFS: &'static str = r"
        user_id TEXT NOT NULL,
        record_date TEXT NOT NULL,
        bed_time TEXT NOT NULL,
        wake_time TEXT NOT NULL";

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.user_id.as_str())
            .bind(self.record_date.format(DATE_FORMAT).to_string())
            .bind(self.bed_time.format(date_time_format::FORMAT).to_string())
            .bind(self.wake_time.format(date_time_format::FORMAT).to_string())
    }

    fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            record_date: date_column(row, "record_date")?,
            bed_time: date_time_column(row, "bed_time")?,
            wake_time: date_time_column(row, "wake_time")?,
        })
    }
}

/// Owner of the `SQLite` pool and schema
#[derive(Clone)]
pub struct SqliteHealthStore {
    pool: SqlitePool,
}

impl SqliteHealthStore {
    /// Open (creating if missing) the database at `database_url` and create tables
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or migration fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL {database_url}: {e}")))?
            .create_if_missing(true);

        // In-memory databases are per connection
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        info!("Health data store ready at {}", database_url);
        Ok(store)
    }

    /// Wrap an existing pool without touching the schema
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the four record tables and their indexes
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.create_table::<BodyRecord>().await?;
        self.create_table::<DietRecord>().await?;
        self.create_table::<ExerciseRecord>().await?;
        self.create_table::<SleepRecord>().await
    }

    async fn create_table<R: SqlRecord>(&self) -> AppResult<()> {
        let table = R::KIND.table();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n        id INTEGER PRIMARY KEY AUTOINCREMENT,{}\n    )",
            R::COLUMN_DEFS
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create table {table}: {e}")))?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_user_date ON {table}(user_id, record_date)"
        );
        sqlx::query(&index)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to index table {table}: {e}")))?;

        debug!(table, "Table ready");
        Ok(())
    }

    /// Record store for one kind
    #[must_use]
    pub fn records<R: SqlRecord>(&self) -> SqliteRecordStore<R> {
        SqliteRecordStore {
            pool: self.pool.clone(),
            _kind: PhantomData,
        }
    }
}

/// `SQLite` record store for one kind
pub struct SqliteRecordStore<R> {
    pool: SqlitePool,
    _kind: PhantomData<fn() -> R>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &PageQuery, type_column: Option<&str>) {
    builder.push(" WHERE 1 = 1");
    if let Some(user_id) = &query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.clone());
    }
    if let Some(start) = query.start {
        builder
            .push(" AND record_date >= ")
            .push_bind(start.format(DATE_FORMAT).to_string());
    }
    if let Some(end) = query.end {
        builder
            .push(" AND record_date <= ")
            .push_bind(end.format(DATE_FORMAT).to_string());
    }
    if let (Some(column), Some(tag)) = (type_column, &query.type_filter) {
        builder
            .push(format!(" AND {column} = "))
            .push_bind(tag.clone());
    }
}

#[async_trait]
impl<R: SqlRecord> RecordGateway<R> for SqliteRecordStore<R> {
    #[instrument(skip(self), fields(table = R::KIND.table()))]
    async fn page(&self, query: &PageQuery) -> AppResult<Page<R>> {
        let table = R::KIND.table();

        let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) AS total FROM {table}"));
        push_filters(&mut count, query, R::TYPE_COLUMN);
        let total: i64 = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count {table} records: {e}")))?
            .get("total");

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {table}"));
        push_filters(&mut select, query, R::TYPE_COLUMN);
        select
            .push(" ORDER BY record_date DESC, id DESC LIMIT ")
            .push_bind(i64::from(query.effective_page_size()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list {table} records: {e}")))?;

        let rows = rows.iter().map(R::from_row).collect::<AppResult<Vec<_>>>()?;
        Ok(Page { total, rows })
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<R>> {
        let table = R::KIND.table();
        let sql = format!("SELECT * FROM {table} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get {table} record: {e}")))?;

        row.as_ref().map(R::from_row).transpose()
    }

    async fn insert(&self, mut record: R) -> AppResult<R> {
        let table = R::KIND.table();
        let placeholders = vec!["?"; R::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            R::COLUMNS.join(", ")
        );
        let id = record
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert {table} record: {e}")))?
            .last_insert_rowid();

        record.set_id(id);
        Ok(record)
    }

    #[instrument(skip(self, record), fields(table = R::KIND.table(), id = record.id()))]
    async fn update(&self, record: &R) -> AppResult<()> {
        let table = R::KIND.table();
        let assignments = R::COLUMNS
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {table} SET {assignments} WHERE id = ?");
        let result = record
            .bind_columns(sqlx::query(&sql))
            .bind(record.id())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update {table} record: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("{table} record {}", record.id())));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let table = R::KIND.table();
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete {table} record: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("{table} record {id}")));
        }
        Ok(())
    }
}
