// ABOUTME: Helpers shared by the record tools: argument decoding, dates, labels, BMI
// ABOUTME: Converts every failure into the status string the model reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::error;

use healthlife_core::constants::paging::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use healthlife_core::models::{date_time_format, RecordKind};
use healthlife_core::pagination::Page;

use super::catalogue::Operation;

/// Date format for `recordDate`, `startDate`, `endDate`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Failure while running a tool, rendered as `{label}失败: {message}`
#[derive(Debug)]
pub struct ToolFailure(pub String);

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<E: std::error::Error> From<E> for ToolFailure {
    fn from(error: E) -> Self {
        Self(error.to_string())
    }
}

/// Label naming a failed operation
#[must_use]
pub fn failure_label(kind: RecordKind, operation: Operation) -> String {
    let verb = match operation {
        Operation::Query | Operation::Detail => "查询",
        Operation::Add => "添加",
        Operation::Update => "更新",
        Operation::Delete => "删除",
    };
    match (kind, operation) {
        (_, Operation::Detail) => format!("查询{}记录详情", kind.label()),
        (RecordKind::Body, _) => format!("{verb}身体数据"),
        _ => format!("{verb}{}记录", kind.label()),
    }
}

/// Log a failure and turn it into the status string
pub fn failure_message(kind: RecordKind, operation: Operation, failure: &impl fmt::Display) -> String {
    let label = failure_label(kind, operation);
    error!(kind = kind.domain(), "{}失败: {}", label, failure);
    format!("{label}失败: {failure}")
}

/// `未找到{label}记录 ID: {id}`
#[must_use]
pub fn not_found_message(kind: RecordKind, id: i64) -> String {
    format!("未找到{}记录 ID: {id}", kind.label())
}

/// `错误：该{label}记录不属于指定用户`
#[must_use]
pub fn ownership_message(kind: RecordKind) -> String {
    format!("错误：该{}记录不属于指定用户", kind.label())
}

/// `查询成功，共找到 {total} 条{noun}记录。数据: {rows}`
///
/// # Errors
///
/// Fails when the rows cannot be serialized
pub fn query_summary<T: Serialize>(kind: RecordKind, page: &Page<T>) -> Result<String, ToolFailure> {
    let rows = serde_json::to_string(&page.rows)?;
    Ok(format!(
        "查询成功，共找到 {} 条{}记录。数据: {rows}",
        page.total,
        kind.query_noun()
    ))
}

/// Parse a required `yyyy-MM-dd` date
///
/// # Errors
///
/// Fails when the text is not a valid date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ToolFailure> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| ToolFailure(format!("{field} 日期格式错误 '{value}': {e}")))
}

/// Parse an optional date; blank means absent
///
/// # Errors
///
/// Fails when a non-blank value is not a valid date
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ToolFailure> {
    match value {
        Some(text) if !text.trim().is_empty() => parse_date(field, text).map(Some),
        _ => Ok(None),
    }
}

/// Parse a required `yyyy-MM-dd HH:mm:ss` date-time
///
/// # Errors
///
/// Fails when the text is not a valid date-time
pub fn parse_date_time(field: &str, value: &str) -> Result<NaiveDateTime, ToolFailure> {
    NaiveDateTime::parse_from_str(value.trim(), date_time_format::FORMAT)
        .map_err(|e| ToolFailure(format!("{field} 时间格式错误 '{value}': {e}")))
}

/// Body mass index; 0 when height is not positive
#[must_use]
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    if height_m <= 0.0 {
        return 0.0;
    }
    weight_kg / (height_m * height_m)
}

/// Default page number for request structs
#[must_use]
pub const fn default_page() -> u32 {
    DEFAULT_PAGE
}

/// Default page size for request structs
#[must_use]
pub const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Accept a user id sent either as a JSON string or number
///
/// # Errors
///
/// Fails for values that are neither
pub fn user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer)
        .map(String::from)
        .map_err(|_| de::Error::custom("userID must be a string or number"))
}

/// Optional variant of [`user_id`]
///
/// # Errors
///
/// Fails for values that are neither null, a string, nor a number
pub fn optional_user_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer)
        .map(|value| value.map(String::from))
        .map_err(|_| de::Error::custom("userID must be a string or number"))
}
