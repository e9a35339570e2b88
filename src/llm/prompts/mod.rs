// ABOUTME: System prompt for the health assistant, loaded at compile time
// ABOUTME: Appends the current server date and time so records default to today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # System Prompts
//!
//! The base prompt lives in a markdown file for easy editing. Each request gets
//! it with a trailing section stating the server's current date and time.

use chrono::{NaiveDate, NaiveDateTime};

use healthlife_core::models::date_time_format;

/// Health advisor system prompt: role, workflow, tool list, usage rules, MET rule
pub const HEALTHLIFE_SYSTEM_PROMPT: &str = include_str!("healthlife_system.md");

/// Build the system prompt for a request made at `now` on `today`
#[must_use]
pub fn build_system_prompt(today: NaiveDate, now: NaiveDateTime) -> String {
    format!(
        "{}\n\n## 当前服务器时间\n- 今日日期: {}\n- 当前时间: {}\n- 记录健康数据时请默认使用此日期，除非用户明确指定其他日期",
        HEALTHLIFE_SYSTEM_PROMPT.trim(),
        today.format("%Y-%m-%d"),
        now.format(date_time_format::FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_ends_with_server_time_section() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
        let now = today.and_hms_opt(8, 30, 0).unwrap_or_default();
        let prompt = build_system_prompt(today, now);
        assert!(prompt.contains("- 今日日期: 2025-06-01\n- 当前时间: 2025-06-01 08:30:00"));
        assert!(prompt.contains("**webSearch**"));
        assert!(prompt.ends_with("除非用户明确指定其他日期"));
    }
}
