// ABOUTME: Meal type enumeration for diet records
// ABOUTME: Four fixed meal slots serialized under their Chinese names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Meal slot of a diet record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    /// 早餐
    #[serde(rename = "早餐")]
    Breakfast,
    /// 午餐
    #[serde(rename = "午餐")]
    Lunch,
    /// 晚餐
    #[serde(rename = "晚餐")]
    Dinner,
    /// 加餐
    #[serde(rename = "加餐")]
    Snack,
}

impl MealType {
    /// Every meal slot
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "早餐",
            Self::Lunch => "午餐",
            Self::Dinner => "晚餐",
            Self::Snack => "加餐",
        }
    }

    /// Look up a meal slot by display name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
