// ABOUTME: Closed enumeration of supported exercise types with MET coefficients
// ABOUTME: Serializes to the Chinese display names stored in records and tool arguments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Exercise types accepted by the exercise record tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    /// 跑步
    #[serde(rename = "跑步")]
    Running,
    /// 游泳
    #[serde(rename = "游泳")]
    Swimming,
    /// 骑行
    #[serde(rename = "骑行")]
    Cycling,
    /// 徒步
    #[serde(rename = "徒步")]
    Hiking,
    /// 爬山
    #[serde(rename = "爬山")]
    Climbing,
    /// 跳绳
    #[serde(rename = "跳绳")]
    JumpRope,
    /// 篮球
    #[serde(rename = "篮球")]
    Basketball,
    /// 足球
    #[serde(rename = "足球")]
    Football,
    /// 羽毛球
    #[serde(rename = "羽毛球")]
    Badminton,
    /// 乒乓球
    #[serde(rename = "乒乓球")]
    TableTennis,
    /// 网球
    #[serde(rename = "网球")]
    Tennis,
    /// 健身房训练
    #[serde(rename = "健身房训练")]
    GymTraining,
    /// 瑜伽
    #[serde(rename = "瑜伽")]
    Yoga,
    /// 普拉提
    #[serde(rename = "普拉提")]
    Pilates,
    /// 力量训练
    #[serde(rename = "力量训练")]
    StrengthTraining,
}

impl ExerciseType {
    /// Every supported type, in the order presented to users
    pub const ALL: [Self; 15] = [
        Self::Running,
        Self::Swimming,
        Self::Cycling,
        Self::Hiking,
        Self::Climbing,
        Self::JumpRope,
        Self::Basketball,
        Self::Football,
        Self::Badminton,
        Self::TableTennis,
        Self::Tennis,
        Self::GymTraining,
        Self::Yoga,
        Self::Pilates,
        Self::StrengthTraining,
    ];

    /// Display name as stored and as sent by the model
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "跑步",
            Self::Swimming => "游泳",
            Self::Cycling => "骑行",
            Self::Hiking => "徒步",
            Self::Climbing => "爬山",
            Self::JumpRope => "跳绳",
            Self::Basketball => "篮球",
            Self::Football => "足球",
            Self::Badminton => "羽毛球",
            Self::TableTennis => "乒乓球",
            Self::Tennis => "网球",
            Self::GymTraining => "健身房训练",
            Self::Yoga => "瑜伽",
            Self::Pilates => "普拉提",
            Self::StrengthTraining => "力量训练",
        }
    }

    /// Metabolic equivalent of task for this activity
    #[must_use]
    pub const fn met(self) -> f64 {
        match self {
            Self::Running => 9.8,
            Self::Swimming => 8.0,
            Self::Cycling => 6.8,
            Self::Hiking => 3.5,
            Self::Climbing | Self::Football | Self::Tennis => 7.0,
            Self::JumpRope => 11.0,
            Self::Basketball => 6.5,
            Self::Badminton => 5.5,
            Self::TableTennis | Self::Pilates => 4.0,
            Self::GymTraining | Self::StrengthTraining => 5.0,
            Self::Yoga => 3.0,
        }
    }

    /// Look up a type by its display name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// All display names joined with the Chinese enumeration comma
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL.map(Self::as_str).join("、")
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
