// ABOUTME: MET-based calorie estimate for exercise records
// ABOUTME: kcal = round(MET x weight kg x hours), default weight when none is on file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use healthlife_core::constants::exercise::DEFAULT_WEIGHT_KG;
use healthlife_core::models::ExerciseType;

/// Where the weight used for an estimate came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightSource {
    /// Latest body record
    Recorded(f64),
    /// No body record; [`DEFAULT_WEIGHT_KG`] used
    Default,
}

impl WeightSource {
    /// From the latest recorded weight, if any
    #[must_use]
    pub fn from_latest(latest: Option<f64>) -> Self {
        latest.map_or(Self::Default, Self::Recorded)
    }

    /// Weight in kilograms
    #[must_use]
    pub const fn kilograms(self) -> f64 {
        match self {
            Self::Recorded(kg) => kg,
            Self::Default => DEFAULT_WEIGHT_KG,
        }
    }

    /// Whether the default weight stands in
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Disclosure appended to the confirmation
    #[must_use]
    pub fn disclosure(self) -> String {
        match self {
            Self::Recorded(kg) => format!("MET 公式计算（基于体重 {kg:.1} kg）"),
            Self::Default => format!("MET 公式计算（使用默认体重 {DEFAULT_WEIGHT_KG:.1} kg）"),
        }
    }
}

/// Estimated kilocalories burned
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn estimate_calories(exercise: ExerciseType, duration_minutes: i32, weight_kg: f64) -> i32 {
    let hours = f64::from(duration_minutes) / 60.0;
    (exercise.met() * weight_kg * hours).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_half_hour_default_weight() {
        let kcal = estimate_calories(ExerciseType::Running, 30, WeightSource::Default.kilograms());
        assert_eq!(kcal, 319);
    }

    #[test]
    fn test_disclosure_mentions_weight() {
        assert_eq!(
            WeightSource::Recorded(72.4).disclosure(),
            "MET 公式计算（基于体重 72.4 kg）"
        );
        assert_eq!(
            WeightSource::Default.disclosure(),
            "MET 公式计算（使用默认体重 65.0 kg）"
        );
    }
}
