// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Ordinal severity of a period's total CO2e. Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl ThreatLevel {
    pub const ALL: [Self; 4] = [Self::Low, Self::Moderate, Self::High, Self::Severe];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Severe => "Severe",
        }
    }
}

impl Display for ThreatLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category kilograms of CO2e, each rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakdown {
    pub transport_kg: f64,
    pub meals_kg: f64,
    pub electricity_kg: f64,
    pub lpg_kg: f64,
    pub waste_kg: f64,
}

impl Breakdown {
    #[must_use]
    pub fn values(&self) -> [f64; 5] {
        [
            self.transport_kg,
            self.meals_kg,
            self.electricity_kg,
            self.lpg_kg,
            self.waste_kg,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    pub breakdown: Breakdown,
    pub total_kg: f64,
    pub threat: ThreatLevel,
    pub advice: Vec<String>,
    pub period: String,
}
