// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use ecolearn_model::{ActivityRecord, AnalysisResult, Breakdown};
use ecolearn_policies::{CarbonPolicy, MAX_TIPS};

use crate::threat::classify_threat;

/// Rounds to two decimals from the exact binary value, ties to even.
///
/// `2.675` is stored just below the midpoint and becomes `2.67`; `0.125` is
/// an exact tie and becomes `0.12`.
#[must_use]
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Unrounded per-category kilograms of CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contributions {
    pub transport_kg: f64,
    pub meals_kg: f64,
    pub electricity_kg: f64,
    pub lpg_kg: f64,
    pub waste_kg: f64,
}

impl Contributions {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.transport_kg + self.meals_kg + self.electricity_kg + self.lpg_kg + self.waste_kg
    }

    #[must_use]
    pub fn rounded(&self) -> Breakdown {
        Breakdown {
            transport_kg: round2(self.transport_kg),
            meals_kg: round2(self.meals_kg),
            electricity_kg: round2(self.electricity_kg),
            lpg_kg: round2(self.lpg_kg),
            waste_kg: round2(self.waste_kg),
        }
    }
}

/// Deterministic accounting over an immutable policy.
///
/// The total is rounded once from the unrounded sum; it can differ from the
/// sum of the rounded categories by at most 0.03 kg.
#[derive(Debug, Clone)]
pub struct AccountingEngine {
    policy: Arc<CarbonPolicy>,
}

impl Default for AccountingEngine {
    fn default() -> Self {
        Self::new(Arc::new(CarbonPolicy::default()))
    }
}

impl AccountingEngine {
    #[must_use]
    pub fn new(policy: Arc<CarbonPolicy>) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &CarbonPolicy {
        &self.policy
    }

    /// Quantities below zero (and NaN) count as zero.
    #[must_use]
    pub fn contributions(&self, record: &ActivityRecord) -> Contributions {
        let factors = &self.policy.emission_factors;
        let distance = non_negative(record.distance_km);
        Contributions {
            transport_kg: distance * factors.transport_rate(record.transport_mode),
            meals_kg: f64::from(record.meat_meal_count) * factors.meat_meal_kg
                + f64::from(record.veg_meal_count) * factors.veg_meal_kg,
            electricity_kg: non_negative(record.electricity_kwh) * factors.electricity_kg_per_kwh,
            lpg_kg: non_negative(record.lpg_kg) * factors.lpg_kg_per_kg,
            waste_kg: non_negative(record.waste_kg) * factors.waste_kg_per_kg,
        }
    }

    #[must_use]
    pub fn analyze(&self, record: &ActivityRecord) -> AnalysisResult {
        let contributions = self.contributions(record);
        let total_kg = round2(contributions.total());
        AnalysisResult {
            breakdown: contributions.rounded(),
            total_kg,
            threat: classify_threat(total_kg, &self.policy.threat_bands),
            advice: self.policy.advice.clone(),
            period: record.period_label.clone(),
        }
    }

    /// Generic advice truncated to the tip limit.
    #[must_use]
    pub fn default_tips(&self) -> Vec<String> {
        self.policy.advice.iter().take(MAX_TIPS).cloned().collect()
    }
}

fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolearn_model::{ThreatLevel, TransportMode};

    #[test]
    fn default_record_is_all_zero_and_low() {
        let result = AccountingEngine::default().analyze(&ActivityRecord::default());
        assert_eq!(result.breakdown, Breakdown::default());
        assert_eq!(result.total_kg, 0.0);
        assert_eq!(result.threat, ThreatLevel::Low);
        assert_eq!(result.period, "day");
        assert_eq!(result.advice.len(), 6);
    }

    #[test]
    fn negative_distance_contributes_nothing() {
        let record = ActivityRecord {
            transport_mode: Some(TransportMode::PetrolCar),
            distance_km: -12.0,
            ..ActivityRecord::default()
        };
        let result = AccountingEngine::default().analyze(&record);
        assert_eq!(result.breakdown.transport_kg, 0.0);
        assert_eq!(result.total_kg, 0.0);
    }

    #[test]
    fn total_is_rounded_from_unrounded_sum() {
        // 0.004 + 0.004 rounds to 0.01 as a sum but to 0.0 per category.
        let contributions = Contributions {
            transport_kg: 0.004,
            meals_kg: 0.004,
            ..Contributions::default()
        };
        assert_eq!(round2(contributions.total()), 0.01);
        assert_eq!(contributions.rounded().values().iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn round2_uses_the_stored_binary_value() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(0.3799999), 0.38);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn short_bus_ride_rounds_the_tie_down() {
        let record = ActivityRecord {
            transport_mode: Some(TransportMode::Bus),
            distance_km: 2.5,
            ..ActivityRecord::default()
        };
        let result = AccountingEngine::default().analyze(&record);
        assert_eq!(result.breakdown.transport_kg, 0.12);
        assert_eq!(result.total_kg, 0.12);
    }

    #[test]
    fn default_tips_are_truncated() {
        let tips = AccountingEngine::default().default_tips();
        assert_eq!(tips.len(), MAX_TIPS);
        assert_eq!(tips[0], CarbonPolicy::default().advice[0]);
    }
}
