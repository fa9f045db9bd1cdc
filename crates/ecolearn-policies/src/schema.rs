// SPDX-License-Identifier: Apache-2.0

use ecolearn_model::{ThreatLevel, TransportMode};
use serde::{Deserialize, Serialize};

use crate::limits::{
    DEFAULT_ELECTRICITY_KG_PER_KWH, DEFAULT_LPG_KG_PER_KG, DEFAULT_WASTE_KG_PER_KG,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PolicySchemaVersion {
    #[serde(rename = "1")]
    V1,
}

impl PolicySchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
        }
    }
}

/// Kilograms of CO2e per unit of activity.
///
/// The numbers are demo policy values, not an authoritative inventory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactorTable {
    pub petrol_car_kg_per_km: f64,
    pub bus_kg_per_km: f64,
    pub electric_car_kg_per_km: f64,
    pub walk_cycle_kg_per_km: f64,
    pub meat_meal_kg: f64,
    pub veg_meal_kg: f64,
    pub electricity_kg_per_kwh: f64,
    pub lpg_kg_per_kg: f64,
    pub waste_kg_per_kg: f64,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self {
            petrol_car_kg_per_km: 0.24,
            bus_kg_per_km: 0.05,
            electric_car_kg_per_km: 0.05,
            walk_cycle_kg_per_km: 0.0,
            meat_meal_kg: 2.5,
            veg_meal_kg: 0.5,
            electricity_kg_per_kwh: DEFAULT_ELECTRICITY_KG_PER_KWH,
            lpg_kg_per_kg: DEFAULT_LPG_KG_PER_KG,
            waste_kg_per_kg: DEFAULT_WASTE_KG_PER_KG,
        }
    }
}

impl EmissionFactorTable {
    /// Rate for a transport mode; an absent mode travels at the walk/cycle rate.
    #[must_use]
    pub fn transport_rate(&self, mode: Option<TransportMode>) -> f64 {
        match mode {
            Some(TransportMode::PetrolCar) => self.petrol_car_kg_per_km,
            Some(TransportMode::Bus) => self.bus_kg_per_km,
            Some(TransportMode::ElectricCar) => self.electric_car_kg_per_km,
            Some(TransportMode::WalkCycle) | None => self.walk_cycle_kg_per_km,
        }
    }
}

/// Half-open interval `[lower_kg, upper_kg)`; `upper_kg = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreatBand {
    pub lower_kg: f64,
    pub upper_kg: Option<f64>,
    pub level: ThreatLevel,
}

impl ThreatBand {
    #[must_use]
    pub fn contains(&self, total_kg: f64) -> bool {
        total_kg >= self.lower_kg && self.upper_kg.is_none_or(|upper| total_kg < upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreatBandTable {
    pub bands: Vec<ThreatBand>,
}

impl Default for ThreatBandTable {
    fn default() -> Self {
        Self {
            bands: vec![
                ThreatBand {
                    lower_kg: 0.0,
                    upper_kg: Some(5.0),
                    level: ThreatLevel::Low,
                },
                ThreatBand {
                    lower_kg: 5.0,
                    upper_kg: Some(15.0),
                    level: ThreatLevel::Moderate,
                },
                ThreatBand {
                    lower_kg: 15.0,
                    upper_kg: Some(40.0),
                    level: ThreatLevel::High,
                },
                ThreatBand {
                    lower_kg: 40.0,
                    upper_kg: None,
                    level: ThreatLevel::Severe,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarbonPolicy {
    pub schema_version: PolicySchemaVersion,
    pub emission_factors: EmissionFactorTable,
    pub threat_bands: ThreatBandTable,
    pub advice: Vec<String>,
}

impl Default for CarbonPolicy {
    fn default() -> Self {
        Self {
            schema_version: PolicySchemaVersion::V1,
            emission_factors: EmissionFactorTable::default(),
            threat_bands: ThreatBandTable::default(),
            advice: [
                "Prefer walking/cycling for short trips",
                "Use public transport for commuting",
                "Try a vegetarian meal today",
                "Set AC to 24–26°C and use fans",
                "Unplug idle chargers",
                "Carry a reusable bag and bottle",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}
