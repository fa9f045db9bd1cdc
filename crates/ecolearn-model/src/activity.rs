// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_PERIOD: &str = "day";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    PetrolCar,
    Bus,
    WalkCycle,
    ElectricCar,
}

impl TransportMode {
    pub const ALL: [Self; 4] = [
        Self::PetrolCar,
        Self::Bus,
        Self::WalkCycle,
        Self::ElectricCar,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PetrolCar => "petrol_car",
            Self::Bus => "bus",
            Self::WalkCycle => "walk_cycle",
            Self::ElectricCar => "electric_car",
        }
    }

    /// Case-insensitive lookup by snake_case name.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|mode| mode.as_str() == needle)
    }
}

impl Display for TransportMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keys of an activity record as they travel on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityField {
    Mode,
    DistanceKm,
    MeatMeals,
    VegMeals,
    ElectricityKwh,
    LpgKg,
    WasteKg,
    Period,
}

impl ActivityField {
    pub const ALL: [Self; 8] = [
        Self::Mode,
        Self::DistanceKm,
        Self::MeatMeals,
        Self::VegMeals,
        Self::ElectricityKwh,
        Self::LpgKg,
        Self::WasteKg,
        Self::Period,
    ];

    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::DistanceKm => "distance_km",
            Self::MeatMeals => "meat_meals",
            Self::VegMeals => "veg_meals",
            Self::ElectricityKwh => "electricity_kwh",
            Self::LpgKg => "lpg_kg",
            Self::WasteKg => "waste_kg",
            Self::Period => "period",
        }
    }

    #[must_use]
    pub const fn alias(self) -> Option<&'static str> {
        match self {
            Self::Mode => Some("transport_mode"),
            Self::MeatMeals => Some("meat_meal_count"),
            Self::VegMeals => Some("veg_meal_count"),
            Self::Period => Some("period_label"),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == key || field.alias() == Some(key))
    }
}

/// One period's reported activities.
///
/// `distance_km` may be negative here; the accounting engine clamps it. Every
/// other quantity is non-negative once it has passed the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    #[serde(rename = "mode", alias = "transport_mode")]
    pub transport_mode: Option<TransportMode>,
    pub distance_km: f64,
    #[serde(rename = "meat_meals", alias = "meat_meal_count")]
    pub meat_meal_count: u32,
    #[serde(rename = "veg_meals", alias = "veg_meal_count")]
    pub veg_meal_count: u32,
    pub electricity_kwh: f64,
    pub lpg_kg: f64,
    pub waste_kg: f64,
    #[serde(rename = "period", alias = "period_label")]
    pub period_label: String,
}

impl Default for ActivityRecord {
    fn default() -> Self {
        Self {
            transport_mode: None,
            distance_km: 0.0,
            meat_meal_count: 0,
            veg_meal_count: 0,
            electricity_kwh: 0.0,
            lpg_kg: 0.0,
            waste_kg: 0.0,
            period_label: DEFAULT_PERIOD.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_mode_parse_is_case_insensitive() {
        assert_eq!(TransportMode::parse(" Petrol_Car "), Some(TransportMode::PetrolCar));
        assert_eq!(TransportMode::parse("bus"), Some(TransportMode::Bus));
        assert_eq!(TransportMode::parse("rocket"), None);
    }

    #[test]
    fn activity_field_resolves_aliases() {
        assert_eq!(ActivityField::from_key("mode"), Some(ActivityField::Mode));
        assert_eq!(
            ActivityField::from_key("transport_mode"),
            Some(ActivityField::Mode)
        );
        assert_eq!(
            ActivityField::from_key("period_label"),
            Some(ActivityField::Period)
        );
        assert_eq!(ActivityField::from_key("lang"), None);
    }

    #[test]
    fn default_record_is_zero_with_day_period() {
        let record = ActivityRecord::default();
        assert!(record.transport_mode.is_none());
        assert_eq!(record.distance_km, 0.0);
        assert_eq!(record.period_label, "day");
    }
}
