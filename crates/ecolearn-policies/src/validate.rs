// SPDX-License-Identifier: Apache-2.0

use crate::schema::{CarbonPolicy, EmissionFactorTable, ThreatBandTable};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PolicyValidationError(pub String);

pub fn validate_policy(policy: &CarbonPolicy) -> Result<(), PolicyValidationError> {
    validate_emission_factors(&policy.emission_factors)?;
    validate_threat_bands(&policy.threat_bands)?;
    if policy.advice.is_empty() {
        return Err(PolicyValidationError(
            "advice must contain at least one entry".to_string(),
        ));
    }
    if policy.advice.iter().any(|a| a.trim().is_empty()) {
        return Err(PolicyValidationError(
            "advice entries must be non-empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_emission_factors(table: &EmissionFactorTable) -> Result<(), PolicyValidationError> {
    let non_negative = [
        ("petrol_car_kg_per_km", table.petrol_car_kg_per_km),
        ("bus_kg_per_km", table.bus_kg_per_km),
        ("electric_car_kg_per_km", table.electric_car_kg_per_km),
        ("walk_cycle_kg_per_km", table.walk_cycle_kg_per_km),
        ("meat_meal_kg", table.meat_meal_kg),
        ("veg_meal_kg", table.veg_meal_kg),
    ];
    for (name, rate) in non_negative {
        if !rate.is_finite() || rate < 0.0 {
            return Err(PolicyValidationError(format!(
                "emission_factors.{name} must be a finite non-negative number, got {rate}"
            )));
        }
    }
    let positive = [
        ("electricity_kg_per_kwh", table.electricity_kg_per_kwh),
        ("lpg_kg_per_kg", table.lpg_kg_per_kg),
        ("waste_kg_per_kg", table.waste_kg_per_kg),
    ];
    for (name, rate) in positive {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PolicyValidationError(format!(
                "emission_factors.{name} must be a finite positive number, got {rate}"
            )));
        }
    }
    Ok(())
}

/// Bands must tile `[0, +inf)`: start at zero, each upper equals the next
/// lower, only the last band is unbounded, severity strictly increases.
pub fn validate_threat_bands(table: &ThreatBandTable) -> Result<(), PolicyValidationError> {
    let bands = &table.bands;
    let first = bands
        .first()
        .ok_or_else(|| PolicyValidationError("threat_bands must not be empty".to_string()))?;
    if first.lower_kg != 0.0 {
        return Err(PolicyValidationError(format!(
            "threat_bands must start at 0, got {}",
            first.lower_kg
        )));
    }
    for (idx, band) in bands.iter().enumerate() {
        let is_last = idx + 1 == bands.len();
        match (band.upper_kg, is_last) {
            (None, true) => {}
            (None, false) => {
                return Err(PolicyValidationError(format!(
                    "threat_bands[{idx}] is unbounded but not last"
                )));
            }
            (Some(_), true) => {
                return Err(PolicyValidationError(
                    "last threat band must be unbounded".to_string(),
                ));
            }
            (Some(upper), false) => {
                if !upper.is_finite() || upper <= band.lower_kg {
                    return Err(PolicyValidationError(format!(
                        "threat_bands[{idx}] upper bound must exceed lower bound"
                    )));
                }
                let next = &bands[idx + 1];
                if next.lower_kg != upper {
                    return Err(PolicyValidationError(format!(
                        "threat_bands[{idx}] and threat_bands[{}] leave a gap or overlap",
                        idx + 1
                    )));
                }
                if next.level <= band.level {
                    return Err(PolicyValidationError(format!(
                        "threat_bands[{}] severity must increase",
                        idx + 1
                    )));
                }
            }
        }
    }
    Ok(())
}

pub fn canonical_policy_json(policy: &CarbonPolicy) -> Result<String, PolicyValidationError> {
    let value = serde_json::to_value(policy)
        .map_err(|e| PolicyValidationError(format!("encode policy failed: {e}")))?;
    serde_json::to_string_pretty(&normalize_json(value))
        .map_err(|e| PolicyValidationError(format!("print policy failed: {e}")))
}

fn normalize_json(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, normalize_json(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_json).collect()),
        other => other,
    }
}
