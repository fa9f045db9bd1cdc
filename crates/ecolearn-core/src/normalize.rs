// SPDX-License-Identifier: Apache-2.0

use ecolearn_model::{ActivityField, ActivityRecord, TransportMode, ValidationError};
use serde_json::{Map, Value};

/// Accepts an object (or `null`, meaning no fields) and normalizes it.
pub fn normalize_activity_value(value: &Value) -> Result<ActivityRecord, ValidationError> {
    match value {
        Value::Object(fields) => normalize_activity(fields),
        Value::Null => Ok(ActivityRecord::default()),
        _ => Err(ValidationError::new("body", "expected a JSON object")),
    }
}

/// Builds an [`ActivityRecord`] from loosely typed fields.
///
/// Unknown keys are ignored and `null` counts as absent. When a wire name and
/// its alias are both present the wire name wins.
pub fn normalize_activity(fields: &Map<String, Value>) -> Result<ActivityRecord, ValidationError> {
    let mut record = ActivityRecord::default();
    for field in ActivityField::ALL {
        let value = fields
            .get(field.wire_name())
            .or_else(|| field.alias().and_then(|alias| fields.get(alias)));
        let Some(value) = value.filter(|value| !value.is_null()) else {
            continue;
        };
        let name = field.wire_name();
        match field {
            ActivityField::Mode => record.transport_mode = Some(coerce_mode(name, value)?),
            ActivityField::DistanceKm => record.distance_km = coerce_real(name, value)?,
            ActivityField::MeatMeals => record.meat_meal_count = coerce_count(name, value)?,
            ActivityField::VegMeals => record.veg_meal_count = coerce_count(name, value)?,
            ActivityField::ElectricityKwh => record.electricity_kwh = coerce_quantity(name, value)?,
            ActivityField::LpgKg => record.lpg_kg = coerce_quantity(name, value)?,
            ActivityField::WasteKg => record.waste_kg = coerce_quantity(name, value)?,
            ActivityField::Period => record.period_label = coerce_text(name, value)?,
        }
    }
    Ok(record)
}

fn coerce_mode(name: &str, value: &Value) -> Result<TransportMode, ValidationError> {
    value
        .as_str()
        .and_then(TransportMode::parse)
        .ok_or_else(|| {
            let allowed: Vec<&str> = TransportMode::ALL.iter().map(|m| m.as_str()).collect();
            ValidationError::new(name, format!("expected one of {}", allowed.join(", ")))
        })
}

fn coerce_real(name: &str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::new(name, "expected a finite number"))
}

fn coerce_quantity(name: &str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = coerce_real(name, value)?;
    if parsed < 0.0 {
        return Err(ValidationError::new(name, "must not be negative"));
    }
    Ok(parsed)
}

fn coerce_count(name: &str, value: &Value) -> Result<u32, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::new(name, "expected a whole number"))?;
    if parsed < 0.0 {
        return Err(ValidationError::new(name, "must not be negative"));
    }
    if !parsed.is_finite() || parsed.fract() != 0.0 || parsed > f64::from(u32::MAX) {
        return Err(ValidationError::new(name, "expected a whole number"));
    }
    Ok(parsed as u32)
}

fn coerce_text(name: &str, value: &Value) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::new(name, "expected a string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Result<ActivityRecord, ValidationError> {
        normalize_activity_value(&value)
    }

    #[test]
    fn numeric_strings_and_integral_floats_are_accepted() {
        let record = normalize(json!({
            "mode": "Petrol_Car",
            "distance_km": "3.5",
            "meat_meals": 1.0,
            "veg_meals": "2",
            "electricity_kwh": 2,
        }))
        .expect("valid");
        assert_eq!(record.transport_mode, Some(TransportMode::PetrolCar));
        assert_eq!(record.distance_km, 3.5);
        assert_eq!(record.meat_meal_count, 1);
        assert_eq!(record.veg_meal_count, 2);
        assert_eq!(record.electricity_kwh, 2.0);
        assert_eq!(record.period_label, "day");
    }

    #[test]
    fn nulls_and_unknown_keys_are_ignored() {
        let record = normalize(json!({"mode": null, "speed": 90, "period": null})).expect("valid");
        assert_eq!(record, ActivityRecord::default());
    }

    #[test]
    fn aliases_are_accepted_and_wire_names_win() {
        let record = normalize(json!({
            "transport_mode": "bus",
            "meat_meal_count": 2,
            "period_label": "week",
        }))
        .expect("valid");
        assert_eq!(record.transport_mode, Some(TransportMode::Bus));
        assert_eq!(record.meat_meal_count, 2);
        assert_eq!(record.period_label, "week");

        let both = normalize(json!({"mode": "walk_cycle", "transport_mode": "bus"})).expect("valid");
        assert_eq!(both.transport_mode, Some(TransportMode::WalkCycle));
    }

    #[test]
    fn rejections_name_the_field() {
        let cases = [
            (json!({"mode": "rocket"}), "mode"),
            (json!({"mode": 3}), "mode"),
            (json!({"distance_km": "far"}), "distance_km"),
            (json!({"distance_km": true}), "distance_km"),
            (json!({"meat_meals": 1.5}), "meat_meals"),
            (json!({"veg_meals": -1}), "veg_meals"),
            (json!({"electricity_kwh": -0.1}), "electricity_kwh"),
            (json!({"lpg_kg": [1]}), "lpg_kg"),
            (json!({"waste_kg": {"kg": 1}}), "waste_kg"),
            (json!({"period": 7}), "period"),
            (json!({"distance_km": "inf"}), "distance_km"),
        ];
        for (input, field) in cases {
            let err = normalize(input.clone()).expect_err(&input.to_string());
            assert_eq!(err.field, field, "{input}");
        }
    }

    #[test]
    fn negative_distance_is_kept_for_the_engine_to_clamp() {
        let record = normalize(json!({"distance_km": -4})).expect("valid");
        assert_eq!(record.distance_km, -4.0);
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert_eq!(normalize(Value::Null).expect("null"), ActivityRecord::default());
        assert_eq!(normalize(json!([1, 2])).expect_err("array").field, "body");
    }
}
