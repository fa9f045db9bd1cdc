// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use ecolearn_core::{classify_threat, normalize_activity_value, round2, AccountingEngine};
use ecolearn_model::{ActivityRecord, ThreatLevel, TransportMode};
use ecolearn_policies::{CarbonPolicy, ThreatBandTable};
use proptest::prelude::*;
use serde_json::json;

fn mode_strategy() -> impl Strategy<Value = Option<TransportMode>> {
    prop_oneof![
        Just(None),
        Just(Some(TransportMode::PetrolCar)),
        Just(Some(TransportMode::Bus)),
        Just(Some(TransportMode::WalkCycle)),
        Just(Some(TransportMode::ElectricCar)),
    ]
}

fn record_strategy() -> impl Strategy<Value = ActivityRecord> {
    (
        mode_strategy(),
        -100.0f64..500.0,
        0u32..10,
        0u32..10,
        0.0f64..100.0,
        0.0f64..20.0,
        0.0f64..20.0,
    )
        .prop_map(|(mode, distance, meat, veg, kwh, lpg, waste)| ActivityRecord {
            transport_mode: mode,
            distance_km: distance,
            meat_meal_count: meat,
            veg_meal_count: veg,
            electricity_kwh: kwh,
            lpg_kg: lpg,
            waste_kg: waste,
            ..ActivityRecord::default()
        })
}

#[test]
fn reference_day_matches_known_breakdown() {
    let record = normalize_activity_value(&json!({
        "mode": "petrol_car",
        "distance_km": 3,
        "meat_meals": 1,
        "veg_meals": 0,
        "electricity_kwh": 2,
        "lpg_kg": 0,
        "waste_kg": 0.2,
        "period": "day",
    }))
    .expect("valid record");
    let result = AccountingEngine::default().analyze(&record);
    assert_eq!(result.breakdown.transport_kg, 0.72);
    assert_eq!(result.breakdown.meals_kg, 2.5);
    assert_eq!(result.breakdown.electricity_kg, 1.64);
    assert_eq!(result.breakdown.lpg_kg, 0.0);
    assert_eq!(result.breakdown.waste_kg, 0.38);
    assert_eq!(result.total_kg, 5.24);
    assert_eq!(result.threat, ThreatLevel::Moderate);
    assert_eq!(result.period, "day");
}

#[test]
fn walking_far_with_no_other_activity_is_zero() {
    let record = ActivityRecord {
        transport_mode: Some(TransportMode::WalkCycle),
        distance_km: 100.0,
        ..ActivityRecord::default()
    };
    let result = AccountingEngine::default().analyze(&record);
    assert_eq!(result.total_kg, 0.0);
    assert_eq!(result.threat, ThreatLevel::Low);
}

#[test]
fn alternate_policy_changes_rates_without_touching_the_engine() {
    let mut policy = CarbonPolicy::default();
    policy.emission_factors.electricity_kg_per_kwh = 0.5;
    let engine = AccountingEngine::new(Arc::new(policy));
    let record = ActivityRecord {
        electricity_kwh: 10.0,
        ..ActivityRecord::default()
    };
    assert_eq!(engine.analyze(&record).breakdown.electricity_kg, 5.0);
    assert_eq!(engine.analyze(&record).threat, ThreatLevel::Moderate);
}

proptest! {
    #[test]
    fn categories_and_total_are_non_negative(record in record_strategy()) {
        let result = AccountingEngine::default().analyze(&record);
        for value in result.breakdown.values() {
            prop_assert!(value >= 0.0);
        }
        prop_assert!(result.total_kg >= 0.0);
    }

    #[test]
    fn total_stays_close_to_rounded_categories(record in record_strategy()) {
        let result = AccountingEngine::default().analyze(&record);
        let summed: f64 = result.breakdown.values().iter().sum();
        prop_assert!((result.total_kg - summed).abs() <= 0.031);
    }

    #[test]
    fn each_category_is_its_rounded_quantity_times_rate(record in record_strategy()) {
        let engine = AccountingEngine::default();
        let factors = &engine.policy().emission_factors;
        let result = engine.analyze(&record);
        let expected_transport = match record.transport_mode {
            None | Some(TransportMode::WalkCycle) => 0.0,
            mode => round2(record.distance_km.max(0.0) * factors.transport_rate(mode)),
        };
        prop_assert_eq!(result.breakdown.transport_kg, expected_transport);
        prop_assert_eq!(
            result.breakdown.meals_kg,
            round2(
                f64::from(record.meat_meal_count) * factors.meat_meal_kg
                    + f64::from(record.veg_meal_count) * factors.veg_meal_kg
            )
        );
        prop_assert_eq!(
            result.breakdown.electricity_kg,
            round2(record.electricity_kwh.max(0.0) * factors.electricity_kg_per_kwh)
        );
        prop_assert_eq!(result.breakdown.lpg_kg, round2(record.lpg_kg.max(0.0) * factors.lpg_kg_per_kg));
        prop_assert_eq!(
            result.breakdown.waste_kg,
            round2(record.waste_kg.max(0.0) * factors.waste_kg_per_kg)
        );
        prop_assert_eq!(result.total_kg, round2(engine.contributions(&record).total()));
    }

    #[test]
    fn analysis_is_deterministic(record in record_strategy()) {
        let engine = AccountingEngine::default();
        prop_assert_eq!(engine.analyze(&record), engine.analyze(&record));
    }

    #[test]
    fn threat_is_monotonic_in_total(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let bands = ThreatBandTable::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify_threat(low, &bands) <= classify_threat(high, &bands));
    }

    #[test]
    fn round2_is_idempotent(value in -1.0e6f64..1.0e6) {
        let once = round2(value);
        prop_assert_eq!(round2(once), once);
    }
}
