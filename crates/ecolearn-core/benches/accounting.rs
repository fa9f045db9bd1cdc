// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecolearn_core::{normalize_activity_value, AccountingEngine};
use ecolearn_model::{ActivityRecord, TransportMode};
use serde_json::json;

fn bench_analyze(c: &mut Criterion) {
    let engine = AccountingEngine::default();
    let record = ActivityRecord {
        transport_mode: Some(TransportMode::PetrolCar),
        distance_km: 18.0,
        meat_meal_count: 1,
        veg_meal_count: 2,
        electricity_kwh: 6.5,
        lpg_kg: 0.3,
        waste_kg: 0.4,
        ..ActivityRecord::default()
    };
    c.bench_function("analyze_record", |b| b.iter(|| engine.analyze(black_box(&record))));

    let body = json!({"mode": "bus", "distance_km": "12.5", "veg_meals": 2, "electricity_kwh": 3});
    c.bench_function("normalize_and_analyze", |b| {
        b.iter(|| {
            let record = normalize_activity_value(black_box(&body)).unwrap_or_default();
            engine.analyze(&record)
        })
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
