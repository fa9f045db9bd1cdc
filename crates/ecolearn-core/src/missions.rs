// SPDX-License-Identifier: Apache-2.0

use ecolearn_model::{Mission, PointsAward};

const CATALOG: [(&str, &str, u32, f64); 5] = [
    ("m_walk", "Walk instead of short car trip", 40, 0.15),
    ("m_trans", "Use public transport today", 60, 0.5),
    ("m_veg", "Eat a vegetarian meal", 20, 2.0),
    ("m_bag", "Carry a reusable bag", 15, 0.05),
    ("m_idle", "Turn off idle appliances", 25, 0.1),
];

/// Static missions in catalog order.
#[must_use]
pub fn mission_catalog() -> Vec<Mission> {
    CATALOG
        .iter()
        .map(|(id, title, points, co2_saving_kg)| Mission {
            id: (*id).to_string(),
            title: (*title).to_string(),
            points: *points,
            co2_saving_kg: *co2_saving_kg,
        })
        .collect()
}

/// Awards points for each known id, counting repeats, in input order.
#[must_use]
pub fn points_calc<S: AsRef<str>>(completed: &[S]) -> PointsAward {
    let mut award = PointsAward {
        awarded_points: 0,
        accepted: Vec::new(),
        invalid: Vec::new(),
    };
    for id in completed {
        let id = id.as_ref();
        match CATALOG.iter().find(|(known, ..)| *known == id) {
            Some((_, _, points, _)) => {
                award.awarded_points = award.awarded_points.saturating_add(*points);
                award.accepted.push(id.to_string());
            }
            None => award.invalid.push(id.to_string()),
        }
    }
    award
}
