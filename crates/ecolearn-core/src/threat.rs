// SPDX-License-Identifier: Apache-2.0

use ecolearn_model::ThreatLevel;
use ecolearn_policies::ThreatBandTable;

/// First band, in ascending order, whose half-open interval holds the total.
///
/// Negative and NaN totals are classified as zero.
#[must_use]
pub fn classify_threat(total_kg: f64, bands: &ThreatBandTable) -> ThreatLevel {
    let total = if total_kg.is_nan() || total_kg < 0.0 {
        0.0
    } else {
        total_kg
    };
    bands
        .bands
        .iter()
        .find(|band| band.contains(total))
        .or_else(|| bands.bands.last())
        .map_or(ThreatLevel::Low, |band| band.level)
}
