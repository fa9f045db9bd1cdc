// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use ecolearn_model::{
    ClimateScenario, TemperatureQuery, TemperatureSeries, TemperatureVariable, YearTemperature,
    INDIA_BBOX,
};
use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;
const AVAILABLE_YEARS_SAMPLE: usize = 10;
const CELSIUS: &str = "°C";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClimateError {
    #[error("no temperature series found for {tried}")]
    NoSeries { tried: String },
    #[error("no temperature data between {min_year} and {max_year}")]
    NoYearsInRange {
        min_year: i32,
        max_year: i32,
        available_years_sample: Vec<i32>,
    },
    #[error("climate source failed: {0}")]
    Source(String),
}

/// India-mean annual temperature series for a model/scenario/variable.
#[async_trait]
pub trait TemperatureSeriesSource: Send + Sync {
    fn source_tag(&self) -> &'static str;

    async fn fetch(&self, query: &TemperatureQuery) -> Result<TemperatureSeries, ClimateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One pre-aggregated annual series as stored in the catalogue file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesEntry {
    pub model: String,
    pub scenario: ClimateScenario,
    pub variable: TemperatureVariable,
    pub units: String,
    pub series: Vec<SeriesPoint>,
}

impl SeriesEntry {
    fn is_kelvin(&self) -> bool {
        self.units.trim().to_ascii_lowercase().starts_with('k')
    }
}

/// Catalogue of annual series loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct FileSeriesSource {
    entries: Vec<SeriesEntry>,
}

impl FileSeriesSource {
    #[must_use]
    pub fn from_entries(entries: Vec<SeriesEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, ClimateError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ClimateError::Source(format!("read {} failed: {e}", path.display())))?;
        let entries = serde_json::from_str(&raw)
            .map_err(|e| ClimateError::Source(format!("parse {} failed: {e}", path.display())))?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, model: &str, scenario: ClimateScenario, variable: TemperatureVariable) -> Option<&SeriesEntry> {
        self.entries
            .iter()
            .find(|e| e.model == model && e.scenario == scenario && e.variable == variable)
    }
}

fn series_key(query: &TemperatureQuery) -> String {
    format!(
        "{}/{}/{}",
        query.model_hint,
        query.scenario.as_str(),
        query.variable.as_str()
    )
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[async_trait]
impl TemperatureSeriesSource for FileSeriesSource {
    fn source_tag(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, query: &TemperatureQuery) -> Result<TemperatureSeries, ClimateError> {
        let entry = self
            .find(&query.model_hint, query.scenario, query.variable)
            .or_else(|| self.find(&query.model_hint, query.scenario, query.variable.alternate()))
            .ok_or_else(|| ClimateError::NoSeries {
                tried: series_key(query),
            })?;

        let kelvin = entry.is_kelvin();
        let mut series: Vec<YearTemperature> = entry
            .series
            .iter()
            .filter(|point| (query.min_year..=query.max_year).contains(&point.year))
            .map(|point| YearTemperature {
                year: point.year,
                t_mean_c: round3(if kelvin {
                    point.value - KELVIN_OFFSET
                } else {
                    point.value
                }),
            })
            .collect();
        if series.is_empty() {
            let mut available: Vec<i32> = entry.series.iter().map(|p| p.year).collect();
            available.sort_unstable();
            available.dedup();
            available.truncate(AVAILABLE_YEARS_SAMPLE);
            return Err(ClimateError::NoYearsInRange {
                min_year: query.min_year,
                max_year: query.max_year,
                available_years_sample: available,
            });
        }
        series.sort_by_key(|point| point.year);

        Ok(TemperatureSeries {
            variable: entry.variable,
            scenario: entry.scenario,
            model: entry.model.clone(),
            bbox: INDIA_BBOX,
            units: CELSIUS.to_string(),
            files_used: series.len(),
            series,
        })
    }
}
