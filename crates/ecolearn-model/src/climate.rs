// SPDX-License-Identifier: Apache-2.0

use crate::ValidationError;
use serde::{Deserialize, Serialize};

pub const YEAR_FLOOR: i32 = 1850;
pub const MIN_YEAR_CEILING: i32 = 2100;
pub const MAX_YEAR_CEILING: i32 = 2200;

const MODEL_HINT_MAX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

/// Rough India extent: lon 68–98E, lat 6–37N.
pub const INDIA_BBOX: BoundingBox = BoundingBox {
    lon_min: 68.0,
    lon_max: 98.0,
    lat_min: 6.0,
    lat_max: 37.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureVariable {
    /// Near-surface air temperature.
    Tas,
    /// Daily maximum near-surface air temperature.
    Tasmax,
}

impl TemperatureVariable {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tas => "tas",
            Self::Tasmax => "tasmax",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "tas" => Some(Self::Tas),
            "tasmax" => Some(Self::Tasmax),
            _ => None,
        }
    }

    #[must_use]
    pub const fn alternate(self) -> Self {
        match self {
            Self::Tas => Self::Tasmax,
            Self::Tasmax => Self::Tas,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateScenario {
    Historical,
    Ssp126,
    Ssp245,
    Ssp370,
    Ssp585,
}

impl ClimateScenario {
    pub const ALL: [Self; 5] = [
        Self::Historical,
        Self::Ssp126,
        Self::Ssp245,
        Self::Ssp370,
        Self::Ssp585,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Ssp126 => "ssp126",
            Self::Ssp245 => "ssp245",
            Self::Ssp370 => "ssp370",
            Self::Ssp585 => "ssp585",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureQuery {
    pub variable: TemperatureVariable,
    pub scenario: ClimateScenario,
    pub model_hint: String,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for TemperatureQuery {
    fn default() -> Self {
        Self {
            variable: TemperatureVariable::Tasmax,
            scenario: ClimateScenario::Historical,
            model_hint: "MIROC6".to_string(),
            min_year: 1980,
            max_year: 2014,
        }
    }
}

impl TemperatureQuery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let hint = self.model_hint.as_str();
        if hint.is_empty() || hint.len() > MODEL_HINT_MAX_LEN {
            return Err(ValidationError::new(
                "model_hint",
                format!("must be 1..={MODEL_HINT_MAX_LEN} characters"),
            ));
        }
        if !hint
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(ValidationError::new(
                "model_hint",
                "only ASCII letters, digits, '_' and '-' are allowed",
            ));
        }
        if !(YEAR_FLOOR..=MIN_YEAR_CEILING).contains(&self.min_year) {
            return Err(ValidationError::new(
                "min_year",
                format!("must be within {YEAR_FLOOR}..={MIN_YEAR_CEILING}"),
            ));
        }
        if !(YEAR_FLOOR..=MAX_YEAR_CEILING).contains(&self.max_year) {
            return Err(ValidationError::new(
                "max_year",
                format!("must be within {YEAR_FLOOR}..={MAX_YEAR_CEILING}"),
            ));
        }
        if self.min_year > self.max_year {
            return Err(ValidationError::new(
                "min_year",
                "must not be greater than max_year",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YearTemperature {
    pub year: i32,
    pub t_mean_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureSeries {
    pub variable: TemperatureVariable,
    pub scenario: ClimateScenario,
    pub model: String,
    pub bbox: BoundingBox,
    pub units: String,
    pub series: Vec<YearTemperature>,
    pub files_used: usize,
}
