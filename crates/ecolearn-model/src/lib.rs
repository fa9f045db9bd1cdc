#![forbid(unsafe_code)]
//! Wire and domain types shared by every ecolearn crate.

mod activity;
mod analysis;
mod climate;
mod language;
mod mission;

pub use activity::{ActivityField, ActivityRecord, TransportMode, ValidationError, DEFAULT_PERIOD};
pub use analysis::{AnalysisResult, Breakdown, ThreatLevel};
pub use climate::{
    BoundingBox, ClimateScenario, TemperatureQuery, TemperatureSeries, TemperatureVariable,
    YearTemperature, INDIA_BBOX, MAX_YEAR_CEILING, MIN_YEAR_CEILING, YEAR_FLOOR,
};
pub use language::{Language, SUPPORTED_LANGUAGES};
pub use mission::{Mission, PointsAward};

pub const CRATE_NAME: &str = "ecolearn-model";
