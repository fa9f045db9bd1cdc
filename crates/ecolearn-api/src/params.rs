// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use ecolearn_model::{ClimateScenario, TemperatureQuery, TemperatureVariable};

use crate::ApiError;

pub const TEMPERATURE_PARAMS: [&str; 5] = ["variable", "scenario", "model_hint", "min_year", "max_year"];

fn parse_year(query: &BTreeMap<String, String>, name: &str, default: i32) -> Result<i32, ApiError> {
    match query.get(name) {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ApiError::invalid_param(name, raw, "expected an integer year")),
        None => Ok(default),
    }
}

/// Parses `/data/india/temp` query parameters, applying defaults and range checks.
pub fn parse_temperature_params(query: &BTreeMap<String, String>) -> Result<TemperatureQuery, ApiError> {
    let defaults = TemperatureQuery::default();
    let variable = match query.get("variable") {
        Some(raw) => TemperatureVariable::parse(raw)
            .ok_or_else(|| ApiError::invalid_param("variable", raw, "expected tas or tasmax"))?,
        None => defaults.variable,
    };
    let scenario = match query.get("scenario") {
        Some(raw) => ClimateScenario::parse(raw).ok_or_else(|| {
            ApiError::invalid_param(
                "scenario",
                raw,
                "expected historical, ssp126, ssp245, ssp370 or ssp585",
            )
        })?,
        None => defaults.scenario,
    };
    let parsed = TemperatureQuery {
        variable,
        scenario,
        model_hint: query.get("model_hint").cloned().unwrap_or(defaults.model_hint),
        min_year: parse_year(query, "min_year", defaults.min_year)?,
        max_year: parse_year(query, "max_year", defaults.max_year)?,
    };
    parsed.validate().map_err(|err| {
        let value = query.get(&err.field).cloned().unwrap_or_default();
        ApiError::invalid_param(&err.field, &value, &err.reason)
    })?;
    Ok(parsed)
}
