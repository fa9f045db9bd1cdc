// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use ecolearn_api::params::parse_temperature_params;
use ecolearn_api::ApiErrorCode;
use ecolearn_model::{ClimateScenario, TemperatureQuery, TemperatureVariable};

fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn empty_query_uses_defaults() {
    let parsed = parse_temperature_params(&BTreeMap::new()).expect("defaults");
    assert_eq!(parsed, TemperatureQuery::default());
}

#[test]
fn all_parameters_parse() {
    let parsed = parse_temperature_params(&query(&[
        ("variable", "tas"),
        ("scenario", "ssp585"),
        ("model_hint", "ACCESS-CM2"),
        ("min_year", "2030"),
        ("max_year", "2100"),
    ]))
    .expect("params parse");
    assert_eq!(parsed.variable, TemperatureVariable::Tas);
    assert_eq!(parsed.scenario, ClimateScenario::Ssp585);
    assert_eq!(parsed.model_hint, "ACCESS-CM2");
    assert_eq!((parsed.min_year, parsed.max_year), (2030, 2100));
}

#[test]
fn invalid_parameters_are_named() {
    let cases: [(&[(&str, &str)], &str); 8] = [
        (&[("variable", "pr")], "variable"),
        (&[("scenario", "ssp999")], "scenario"),
        (&[("model_hint", "../etc")], "model_hint"),
        (&[("model_hint", "")], "model_hint"),
        (&[("min_year", "1849")], "min_year"),
        (&[("min_year", "abc")], "min_year"),
        (&[("max_year", "2201")], "max_year"),
        (&[("min_year", "2000"), ("max_year", "1990")], "min_year"),
    ];
    for (pairs, parameter) in cases {
        let err = parse_temperature_params(&query(pairs)).expect_err(parameter);
        assert_eq!(err.code, ApiErrorCode::InvalidQueryParameter);
        assert_eq!(err.details["parameter"], parameter, "{pairs:?}");
    }
}

#[test]
fn max_year_may_exceed_min_year_ceiling() {
    let parsed = parse_temperature_params(&query(&[("min_year", "2100"), ("max_year", "2200")]))
        .expect("valid");
    assert_eq!(parsed.max_year, 2200);
}
