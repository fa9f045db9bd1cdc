// SPDX-License-Identifier: Apache-2.0

use ecolearn_api::error_mapping::{map_error, status_for, API_ERROR_SCHEMA_REF};
use ecolearn_api::{ApiError, ApiErrorCode, ApiErrorEnvelope, API_ERROR_CODES};
use ecolearn_core::{ClimateError, CollaboratorError};
use ecolearn_model::ValidationError;
use serde_json::json;

#[test]
fn every_code_maps_to_a_stable_status() {
    let statuses: Vec<u16> = API_ERROR_CODES.iter().map(|code| status_for(*code)).collect();
    assert_eq!(statuses, [400, 400, 400, 404, 413, 502, 500]);
    let mapping = map_error(&ApiError::internal("boom"));
    assert_eq!(mapping.status_code, 500);
    assert_eq!(mapping.schema_ref, API_ERROR_SCHEMA_REF);
}

#[test]
fn validation_errors_keep_the_field() {
    let err = ApiError::from(ValidationError::new("distance_km", "expected a finite number"));
    assert_eq!(err.code, ApiErrorCode::ValidationFailed);
    assert_eq!(err.details, json!({"field": "distance_km", "reason": "expected a finite number"}));
}

#[test]
fn climate_errors_map_to_not_found_with_context() {
    let err = ApiError::from(ClimateError::NoSeries {
        tried: "MIROC6/historical/tasmax".to_string(),
    });
    assert_eq!(map_error(&err).status_code, 404);
    assert_eq!(err.details["tried"], "MIROC6/historical/tasmax");

    let err = ApiError::from(ClimateError::NoYearsInRange {
        min_year: 1980,
        max_year: 2014,
        available_years_sample: vec![2050, 2051],
    });
    assert_eq!(err.code, ApiErrorCode::NotFound);
    assert_eq!(err.details["year_range"], json!([1980, 2014]));
    assert_eq!(err.details["available_years_sample"], json!([2050, 2051]));
}

#[test]
fn collaborator_failures_are_upstream_failures() {
    let err = ApiError::upstream(&CollaboratorError::Upstream {
        status: 429,
        message: "rate limited".to_string(),
    });
    assert_eq!(map_error(&err).status_code, 502);
    assert!(err.message.contains("429"));
}

#[test]
fn envelope_wire_shape_is_stable() {
    let envelope = ApiErrorEnvelope {
        error: ApiError::invalid_param("min_year", "abc", "expected an integer year"),
    };
    let wire = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(wire["error"]["code"], "InvalidQueryParameter");
    assert_eq!(wire["error"]["details"]["parameter"], "min_year");
    let back: ApiErrorEnvelope = serde_json::from_value(wire).expect("deserialize");
    assert_eq!(back, envelope);
}
