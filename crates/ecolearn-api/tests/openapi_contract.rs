// SPDX-License-Identifier: Apache-2.0

use ecolearn_api::{openapi_v1_spec, API_ERROR_CODES};
use regex::Regex;

const DOCUMENTED_PATHS: [&str; 11] = [
    "/healthz",
    "/v1/version",
    "/v1/openapi.json",
    "/missions",
    "/missions/generate",
    "/points/calc",
    "/analyze",
    "/logs/analyze",
    "/explain",
    "/data/india/temp",
    "/agent",
];

#[test]
fn every_endpoint_is_documented() {
    let spec = openapi_v1_spec();
    let paths = spec["paths"].as_object().expect("paths object");
    let mut documented: Vec<&str> = paths.keys().map(String::as_str).collect();
    documented.sort_unstable();
    let mut expected = DOCUMENTED_PATHS.to_vec();
    expected.sort_unstable();
    assert_eq!(documented, expected);
}

#[test]
fn paths_are_lowercase_slugs() {
    let shape = Regex::new(r"^/[a-z0-9_./]*$").expect("regex");
    for path in DOCUMENTED_PATHS {
        assert!(shape.is_match(path), "{path}");
    }
}

#[test]
fn error_code_enum_matches_the_code_list() {
    let spec = openapi_v1_spec();
    let codes: Vec<String> = spec["components"]["schemas"]["ApiErrorCode"]["enum"]
        .as_array()
        .expect("enum")
        .iter()
        .filter_map(|code| code.as_str().map(str::to_string))
        .collect();
    let expected: Vec<String> = API_ERROR_CODES.iter().map(|c| c.as_str().to_string()).collect();
    assert_eq!(codes, expected);
}

#[test]
fn error_responses_reference_the_envelope() {
    let spec = openapi_v1_spec();
    let reference = &spec["paths"]["/data/india/temp"]["get"]["responses"]["404"]["content"]
        ["application/json"]["schema"]["$ref"];
    assert_eq!(reference, "#/components/schemas/ApiErrorEnvelope");
}
