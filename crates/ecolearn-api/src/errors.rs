// SPDX-License-Identifier: Apache-2.0

use ecolearn_core::{ClimateError, CollaboratorError};
use ecolearn_model::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidJson,
    ValidationFailed,
    InvalidQueryParameter,
    NotFound,
    PayloadTooLarge,
    UpstreamFailure,
    Internal,
}

pub const API_ERROR_CODES: [ApiErrorCode; 7] = [
    ApiErrorCode::InvalidJson,
    ApiErrorCode::ValidationFailed,
    ApiErrorCode::InvalidQueryParameter,
    ApiErrorCode::NotFound,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::UpstreamFailure,
    ApiErrorCode::Internal,
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidJson => "InvalidJson",
            Self::ValidationFailed => "ValidationFailed",
            Self::InvalidQueryParameter => "InvalidQueryParameter",
            Self::NotFound => "NotFound",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::UpstreamFailure => "UpstreamFailure",
            Self::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_json(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(
            ApiErrorCode::InvalidJson,
            "request body is not valid JSON",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn validation_failed(field: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("invalid field `{field}`: {reason}"),
            json!({"field": field, "reason": reason}),
        )
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"parameter": name, "value": value, "reason": reason}),
        )
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::new(ApiErrorCode::NotFound, message, details)
    }

    #[must_use]
    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            ApiErrorCode::PayloadTooLarge,
            "request body too large",
            json!({"limit_bytes": limit_bytes}),
        )
    }

    #[must_use]
    pub fn upstream(err: &CollaboratorError) -> Self {
        Self::new(
            ApiErrorCode::UpstreamFailure,
            err.to_string(),
            json!({"collaborator": "language_model"}),
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation_failed(&err.field, &err.reason)
    }
}

impl From<ClimateError> for ApiError {
    fn from(err: ClimateError) -> Self {
        let message = err.to_string();
        match err {
            ClimateError::NoSeries { tried } => Self::not_found(
                message,
                json!({
                    "tried": tried,
                    "hint": "check variable (tas/tasmax), model_hint (e.g. MIROC6) and scenario",
                }),
            ),
            ClimateError::NoYearsInRange {
                min_year,
                max_year,
                available_years_sample,
            } => Self::not_found(
                message,
                json!({
                    "year_range": [min_year, max_year],
                    "available_years_sample": available_years_sample,
                }),
            ),
            ClimateError::Source(_) => Self::new(
                ApiErrorCode::UpstreamFailure,
                message,
                json!({"collaborator": "climate_series"}),
            ),
        }
    }
}

/// Wire body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiErrorEnvelope>();
};
