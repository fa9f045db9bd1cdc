#![forbid(unsafe_code)]

pub mod dto;
pub mod error_mapping;
mod errors;
mod openapi;
pub mod params;

pub use errors::{ApiError, ApiErrorCode, ApiErrorEnvelope, API_ERROR_CODES};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "ecolearn-api";
