// SPDX-License-Identifier: Apache-2.0

use crate::http::response_contract::api_error_response;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use ecolearn_api::{ApiError, ApiErrorCode};
use serde_json::json;
use tracing::warn;

pub(crate) async fn request_timeout_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.api.request_timeout;
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "request deadline exceeded");
            api_error_response(ApiError::new(
                ApiErrorCode::UpstreamFailure,
                "request timed out",
                json!({"timeout_ms": limit.as_millis() as u64}),
            ))
        }
    }
}
