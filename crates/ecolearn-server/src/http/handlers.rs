// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use ecolearn_api::dto::{
    decode_activity_body, decode_body, AgentRequestBody, AnalyzeResponse, ExplainRequest,
    ExplainResponse, GeneratedMissionsResponse, LogAnalyzeRequest, MissionGenerateRequest,
    MissionsResponse, PointsCalcRequest, VersionResponse,
};
use ecolearn_api::params::parse_temperature_params;
use ecolearn_api::{openapi_v1_spec, ApiError};
use ecolearn_core::agent::AgentError;
use ecolearn_core::{
    mission_catalog, points_calc, resolve_language, with_timeout, CollaboratorError,
    LogAnalysisError,
};
use ecolearn_model::Language;
use tracing::{error, info};

use crate::http::response_contract::ApiFailure;
use crate::AppState;

type HandlerResult<T> = Result<T, ApiFailure>;

const API_CONTRACT_VERSION: &str = "v1";

fn request_bytes(state: &AppState, body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(state.api.max_body_bytes)
        } else {
            ApiError::invalid_json(rejection.body_text())
        }
    })
}

fn language_for(headers: &HeaderMap, explicit: Option<&str>) -> Language {
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    resolve_language(explicit, accept_language)
}

fn upstream_failure(route: &'static str, err: &CollaboratorError) -> ApiFailure {
    error!(route, error = %err, "language model call failed");
    ApiFailure(ApiError::upstream(err))
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api_contract_version: API_CONTRACT_VERSION,
    })
}

pub(crate) async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_v1_spec())
}

pub(crate) async fn missions_handler() -> Json<MissionsResponse> {
    Json(MissionsResponse {
        missions: mission_catalog(),
    })
}

pub(crate) async fn points_calc_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<impl IntoResponse> {
    let bytes = request_bytes(&state, body)?;
    let req: PointsCalcRequest = decode_body(&bytes)?;
    Ok(Json(points_calc(&req.completed_missions)))
}

pub(crate) async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<Json<AnalyzeResponse>> {
    let bytes = request_bytes(&state, body)?;
    let (lang, record) = decode_activity_body(&bytes)?;
    let lang = language_for(&headers, lang.as_deref());
    let result = state.engine.analyze(&record);
    info!(
        total_kg = result.total_kg,
        threat = result.threat.as_str(),
        "activity analysed"
    );
    Ok(Json(AnalyzeResponse { lang, result }))
}

pub(crate) async fn logs_analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<impl IntoResponse> {
    let bytes = request_bytes(&state, body)?;
    let req: LogAnalyzeRequest = decode_body(&bytes)?;
    let lang = language_for(&headers, req.lang.as_deref());
    let analysis = state
        .log_analyzer
        .analyze(&req.text, lang)
        .await
        .map_err(|err| match err {
            LogAnalysisError::Validation(err) => ApiFailure(err.into()),
        })?;
    Ok(Json(analysis))
}

pub(crate) async fn explain_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<Json<ExplainResponse>> {
    let bytes = request_bytes(&state, body)?;
    let req: ExplainRequest = decode_body(&bytes)?;
    let lang = language_for(&headers, req.lang.as_deref());
    let question = req.question()?;
    let answer = with_timeout(
        state.api.collaborator_timeout,
        state.language_model.explain(&question, lang),
    )
    .await
    .map_err(|err| upstream_failure("/explain", &err))?;
    Ok(Json(ExplainResponse { lang, answer }))
}

pub(crate) async fn missions_generate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<Json<GeneratedMissionsResponse>> {
    let bytes = request_bytes(&state, body)?;
    let req: MissionGenerateRequest = decode_body(&bytes)?;
    let lang = language_for(&headers, req.lang.as_deref());
    let generation = req.to_generation()?;
    let missions = with_timeout(
        state.api.collaborator_timeout,
        state.language_model.generate_missions(&generation, lang),
    )
    .await
    .map_err(|err| upstream_failure("/missions/generate", &err))?;
    Ok(Json(GeneratedMissionsResponse { lang, missions }))
}

pub(crate) async fn india_temp_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> HandlerResult<impl IntoResponse> {
    let query = parse_temperature_params(&params)?;
    let series = state.climate.fetch(&query).await.map_err(|err| {
        info!(source = state.climate.source_tag(), error = %err, "temperature series unavailable");
        ApiFailure(err.into())
    })?;
    Ok(Json(series))
}

pub(crate) async fn agent_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<impl IntoResponse> {
    let bytes = request_bytes(&state, body)?;
    let req: AgentRequestBody = decode_body(&bytes)?;
    let lang = language_for(&headers, req.lang.as_deref());
    let request = req.into_agent_request(lang)?;
    let reply = state.agent.run(&request).await.map_err(|err| match err {
        AgentError::Chat(err) => upstream_failure("/agent", &err),
    })?;
    Ok(Json(reply))
}
