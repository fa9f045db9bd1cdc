// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use ecolearn_core::agent::{Agent, AgentToolbox};
use ecolearn_core::{
    AccountingEngine, ChatCompletion, LanguageModel, LogAnalyzer, TemperatureSeriesSource,
};
use ecolearn_policies::CarbonPolicy;

use crate::config::ApiConfig;
use crate::http::handlers;
use crate::middleware::cors::cors_middleware;
use crate::middleware::request_timeout::request_timeout_middleware;
use crate::middleware::request_tracing::request_tracing_middleware;

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiConfig>,
    pub engine: Arc<AccountingEngine>,
    pub language_model: Arc<LanguageModel>,
    pub log_analyzer: LogAnalyzer,
    pub agent: Agent,
    pub climate: Arc<dyn TemperatureSeriesSource>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        api: ApiConfig,
        policy: Arc<CarbonPolicy>,
        chat: Arc<dyn ChatCompletion>,
        climate: Arc<dyn TemperatureSeriesSource>,
    ) -> Self {
        let engine = Arc::new(AccountingEngine::new(policy));
        let language_model = Arc::new(LanguageModel::new(chat.clone()));
        let log_analyzer = LogAnalyzer::new(
            engine.clone(),
            language_model.clone(),
            language_model.clone(),
            api.collaborator_timeout,
        );
        let agent = Agent::new(
            chat,
            AgentToolbox::new(engine.clone(), climate.clone()),
            api.collaborator_timeout,
        );
        Self {
            api: Arc::new(api),
            engine,
            language_model,
            log_analyzer,
            agent,
            climate,
            request_id_seed: Arc::new(AtomicU64::new(0)),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new(
            ApiConfig::default(),
            Arc::new(CarbonPolicy::default()),
            Arc::new(ecolearn_core::UnconfiguredChat),
            Arc::new(ecolearn_core::FileSeriesSource::default()),
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.api.max_body_bytes;
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/v1/version", get(handlers::version_handler))
        .route("/v1/openapi.json", get(handlers::openapi_handler))
        .route("/missions", get(handlers::missions_handler))
        .route("/missions/generate", post(handlers::missions_generate_handler))
        .route("/points/calc", post(handlers::points_calc_handler))
        .route("/analyze", post(handlers::analyze_handler))
        .route("/logs/analyze", post(handlers::logs_analyze_handler))
        .route("/explain", post(handlers::explain_handler))
        .route("/data/india/temp", get(handlers::india_temp_handler))
        .route("/agent", post(handlers::agent_handler))
        .layer(from_fn_with_state(state.clone(), request_timeout_middleware))
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(from_fn_with_state(state.clone(), request_tracing_middleware))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
