#![forbid(unsafe_code)]

use ecolearn_core::{ChatCompletion, FileSeriesSource, UnconfiguredChat};
use ecolearn_policies::{
    apply_process_env_overrides, load_policy_from_path, validate_policy, CarbonPolicy,
};
use ecolearn_server::{
    build_router, validate_startup_config_contract, ApiConfig, AppState, LanguageModelConfig,
    OpenAiChatClient, RetryPolicy,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_list(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(ToString::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("ECOLEARN_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_policy() -> Result<CarbonPolicy, String> {
    let mut policy = match env_path("ECOLEARN_POLICY_PATH") {
        Some(path) => load_policy_from_path(&path)
            .map_err(|e| format!("policy load failed for {}: {e}", path.display()))?,
        None => CarbonPolicy::default(),
    };
    let applied = apply_process_env_overrides(&mut policy.emission_factors)
        .map_err(|e| format!("emission factor override rejected: {e}"))?;
    validate_policy(&policy).map_err(|e| format!("policy invalid: {e}"))?;
    if !applied.is_empty() {
        info!(overrides = ?applied, "emission factor overrides applied");
    }
    Ok(policy)
}

fn load_climate_source() -> Result<FileSeriesSource, String> {
    match env_path("ECOLEARN_CLIMATE_SERIES_PATH") {
        Some(path) => {
            let source = FileSeriesSource::load(&path)
                .map_err(|e| format!("climate series load failed for {}: {e}", path.display()))?;
            info!(path = %path.display(), entries = source.len(), "climate series loaded");
            Ok(source)
        }
        None => {
            warn!("ECOLEARN_CLIMATE_SERIES_PATH not set; temperature series endpoint will report not found");
            Ok(FileSeriesSource::default())
        }
    }
}

fn build_chat(
    llm: &LanguageModelConfig,
    timeout: Duration,
) -> Result<Arc<dyn ChatCompletion>, String> {
    match llm.api_key.clone().filter(|_| llm.is_configured()) {
        Some(key) => Ok(Arc::new(OpenAiChatClient::new(llm, key, timeout)?)),
        None => {
            warn!("OPENAI_API_KEY not set; language model features are disabled");
            Ok(Arc::new(UnconfiguredChat))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("ECOLEARN_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let api_defaults = ApiConfig::default();
    let api = ApiConfig {
        max_body_bytes: env_usize("ECOLEARN_MAX_BODY_BYTES", api_defaults.max_body_bytes),
        request_timeout: env_duration_ms("ECOLEARN_REQUEST_TIMEOUT_MS", 45_000),
        collaborator_timeout: env_duration_ms("ECOLEARN_COLLABORATOR_TIMEOUT_MS", 15_000),
        cors_allowed_origins: env_list("ECOLEARN_CORS_ALLOWED_ORIGINS")
            .unwrap_or(api_defaults.cors_allowed_origins),
    };
    let llm_defaults = LanguageModelConfig::default();
    let llm = LanguageModelConfig {
        api_key: env::var("OPENAI_API_KEY").ok(),
        base_url: env::var("ECOLEARN_LLM_BASE_URL").unwrap_or(llm_defaults.base_url),
        model: env::var("ECOLEARN_LLM_MODEL").unwrap_or(llm_defaults.model),
        retry: RetryPolicy {
            max_attempts: env_usize(
                "ECOLEARN_LLM_RETRY_ATTEMPTS",
                llm_defaults.retry.max_attempts,
            ),
            base_backoff_ms: env_u64(
                "ECOLEARN_LLM_RETRY_BASE_BACKOFF_MS",
                llm_defaults.retry.base_backoff_ms,
            ),
        },
    };
    validate_startup_config_contract(&api, &llm)?;

    let policy = Arc::new(load_policy()?);
    let climate = Arc::new(load_climate_source()?);
    let chat = build_chat(&llm, api.collaborator_timeout)?;
    info!(
        backend = chat.backend_tag(),
        model = %llm.model,
        max_body_bytes = api.max_body_bytes,
        "startup configuration accepted"
    );

    let state = AppState::new(api, policy, chat, climate);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed: {e}"))?;
    info!("ecolearn-server listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            let drain_ms = env_u64("ECOLEARN_SHUTDOWN_DRAIN_MS", 2000);
            info!(drain_ms, "shutdown signal received; draining");
            tokio::time::sleep(Duration::from_millis(drain_ms)).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
