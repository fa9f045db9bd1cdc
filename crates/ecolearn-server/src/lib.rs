#![forbid(unsafe_code)]

mod chat_client;
mod config;
mod http;
mod middleware;
mod runtime;

pub use chat_client::OpenAiChatClient;
pub use config::{
    validate_startup_config_contract, ApiConfig, LanguageModelConfig, RetryPolicy,
    CONFIG_SCHEMA_VERSION, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL,
};
pub use runtime::{build_router, AppState};

pub const CRATE_NAME: &str = "ecolearn-server";
