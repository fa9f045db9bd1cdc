#![forbid(unsafe_code)]

mod adapters;
mod env;
mod limits;
mod schema;
mod validate;

pub use adapters::{
    load_policy_from_path, load_policy_from_workspace, parse_policy_json, policy_config_path,
};
pub use env::{
    apply_env_overrides, apply_process_env_overrides, ENV_EF_ELECTRICITY_KWH, ENV_EF_LPG_KG,
    ENV_EF_WASTE_KG,
};
pub use limits::{
    DEFAULT_ELECTRICITY_KG_PER_KWH, DEFAULT_LPG_KG_PER_KG, DEFAULT_WASTE_KG_PER_KG,
    LOG_TEXT_MAX_CHARS, LOG_TEXT_MIN_CHARS, MAX_TIPS, MAX_WORDS_PER_COACHING_STRING,
};
pub use schema::{CarbonPolicy, EmissionFactorTable, PolicySchemaVersion, ThreatBand, ThreatBandTable};
pub use validate::{
    canonical_policy_json, validate_emission_factors, validate_policy, validate_threat_bands,
    PolicyValidationError,
};

pub const CRATE_NAME: &str = "ecolearn-policies";
