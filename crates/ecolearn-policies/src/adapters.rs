// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::CarbonPolicy;
use crate::validate::{validate_policy, PolicyValidationError};

const POLICY_CONFIG_PATH: &str = "configs/policy/carbon-policy.json";

#[must_use]
pub fn policy_config_path(root: &Path) -> PathBuf {
    root.join(POLICY_CONFIG_PATH)
}

pub fn parse_policy_json(raw: &str) -> Result<CarbonPolicy, PolicyValidationError> {
    let policy: CarbonPolicy = serde_json::from_str(raw)
        .map_err(|e| PolicyValidationError(format!("decode policy failed: {e}")))?;
    validate_policy(&policy)?;
    Ok(policy)
}

pub fn load_policy_from_path(path: &Path) -> Result<CarbonPolicy, PolicyValidationError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        PolicyValidationError(format!("read policy {} failed: {e}", path.display()))
    })?;
    parse_policy_json(&raw)
}

pub fn load_policy_from_workspace(root: &Path) -> Result<CarbonPolicy, PolicyValidationError> {
    load_policy_from_path(&policy_config_path(root))
}
