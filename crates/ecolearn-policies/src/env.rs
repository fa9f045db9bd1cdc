// SPDX-License-Identifier: Apache-2.0

use crate::schema::EmissionFactorTable;
use crate::validate::PolicyValidationError;

pub const ENV_EF_ELECTRICITY_KWH: &str = "EF_ELECTRICITY_KWH";
pub const ENV_EF_LPG_KG: &str = "EF_LPG_KG";
pub const ENV_EF_WASTE_KG: &str = "EF_WASTE_KG";

/// Applies the environment-configurable rates. Blank values are ignored; a
/// value that is not a finite positive number is an error.
///
/// Returns the names of the variables that were applied.
pub fn apply_env_overrides<F>(
    table: &mut EmissionFactorTable,
    lookup: F,
) -> Result<Vec<&'static str>, PolicyValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    let targets: [(&'static str, &mut f64); 3] = [
        (ENV_EF_ELECTRICITY_KWH, &mut table.electricity_kg_per_kwh),
        (ENV_EF_LPG_KG, &mut table.lpg_kg_per_kg),
        (ENV_EF_WASTE_KG, &mut table.waste_kg_per_kg),
    ];
    for (name, slot) in targets {
        let Some(raw) = lookup(name) else {
            continue;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let rate = trimmed
            .parse::<f64>()
            .map_err(|e| PolicyValidationError(format!("{name}={trimmed:?} is not a number: {e}")))?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PolicyValidationError(format!(
                "{name} must be a finite positive number, got {trimmed}"
            )));
        }
        *slot = rate;
        applied.push(name);
    }
    Ok(applied)
}

pub fn apply_process_env_overrides(
    table: &mut EmissionFactorTable,
) -> Result<Vec<&'static str>, PolicyValidationError> {
    apply_env_overrides(table, |name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn overrides_replace_configurable_rates() {
        let mut table = EmissionFactorTable::default();
        let applied = apply_env_overrides(
            &mut table,
            lookup(&[(ENV_EF_ELECTRICITY_KWH, "0.7"), (ENV_EF_WASTE_KG, " 2.5 ")]),
        )
        .expect("overrides");
        assert_eq!(applied, vec![ENV_EF_ELECTRICITY_KWH, ENV_EF_WASTE_KG]);
        assert_eq!(table.electricity_kg_per_kwh, 0.7);
        assert_eq!(table.lpg_kg_per_kg, 2.98);
        assert_eq!(table.waste_kg_per_kg, 2.5);
    }

    #[test]
    fn blank_override_keeps_default() {
        let mut table = EmissionFactorTable::default();
        let applied =
            apply_env_overrides(&mut table, lookup(&[(ENV_EF_LPG_KG, "  ")])).expect("blank");
        assert!(applied.is_empty());
        assert_eq!(table.lpg_kg_per_kg, 2.98);
    }

    #[test]
    fn unparseable_override_is_an_error() {
        let mut table = EmissionFactorTable::default();
        let err = apply_env_overrides(&mut table, lookup(&[(ENV_EF_LPG_KG, "lots")]))
            .expect_err("bad number");
        assert!(err.0.contains(ENV_EF_LPG_KG));
    }

    #[test]
    fn negative_override_is_an_error() {
        let mut table = EmissionFactorTable::default();
        assert!(apply_env_overrides(&mut table, lookup(&[(ENV_EF_WASTE_KG, "-1")])).is_err());
    }
}
