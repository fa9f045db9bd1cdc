// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use ecolearn_model::{ActivityField, Language};
use serde_json::{Map, Value};

use crate::collaborator::CollaboratorError;

/// Turns free text into loosely typed activity fields.
///
/// Output is untrusted: callers run it through the activity normalizer.
#[async_trait]
pub trait ActivityExtractor: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Map<String, Value>, CollaboratorError>;
}

/// Keeps only recognized activity keys (wire names or aliases) with non-null values.
///
/// Anything other than a JSON object is malformed output.
pub fn restrict_to_activity_fields(value: Value) -> Result<Map<String, Value>, CollaboratorError> {
    let Value::Object(fields) = value else {
        return Err(CollaboratorError::MalformedOutput(
            "extraction output is not a JSON object".to_string(),
        ));
    };
    Ok(fields
        .into_iter()
        .filter(|(key, value)| ActivityField::from_key(key).is_some() && !value.is_null())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_and_null_keys_are_dropped() {
        let fields = restrict_to_activity_fields(json!({
            "mode": "bus",
            "meat_meal_count": 2,
            "lpg_kg": null,
            "mood": "great",
        }))
        .expect("object");
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["meat_meal_count", "mode"]);
    }

    #[test]
    fn non_objects_are_malformed() {
        for value in [json!([]), json!("bus"), json!(3), Value::Null] {
            assert!(matches!(
                restrict_to_activity_fields(value),
                Err(CollaboratorError::MalformedOutput(_))
            ));
        }
    }
}
