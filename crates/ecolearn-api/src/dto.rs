// SPDX-License-Identifier: Apache-2.0

//! Request and response bodies.
//!
//! Bodies are decoded in two steps so that syntax errors (`InvalidJson`) and
//! shape errors (`ValidationFailed`) stay distinguishable.

use ecolearn_core::agent::AgentRequest;
use ecolearn_core::{normalize_activity, MissionGenerationRequest, DEFAULT_MISSION_CATEGORIES, DEFAULT_MISSION_DIFFICULTY};
use ecolearn_model::{ActivityRecord, AnalysisResult, Language, Mission};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ApiError;

pub const MISSION_COUNT_MIN: u32 = 1;
pub const MISSION_COUNT_MAX: u32 = 20;
const DEFAULT_MISSION_COUNT: u32 = 5;

pub fn decode_value(bytes: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::invalid_json(e.to_string()))
}

pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let value = decode_value(bytes)?;
    if !value.is_object() {
        return Err(ApiError::validation_failed("body", "expected a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| ApiError::validation_failed("body", &e.to_string()))
}

fn non_blank(field: &str, value: String) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation_failed(field, "must not be empty"));
    }
    Ok(value)
}

/// Splits `lang` off an activity body and normalizes the rest.
pub fn decode_activity_body(bytes: &[u8]) -> Result<(Option<String>, ActivityRecord), ApiError> {
    let Value::Object(mut fields) = decode_value(bytes)? else {
        return Err(ApiError::validation_failed("body", "expected a JSON object"));
    };
    let lang = take_lang(&mut fields)?;
    Ok((lang, normalize_activity(&fields)?))
}

fn take_lang(fields: &mut Map<String, Value>) -> Result<Option<String>, ApiError> {
    let alias = fields.remove("language");
    match fields.remove("lang").or(alias) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(lang)) => Ok(Some(lang)),
        Some(_) => Err(ApiError::validation_failed("lang", "expected a string")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogAnalyzeRequest {
    pub text: String,
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExplainRequest {
    pub question: String,
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
}

impl ExplainRequest {
    pub fn question(self) -> Result<String, ApiError> {
        non_blank("question", self.question)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MissionGenerateRequest {
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
}

impl MissionGenerateRequest {
    /// Applies defaults; an empty category list or blank difficulty also falls back.
    pub fn to_generation(&self) -> Result<MissionGenerationRequest, ApiError> {
        let count = self.n.unwrap_or(DEFAULT_MISSION_COUNT);
        if !(MISSION_COUNT_MIN..=MISSION_COUNT_MAX).contains(&count) {
            return Err(ApiError::validation_failed(
                "n",
                &format!("must be within {MISSION_COUNT_MIN}..={MISSION_COUNT_MAX}"),
            ));
        }
        let categories = self
            .categories
            .clone()
            .filter(|categories| !categories.is_empty())
            .unwrap_or_else(|| DEFAULT_MISSION_CATEGORIES.iter().map(|c| (*c).to_string()).collect());
        let difficulty = self
            .difficulty
            .clone()
            .filter(|difficulty| !difficulty.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MISSION_DIFFICULTY.to_string());
        Ok(MissionGenerationRequest {
            count,
            categories,
            difficulty,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PointsCalcRequest {
    pub completed_missions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentRequestBody {
    pub task: String,
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
    #[serde(default)]
    pub emissions: Option<Value>,
    #[serde(default)]
    pub completed_missions: Option<Vec<String>>,
}

impl AgentRequestBody {
    /// Emissions go through the activity normalizer before reaching the agent.
    pub fn into_agent_request(self, language: Language) -> Result<AgentRequest, ApiError> {
        let task = non_blank("task", self.task)?;
        let emissions = match self.emissions {
            None | Some(Value::Null) => None,
            Some(Value::Object(fields)) => Some(normalize_activity(&fields)?),
            Some(_) => {
                return Err(ApiError::validation_failed("emissions", "expected a JSON object"));
            }
        };
        Ok(AgentRequest {
            task,
            language,
            emissions,
            completed_missions: self.completed_missions.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResponse {
    pub lang: Language,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainResponse {
    pub lang: Language,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionsResponse {
    pub missions: Vec<Mission>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMissionsResponse {
    pub lang: Language,
    pub missions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub api_contract_version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiErrorCode;

    #[test]
    fn syntax_and_shape_errors_are_distinct() {
        let err = decode_body::<ExplainRequest>(b"{not json").expect_err("syntax");
        assert_eq!(err.code, ApiErrorCode::InvalidJson);
        let err = decode_body::<ExplainRequest>(br#"{"lang":"en"}"#).expect_err("shape");
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);
        let err = decode_body::<ExplainRequest>(b"[1]").expect_err("array");
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);
    }

    #[test]
    fn activity_body_keeps_lang_out_of_the_record() {
        let (lang, record) =
            decode_activity_body(br#"{"lang":"hi","mode":"bus","distance_km":4}"#).expect("body");
        assert_eq!(lang.as_deref(), Some("hi"));
        assert_eq!(record.distance_km, 4.0);

        let (lang, _) = decode_activity_body(br#"{"language":"hi"}"#).expect("alias");
        assert_eq!(lang.as_deref(), Some("hi"));

        let err = decode_activity_body(br#"{"lang":5}"#).expect_err("lang type");
        assert_eq!(err.details["field"], "lang");
        let err = decode_activity_body(br#"{"meat_meals":1.5}"#).expect_err("fractional");
        assert_eq!(err.details["field"], "meat_meals");
    }

    #[test]
    fn mission_generation_defaults_and_bounds() {
        let request: MissionGenerateRequest = decode_body(b"{}").expect("empty body");
        let generation = request.to_generation().expect("defaults");
        assert_eq!(generation.count, 5);
        assert_eq!(generation.categories, DEFAULT_MISSION_CATEGORIES);
        assert_eq!(generation.difficulty, "easy");

        for n in [0, 21] {
            let request = MissionGenerateRequest {
                n: Some(n),
                categories: None,
                difficulty: None,
                lang: None,
            };
            assert_eq!(request.to_generation().expect_err("out of range").details["field"], "n");
        }
    }

    #[test]
    fn agent_emissions_are_normalized() {
        let body: AgentRequestBody =
            decode_body(br#"{"task":"help","emissions":{"mode":"bus","distance_km":"2"}}"#).expect("body");
        let request = body.into_agent_request(Language::En).expect("valid");
        assert_eq!(request.emissions.map(|e| e.distance_km), Some(2.0));

        let body: AgentRequestBody =
            decode_body(br#"{"task":"help","emissions":{"lpg_kg":-1}}"#).expect("body");
        let err = body.into_agent_request(Language::En).expect_err("negative");
        assert_eq!(err.details["field"], "lpg_kg");

        let body: AgentRequestBody = decode_body(br#"{"task":"  "}"#).expect("body");
        assert_eq!(body.into_agent_request(Language::En).expect_err("blank").details["field"], "task");
    }
}
