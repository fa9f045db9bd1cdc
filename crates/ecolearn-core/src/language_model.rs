// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use ecolearn_model::Language;
use serde_json::{json, Map, Value};

use crate::collaborator::{ChatCompletion, ChatMessage, ChatRequest, CollaboratorError};
use crate::extraction::{restrict_to_activity_fields, ActivityExtractor};
use crate::feedback::{Feedback, FeedbackRequest, FeedbackSynthesizer};

const EXTRACTION_PROMPT: &str = "Extract daily activity quantities from the user's note. \
Reply with one JSON object using only these keys: \
mode (one of petrol_car, bus, walk_cycle, electric_car), distance_km, meat_meals, veg_meals, \
electricity_kwh, lpg_kg, waste_kg, period. Omit anything the note does not state.";

pub const DEFAULT_MISSION_CATEGORIES: [&str; 4] = ["transport", "energy", "waste", "food"];
pub const DEFAULT_MISSION_DIFFICULTY: &str = "easy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionGenerationRequest {
    pub count: u32,
    pub categories: Vec<String>,
    pub difficulty: String,
}

impl Default for MissionGenerationRequest {
    fn default() -> Self {
        Self {
            count: 5,
            categories: DEFAULT_MISSION_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
            difficulty: DEFAULT_MISSION_DIFFICULTY.to_string(),
        }
    }
}

/// Prompts and output parsing over a [`ChatCompletion`] backend.
#[derive(Clone)]
pub struct LanguageModel {
    chat: Arc<dyn ChatCompletion>,
}

impl LanguageModel {
    #[must_use]
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    #[must_use]
    pub fn chat(&self) -> &Arc<dyn ChatCompletion> {
        &self.chat
    }

    async fn complete_json(&self, messages: Vec<ChatMessage>) -> Result<Value, CollaboratorError> {
        let reply = self
            .chat
            .complete(ChatRequest {
                messages,
                json_object: true,
                temperature: Some(0.2),
                ..ChatRequest::default()
            })
            .await?;
        let content = reply
            .content
            .ok_or_else(|| CollaboratorError::MalformedOutput("reply has no content".to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| CollaboratorError::MalformedOutput(format!("reply is not JSON: {e}")))
    }

    /// Plain-language tutoring answer.
    pub async fn explain(&self, question: &str, language: Language) -> Result<String, CollaboratorError> {
        let system = format!(
            "You are a friendly climate tutor for students in India. Answer in {}. \
             Keep it short, concrete and locally relevant.",
            language.display_name()
        );
        let reply = self
            .chat
            .complete(ChatRequest {
                messages: vec![ChatMessage::system(system), ChatMessage::user(question)],
                temperature: Some(0.3),
                ..ChatRequest::default()
            })
            .await?;
        reply
            .content
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .ok_or_else(|| CollaboratorError::MalformedOutput("empty answer".to_string()))
    }

    /// Returns the raw `missions` array the model produced.
    pub async fn generate_missions(
        &self,
        request: &MissionGenerationRequest,
        language: Language,
    ) -> Result<Vec<Value>, CollaboratorError> {
        let system = format!(
            "You design short eco missions for students in India. Write titles in {}. \
             Reply with a JSON object {{\"missions\": [...]}} where each mission has \
             id, title, category, points and co2_saving_kg.",
            language.display_name()
        );
        let user = format!(
            "Create {} {} missions across these categories: {}.",
            request.count,
            request.difficulty,
            request.categories.join(", ")
        );
        let value = self
            .complete_json(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .await?;
        match value {
            Value::Object(mut object) => match object.remove("missions") {
                Some(Value::Array(missions)) => Ok(missions),
                _ => Err(CollaboratorError::MalformedOutput(
                    "reply has no missions array".to_string(),
                )),
            },
            _ => Err(CollaboratorError::MalformedOutput(
                "reply is not a JSON object".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ActivityExtractor for LanguageModel {
    async fn extract(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Map<String, Value>, CollaboratorError> {
        let system = format!(
            "{EXTRACTION_PROMPT} The note may be written in {}.",
            language.display_name()
        );
        let value = self
            .complete_json(vec![ChatMessage::system(system), ChatMessage::user(text)])
            .await?;
        restrict_to_activity_fields(value)
    }
}

#[async_trait]
impl FeedbackSynthesizer for LanguageModel {
    async fn synthesize(&self, request: &FeedbackRequest<'_>) -> Result<Feedback, CollaboratorError> {
        let system = format!(
            "You are a supportive eco coach. Write in {}. Reply with a JSON object \
             {{\"feedback\": string, \"tips\": [string]}}: one short encouraging sentence \
             and one to three short actionable tips. Never mention specific carbon numbers \
             or units. Keep every string under 28 words.",
            request.language.display_name()
        );
        let context = json!({
            "activity": request.text,
            "factors": request.factors,
            "threat": request.analysis.threat,
            "period": request.analysis.period,
        });
        let value = self
            .complete_json(vec![
                ChatMessage::system(system),
                ChatMessage::user(context.to_string()),
            ])
            .await?;
        let feedback = value
            .get("feedback")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let tips = value
            .get("tips")
            .and_then(Value::as_array)
            .map(|tips| {
                tips.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Feedback { feedback, tips })
    }
}
