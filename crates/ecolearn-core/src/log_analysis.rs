// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use ecolearn_model::{ActivityRecord, AnalysisResult, Language, ValidationError};
use ecolearn_policies::{LOG_TEXT_MAX_CHARS, LOG_TEXT_MIN_CHARS};
use serde::Serialize;
use tracing::{info, warn};

use crate::accounting::AccountingEngine;
use crate::collaborator::{with_timeout, CollaboratorError};
use crate::extraction::ActivityExtractor;
use crate::feedback::{fallback_feedback, screen_feedback, FeedbackRequest, FeedbackSynthesizer};
use crate::normalize::normalize_activity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationStage {
    Extraction,
    Feedback,
}

impl DegradationStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Feedback => "feedback",
        }
    }
}

/// A collaborator stage that fell back to its deterministic default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    pub stage: DegradationStage,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogAnalysis {
    pub lang: Language,
    pub factors: ActivityRecord,
    pub analysis: AnalysisResult,
    pub feedback: String,
    pub tips: Vec<String>,
    #[serde(skip)]
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogAnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Length is counted in Unicode scalar values of the untrimmed text.
pub fn validate_log_text(text: &str) -> Result<(), ValidationError> {
    let chars = text.chars().count();
    if !(LOG_TEXT_MIN_CHARS..=LOG_TEXT_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::new(
            "text",
            format!("must be {LOG_TEXT_MIN_CHARS}..={LOG_TEXT_MAX_CHARS} characters, got {chars}"),
        ));
    }
    Ok(())
}

/// Free-text path: extract, normalize, account, coach.
///
/// Only invalid input fails; every collaborator problem degrades to a fallback.
#[derive(Clone)]
pub struct LogAnalyzer {
    engine: Arc<AccountingEngine>,
    extractor: Arc<dyn ActivityExtractor>,
    synthesizer: Arc<dyn FeedbackSynthesizer>,
    collaborator_timeout: Duration,
}

impl LogAnalyzer {
    #[must_use]
    pub fn new(
        engine: Arc<AccountingEngine>,
        extractor: Arc<dyn ActivityExtractor>,
        synthesizer: Arc<dyn FeedbackSynthesizer>,
        collaborator_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            extractor,
            synthesizer,
            collaborator_timeout,
        }
    }

    pub async fn analyze(&self, text: &str, language: Language) -> Result<LogAnalysis, LogAnalysisError> {
        validate_log_text(text)?;
        let mut degradations = Vec::new();

        let extracted = with_timeout(self.collaborator_timeout, self.extractor.extract(text, language))
            .await
            .and_then(|fields| {
                normalize_activity(&fields)
                    .map_err(|e| CollaboratorError::MalformedOutput(e.to_string()))
            });
        let factors = match extracted {
            Ok(record) => record,
            Err(err) => {
                degrade(&mut degradations, DegradationStage::Extraction, &err);
                ActivityRecord::default()
            }
        };

        let analysis = self.engine.analyze(&factors);
        let request = FeedbackRequest {
            text,
            language,
            factors: &factors,
            analysis: &analysis,
        };
        let synthesized = with_timeout(self.collaborator_timeout, self.synthesizer.synthesize(&request))
            .await
            .and_then(|raw| screen_feedback(raw, &analysis));
        let (feedback, tips) = match synthesized {
            Ok(screened) if screened.tips.is_empty() => (screened.feedback, self.engine.default_tips()),
            Ok(screened) => (screened.feedback, screened.tips),
            Err(err) => {
                degrade(&mut degradations, DegradationStage::Feedback, &err);
                (fallback_feedback(text, language), self.engine.default_tips())
            }
        };

        info!(
            lang = language.as_str(),
            threat = analysis.threat.as_str(),
            degraded = degradations.len(),
            "log analysed"
        );
        Ok(LogAnalysis {
            lang: language,
            factors,
            analysis,
            feedback,
            tips,
            degradations,
        })
    }
}

fn degrade(degradations: &mut Vec<Degradation>, stage: DegradationStage, err: &CollaboratorError) {
    warn!(stage = stage.as_str(), error = %err, "collaborator degraded, using fallback");
    degradations.push(Degradation {
        stage,
        reason: err.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_length_counts_scalar_values() {
        assert!(validate_log_text("ab").is_err());
        assert!(validate_log_text("abc").is_ok());
        assert!(validate_log_text("   ").is_ok());
        assert!(validate_log_text("बस").is_err());
        assert!(validate_log_text("बस से").is_ok());
        assert!(validate_log_text(&"x".repeat(LOG_TEXT_MAX_CHARS)).is_ok());
        let err = validate_log_text(&"x".repeat(LOG_TEXT_MAX_CHARS + 1)).expect_err("too long");
        assert_eq!(err.field, "text");
    }
}
