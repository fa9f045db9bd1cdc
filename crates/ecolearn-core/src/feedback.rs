// SPDX-License-Identifier: Apache-2.0

use std::sync::LazyLock;

use async_trait::async_trait;
use ecolearn_model::{ActivityRecord, AnalysisResult, Language};
use ecolearn_policies::{MAX_TIPS, MAX_WORDS_PER_COACHING_STRING};
use regex::Regex;

use crate::collaborator::CollaboratorError;

// `None` only if the pattern fails to build; every text then counts as a mention.
static CARBON_QUANTITY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+(?:[.,]\d+)?\s*(?:kgs?\b|kilograms?\b|kilos\b|grams?\b|g\b|tonnes?\b|tons?\b|co2|co₂|किलोग्राम|किग्रा)",
    )
    .ok()
});

pub struct FeedbackRequest<'a> {
    pub text: &'a str,
    pub language: Language,
    pub factors: &'a ActivityRecord,
    pub analysis: &'a AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feedback {
    pub feedback: String,
    pub tips: Vec<String>,
}

/// Writes short supportive coaching for an analysed log.
#[async_trait]
pub trait FeedbackSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &FeedbackRequest<'_>) -> Result<Feedback, CollaboratorError>;
}

/// True when `text` states a carbon amount or repeats the formatted total.
#[must_use]
pub fn mentions_carbon_quantity(text: &str, analysis: &AnalysisResult) -> bool {
    let Some(pattern) = CARBON_QUANTITY.as_ref() else {
        return true;
    };
    if pattern.is_match(text) {
        return true;
    }
    analysis.total_kg > 0.0 && text.contains(&format!("{:.2}", analysis.total_kg))
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Enforces the coaching output rules on untrusted model output.
///
/// A feedback line that is blank, too long, or quotes a carbon figure rejects
/// the whole answer. Offending tips are dropped and at most [`MAX_TIPS`] are
/// kept; the result may carry no tips at all.
pub fn screen_feedback(raw: Feedback, analysis: &AnalysisResult) -> Result<Feedback, CollaboratorError> {
    let feedback = raw.feedback.trim().to_string();
    if feedback.is_empty() {
        return Err(CollaboratorError::MalformedOutput("feedback is empty".to_string()));
    }
    if word_count(&feedback) > MAX_WORDS_PER_COACHING_STRING {
        return Err(CollaboratorError::PolicyViolation(format!(
            "feedback exceeds {MAX_WORDS_PER_COACHING_STRING} words"
        )));
    }
    if mentions_carbon_quantity(&feedback, analysis) {
        return Err(CollaboratorError::PolicyViolation(
            "feedback mentions a carbon quantity".to_string(),
        ));
    }
    let tips = raw
        .tips
        .into_iter()
        .map(|tip| tip.trim().to_string())
        .filter(|tip| {
            !tip.is_empty()
                && word_count(tip) <= MAX_WORDS_PER_COACHING_STRING
                && !mentions_carbon_quantity(tip, analysis)
        })
        .take(MAX_TIPS)
        .collect();
    Ok(Feedback { feedback, tips })
}

/// Deterministic feedback used whenever synthesis fails.
#[must_use]
pub fn fallback_feedback(text: &str, language: Language) -> String {
    let text = text.trim();
    match language {
        Language::Hi => format!("{text} — अच्छा निर्णय लेने के लिए छोटे बदलाव आज़माएं।"),
        Language::En => format!("\"{text}\" — consider a lower-carbon alternative when you can."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountingEngine;
    use ecolearn_model::TransportMode;

    fn analysis() -> AnalysisResult {
        AccountingEngine::default().analyze(&ActivityRecord {
            transport_mode: Some(TransportMode::PetrolCar),
            distance_km: 3.0,
            meat_meal_count: 1,
            electricity_kwh: 2.0,
            waste_kg: 0.2,
            ..ActivityRecord::default()
        })
    }

    fn raw(feedback: &str, tips: &[&str]) -> Feedback {
        Feedback {
            feedback: feedback.to_string(),
            tips: tips.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn carbon_quantity_pattern_builds() {
        assert!(CARBON_QUANTITY.is_some());
    }

    #[test]
    fn carbon_quantities_are_detected() {
        let analysis = analysis();
        assert!(mentions_carbon_quantity("You emitted 5 kg today", &analysis));
        assert!(mentions_carbon_quantity("about 2.5kg of CO2", &analysis));
        assert!(mentions_carbon_quantity("saves 300 g", &analysis));
        assert!(mentions_carbon_quantity("your total was 5.24", &analysis));
        assert!(mentions_carbon_quantity("लगभग 5 किलोग्राम", &analysis));
        assert!(!mentions_carbon_quantity("Walk 2 km to the market", &analysis));
        assert!(!mentions_carbon_quantity("Nice work choosing the bus!", &analysis));
    }

    #[test]
    fn good_feedback_keeps_at_most_three_clean_tips() {
        let screened = screen_feedback(
            raw(
                "  Nice effort today!  ",
                &["Take the bus", "", "Skip 5 kg of meat", "Switch off fans", "Carry a bag", "Compost"],
            ),
            &analysis(),
        )
        .expect("accepted");
        assert_eq!(screened.feedback, "Nice effort today!");
        assert_eq!(screened.tips, vec!["Take the bus", "Switch off fans", "Carry a bag"]);
    }

    #[test]
    fn offending_feedback_is_rejected() {
        let analysis = analysis();
        let long = vec!["word"; MAX_WORDS_PER_COACHING_STRING + 1].join(" ");
        assert!(matches!(
            screen_feedback(raw("   ", &[]), &analysis),
            Err(CollaboratorError::MalformedOutput(_))
        ));
        assert!(matches!(
            screen_feedback(raw(&long, &[]), &analysis),
            Err(CollaboratorError::PolicyViolation(_))
        ));
        assert!(matches!(
            screen_feedback(raw("That was 5.24 kg CO2", &[]), &analysis),
            Err(CollaboratorError::PolicyViolation(_))
        ));
    }

    #[test]
    fn fallback_templates_per_language() {
        assert_eq!(
            fallback_feedback(" drove to work ", Language::En),
            "\"drove to work\" — consider a lower-carbon alternative when you can."
        );
        assert_eq!(
            fallback_feedback("कार से गया", Language::Hi),
            "कार से गया — अच्छा निर्णय लेने के लिए छोटे बदलाव आज़माएं।"
        );
    }
}
