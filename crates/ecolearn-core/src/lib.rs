#![forbid(unsafe_code)]
//! Carbon accounting for daily activity logs.
//!
//! The accounting engine and threat classifier are pure and synchronous. Every
//! call that can block goes through one of the collaborator traits
//! ([`ChatCompletion`], [`ActivityExtractor`], [`FeedbackSynthesizer`],
//! [`TemperatureSeriesSource`]) and is bounded by a timeout at the call site.

mod accounting;
pub mod agent;
mod climate;
mod collaborator;
mod extraction;
pub mod fake_chat;
mod feedback;
mod language;
mod language_model;
mod log_analysis;
mod missions;
mod normalize;
mod threat;

pub use accounting::{round2, AccountingEngine, Contributions};
pub use climate::{ClimateError, FileSeriesSource, SeriesEntry, SeriesPoint, TemperatureSeriesSource};
pub use collaborator::{
    with_timeout, ChatCompletion, ChatMessage, ChatReply, ChatRequest, ChatRole,
    CollaboratorError, ToolCall, ToolSpec, UnconfiguredChat,
};
pub use extraction::{restrict_to_activity_fields, ActivityExtractor};
pub use feedback::{
    fallback_feedback, mentions_carbon_quantity, screen_feedback, Feedback, FeedbackRequest,
    FeedbackSynthesizer,
};
pub use language::{resolve_language, DEFAULT_LANGUAGE};
pub use language_model::{
    LanguageModel, MissionGenerationRequest, DEFAULT_MISSION_CATEGORIES, DEFAULT_MISSION_DIFFICULTY,
};
pub use log_analysis::{
    validate_log_text, Degradation, DegradationStage, LogAnalysis, LogAnalysisError, LogAnalyzer,
};
pub use missions::{mission_catalog, points_calc};
pub use normalize::{normalize_activity, normalize_activity_value};
pub use threat::classify_threat;

pub const CRATE_NAME: &str = "ecolearn-core";
