// SPDX-License-Identifier: Apache-2.0

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("language model is not configured")]
    NotConfigured,
    #[error("collaborator timed out after {0:?}")]
    Timeout(Duration),
    #[error("collaborator transport failed: {0}")]
    Transport(String),
    #[error("collaborator returned status {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("malformed collaborator output: {0}")]
    MalformedOutput(String),
    #[error("collaborator output rejected: {0}")]
    PolicyViolation(String),
}

/// Bounds a collaborator call; an elapsed deadline becomes [`CollaboratorError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(limit)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

impl ChatRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments exactly as the model produced them.
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(ChatRole::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(ChatRole::User, content)
    }

    /// Echoes an assistant turn back into the transcript.
    #[must_use]
    pub fn assistant(reply: &ChatReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: reply.content.clone(),
            tool_calls: reply.tool_calls.clone(),
            tool_call_id: None,
        }
    }

    #[must_use]
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
    /// Ask the model for a single JSON object.
    pub json_object: bool,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// A chat-completion style language model.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, CollaboratorError>;
}

/// Stand-in used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredChat;

#[async_trait]
impl ChatCompletion for UnconfiguredChat {
    fn backend_tag(&self) -> &'static str {
        "unconfigured"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatReply, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }
}
