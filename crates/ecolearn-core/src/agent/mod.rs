// SPDX-License-Identifier: Apache-2.0

//! Two-round tool-calling agent.
//!
//! The first model call may request tools. Requested tools run locally, their
//! results are appended to the transcript and a second call (without tools)
//! produces the final reply.

mod tools;

use std::sync::Arc;
use std::time::Duration;

use ecolearn_model::{ActivityRecord, Language};
use serde::Serialize;
use tracing::info;

use crate::collaborator::{
    with_timeout, ChatCompletion, ChatMessage, ChatReply, ChatRequest, CollaboratorError, ToolCall,
    ToolSpec,
};

pub use tools::{
    tool_specs, AgentToolbox, TOOL_ANALYZE_CO2E, TOOL_INDIA_TEMP_SERIES, TOOL_MISSIONS_CATALOG,
    TOOL_POINTS_CALC,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("agent language model call failed: {0}")]
    Chat(#[from] CollaboratorError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    pub task: String,
    pub language: Language,
    pub emissions: Option<ActivityRecord>,
    pub completed_missions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReply {
    pub lang: Language,
    pub reply: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    AwaitingFirstResponse {
        messages: Vec<ChatMessage>,
    },
    DispatchingTools {
        messages: Vec<ChatMessage>,
        calls: Vec<ToolCall>,
    },
    AwaitingSecondResponse {
        messages: Vec<ChatMessage>,
    },
    Done {
        reply: Option<String>,
    },
}

impl AgentState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AwaitingFirstResponse { .. } => "awaiting_first_response",
            Self::DispatchingTools { .. } => "dispatching_tools",
            Self::AwaitingSecondResponse { .. } => "awaiting_second_response",
            Self::Done { .. } => "done",
        }
    }
}

fn system_prompt(language: Language) -> String {
    format!(
        "You are EcoLearn India, a carbon-first assistant. Always answer in {}. \
         Use the tools to list missions, calculate points, analyze CO2e and fetch the \
         India temperature series. Be concise and practical.",
        language.display_name()
    )
}

/// Builds the opening transcript for a request.
pub fn initial_state(request: &AgentRequest) -> AgentState {
    let mut messages = vec![
        ChatMessage::system(system_prompt(request.language)),
        ChatMessage::user(request.task.clone()),
    ];
    if !request.completed_missions.is_empty() {
        messages.push(ChatMessage::user(format!(
            "Completed missions: {}",
            serde_json::Value::from(request.completed_missions.clone())
        )));
    }
    if let Some(emissions) = &request.emissions {
        let encoded = serde_json::to_string(emissions).unwrap_or_default();
        messages.push(ChatMessage::user(format!("Emissions input: {encoded}")));
    }
    AgentState::AwaitingFirstResponse { messages }
}

#[derive(Clone)]
pub struct Agent {
    chat: Arc<dyn ChatCompletion>,
    toolbox: AgentToolbox,
    collaborator_timeout: Duration,
}

impl Agent {
    #[must_use]
    pub fn new(chat: Arc<dyn ChatCompletion>, toolbox: AgentToolbox, collaborator_timeout: Duration) -> Self {
        Self {
            chat,
            toolbox,
            collaborator_timeout,
        }
    }

    pub async fn run(&self, request: &AgentRequest) -> Result<AgentReply, AgentError> {
        let mut state = initial_state(request);
        loop {
            if let AgentState::Done { reply } = state {
                return Ok(AgentReply {
                    lang: request.language,
                    reply,
                });
            }
            state = self.advance(state).await?;
        }
    }

    /// Performs exactly one transition.
    pub async fn advance(&self, state: AgentState) -> Result<AgentState, AgentError> {
        let from = state.name();
        let next = match state {
            AgentState::AwaitingFirstResponse { mut messages } => {
                let reply = self.complete(messages.clone(), tool_specs()).await?;
                if reply.tool_calls.is_empty() {
                    AgentState::Done {
                        reply: reply.content,
                    }
                } else {
                    messages.push(ChatMessage::assistant(&reply));
                    AgentState::DispatchingTools {
                        messages,
                        calls: reply.tool_calls,
                    }
                }
            }
            AgentState::DispatchingTools { mut messages, calls } => {
                for call in &calls {
                    let output = self.toolbox.dispatch(call).await;
                    messages.push(ChatMessage::tool_result(call.id.clone(), output.to_string()));
                }
                AgentState::AwaitingSecondResponse { messages }
            }
            AgentState::AwaitingSecondResponse { messages } => {
                let reply = self.complete(messages, Vec::new()).await?;
                AgentState::Done {
                    reply: reply.content,
                }
            }
            done @ AgentState::Done { .. } => done,
        };
        info!(from, to = next.name(), "agent transition");
        Ok(next)
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolSpec>,
    ) -> Result<ChatReply, CollaboratorError> {
        let request = ChatRequest {
            messages,
            tools,
            ..ChatRequest::default()
        };
        with_timeout(self.collaborator_timeout, self.chat.complete(request)).await
    }
}
