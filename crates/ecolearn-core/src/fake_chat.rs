// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::collaborator::{ChatCompletion, ChatReply, ChatRequest, CollaboratorError, ToolCall};

/// Replays queued replies in order and records every request it receives.
#[derive(Default)]
pub struct FakeChat {
    pub replies: Mutex<VecDeque<Result<ChatReply, CollaboratorError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
    pub calls: AtomicU64,
    pub delay: Option<Duration>,
}

impl FakeChat {
    #[must_use]
    pub fn scripted(replies: impl IntoIterator<Item = Result<ChatReply, CollaboratorError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[must_use]
pub fn text_reply(content: impl Into<String>) -> Result<ChatReply, CollaboratorError> {
    Ok(ChatReply {
        content: Some(content.into()),
        tool_calls: Vec::new(),
    })
}

#[must_use]
pub fn tool_call_reply(calls: &[(&str, &str, &str)]) -> Result<ChatReply, CollaboratorError> {
    Ok(ChatReply {
        content: None,
        tool_calls: calls
            .iter()
            .map(|(id, name, arguments)| ToolCall {
                id: (*id).to_string(),
                name: (*name).to_string(),
                arguments: (*arguments).to_string(),
            })
            .collect(),
    })
}

#[async_trait]
impl ChatCompletion for FakeChat {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::Transport("no scripted reply left".to_string())))
    }
}
