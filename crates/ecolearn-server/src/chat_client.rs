// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use ecolearn_core::{ChatCompletion, ChatMessage, ChatReply, ChatRequest, CollaboratorError, ToolCall};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{instrument, warn};

use crate::config::{LanguageModelConfig, RetryPolicy};

const UPSTREAM_MESSAGE_MAX_CHARS: usize = 200;

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiChatClient {
    pub fn new(config: &LanguageModelConfig, api_key: String, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| format!("language model client build failed: {e}"))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            retry: config.retry.clone(),
        })
    }

    fn auth_headers(&self) -> Result<HeaderMap, CollaboratorError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| CollaboratorError::Transport(format!("invalid api key header: {e}")))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages.iter().map(wire_message).collect::<Vec<_>>(),
        });
        if !request.tools.is_empty() {
            body["tools"] = request
                .tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameters,
                        }
                    })
                })
                .collect();
        }
        if request.json_object {
            body["response_format"] = json!({"type": "json_object"});
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    #[instrument(name = "llm_chat_with_retry", skip(self, body))]
    async fn post_with_retry(&self, body: &Value) -> Result<CompletionResponse, CollaboratorError> {
        let headers = self.auth_headers()?;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let req = self.client.post(&self.endpoint).headers(headers.clone()).json(body);
            let failure = match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<CompletionResponse>().await.map_err(|e| {
                        CollaboratorError::MalformedOutput(format!("completion decode failed: {e}"))
                    });
                }
                Ok(resp) => {
                    let status = resp.status();
                    let text = resp.text().await.unwrap_or_default();
                    let err = CollaboratorError::Upstream {
                        status: status.as_u16(),
                        message: text.chars().take(UPSTREAM_MESSAGE_MAX_CHARS).collect(),
                    };
                    if !is_retryable(status) {
                        return Err(err);
                    }
                    err
                }
                Err(e) => CollaboratorError::Transport(e.to_string()),
            };
            if attempt >= self.retry.max_attempts {
                return Err(failure);
            }
            warn!(attempt, error = %failure, "language model call failed, retrying");
            tokio::time::sleep(Duration::from_millis(
                self.retry.base_backoff_ms.saturating_mul(attempt as u64),
            ))
            .await;
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn wire_message(message: &ChatMessage) -> Value {
    let mut wire = json!({
        "role": message.role.as_str(),
        "content": message.content,
    });
    if !message.tool_calls.is_empty() {
        wire["tool_calls"] = message
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": {"name": call.name, "arguments": call.arguments},
                })
            })
            .collect();
    }
    if let Some(id) = &message.tool_call_id {
        wire["tool_call_id"] = json!(id);
    }
    wire
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireReply,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    fn backend_tag(&self) -> &'static str {
        "openai_compatible"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, CollaboratorError> {
        let body = self.request_body(&request);
        let response = self.post_with_retry(&body).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CollaboratorError::MalformedOutput("completion has no choices".to_string()))?;
        Ok(ChatReply {
            content: choice.message.content,
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolearn_core::ToolSpec;

    fn client() -> OpenAiChatClient {
        OpenAiChatClient::new(
            &LanguageModelConfig::default(),
            "sk-test".to_string(),
            Duration::from_secs(1),
        )
        .expect("client")
    }

    #[test]
    fn endpoint_joins_base_url() {
        let config = LanguageModelConfig {
            base_url: "http://127.0.0.1:9/v1/".to_string(),
            ..LanguageModelConfig::default()
        };
        let client = OpenAiChatClient::new(&config, "k".to_string(), Duration::from_secs(1)).expect("client");
        assert_eq!(client.endpoint, "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn request_body_carries_tools_and_json_mode() {
        let reply = ChatReply {
            content: None,
            tool_calls: vec![ToolCall {
                id: "c1".to_string(),
                name: "missions_catalog".to_string(),
                arguments: "{}".to_string(),
            }],
        };
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system("sys"),
                ChatMessage::assistant(&reply),
                ChatMessage::tool_result("c1", "{\"missions\":[]}"),
            ],
            tools: vec![ToolSpec {
                name: "missions_catalog",
                description: "list",
                parameters: json!({"type": "object"}),
            }],
            json_object: true,
            temperature: Some(0.5),
        };
        let body = client().request_body(&request);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["tools"][0]["function"]["name"], "missions_catalog");
        assert_eq!(body["messages"][1]["content"], Value::Null);
        assert_eq!(body["messages"][1]["tool_calls"][0]["type"], "function");
        assert_eq!(body["messages"][2]["tool_call_id"], "c1");
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn plain_requests_omit_optional_fields() {
        let body = client().request_body(&ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            ..ChatRequest::default()
        });
        assert!(body.get("tools").is_none());
        assert!(body.get("response_format").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn only_throttling_and_server_errors_retry() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }
}
