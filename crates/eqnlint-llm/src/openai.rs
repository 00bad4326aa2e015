//! Hosted chat-completions backend
//!
//! Sends the system instructions, the few-shot turns and the user prompt as a
//! role-tagged message list with temperature 0, then strips any code fence
//! the model wrapped around its answer.

use crate::{strip_code_fence, CompletionRequest, Exchange, LlmError, ModelBackend, Usage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default timeout for hosted requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Hosted chat-completions backend
pub struct OpenAiBackend {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl OpenAiBackend {
    /// Create a backend for `model` at `endpoint`, authenticated with `api_key`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Chat-completions URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub(crate) fn build_messages<'a>(request: &CompletionRequest<'a>) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(request.few_shots.len() + 2);
    messages.push(ChatMessage {
        role: "system",
        content: request.system,
    });
    messages.extend(request.few_shots.iter().map(|shot| ChatMessage {
        role: shot.role.as_str(),
        content: shot.content(),
    }));
    messages.push(ChatMessage {
        role: "user",
        content: request.user,
    });
    messages
}

fn parse_response(body: &str) -> Result<Exchange, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    Ok(Exchange {
        text: strip_code_fence(&content),
        usage: response.usage.map(|usage| Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }),
    })
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn exchange(&self, request: &CompletionRequest<'_>) -> Result<Exchange, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: build_messages(request),
            temperature: 0.0,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match status {
            s if s.is_success() => {
                let exchange = parse_response(&text)?;
                debug!(model = %self.model, usage = ?exchange.usage, "Chat completion received");
                Ok(exchange)
            }
            reqwest::StatusCode::UNAUTHORIZED => Err(LlmError::Credential(text)),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(LlmError::RateLimitExceeded),
            reqwest::StatusCode::NOT_FOUND => Err(LlmError::ModelNotAvailable(self.model.clone())),
            s => Err(LlmError::Status {
                status: s.as_u16(),
                body: text,
            }),
        }
    }

    async fn shutdown(&self) -> Result<(), LlmError> {
        debug!(endpoint = %self.endpoint, "Releasing hosted connection pool");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqnlint_domain::Message;

    #[test]
    fn test_build_messages_order() {
        let shots = [Message::user("q"), Message::assistant("a")];
        let request = CompletionRequest::new("sys", &shots, "prompt", 50);

        let messages = build_messages(&request);
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[3].content, "prompt");
    }

    #[test]
    fn test_parse_response_strips_fence() {
        let body = r#"{"choices":[{"message":{"content":"```json\n{\"E\":\"energy\"}\n```"}}],
                      "usage":{"prompt_tokens":40,"completion_tokens":7}}"#;
        let exchange = parse_response(body).unwrap();
        assert_eq!(exchange.text, "{\"E\":\"energy\"}");
        assert_eq!(
            exchange.usage,
            Some(Usage {
                prompt_tokens: 40,
                completion_tokens: 7
            })
        );
    }

    #[test]
    fn test_parse_response_without_choices() {
        let result = parse_response(r#"{"choices":[]}"#);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_response_null_content() {
        let exchange = parse_response(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(exchange.text, "");
        assert!(exchange.usage.is_none());
    }

    #[test]
    fn test_parse_response_garbage() {
        assert!(matches!(
            parse_response("<html>"),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
