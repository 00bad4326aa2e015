//! Ollama Backend
//!
//! Talks to a local Ollama server through its `/api/generate` endpoint.
//!
//! Ollama's generate API takes a single prompt string, so the system
//! instructions, few-shot turns and user prompt are flattened into one text.
//! The answer is streamed back as newline-delimited JSON objects whose
//! `response` fields are concatenated in arrival order.
//!
//! # Examples
//!
//! ```no_run
//! use eqnlint_llm::{CompletionRequest, ModelBackend, OllamaBackend};
//!
//! # async fn example() -> Result<(), eqnlint_llm::LlmError> {
//! let backend = OllamaBackend::new("http://localhost:11434", "phi")?;
//! let request = CompletionRequest::new("You audit units.", &[], "F = ma", 256);
//! let answer = backend.exchange(&request).await?;
//! println!("{}", answer.text);
//! # Ok(())
//! # }
//! ```

use crate::{CompletionRequest, Exchange, LlmError, ModelBackend, Usage};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for local requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Local Ollama backend
pub struct OllamaBackend {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

/// One line of the streamed generate response
#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    error: Option<String>,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    ///
    /// # Parameters
    ///
    /// - `endpoint`: server base URL (e.g., "http://localhost:11434")
    /// - `model`: model name without the `ollama:` prefix (e.g., "phi")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
        })
    }

    /// Server base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}

/// Flatten a request into the single prompt string the generate API expects
///
/// Layout: the system instructions, then one `Role: content` line per
/// few-shot turn, then `User: {prompt}`; every part ends with a newline.
pub fn flatten_prompt(request: &CompletionRequest<'_>) -> String {
    let mut prompt = String::with_capacity(request.system.len() + request.user.len() + 16);
    prompt.push_str(request.system);
    prompt.push('\n');

    for shot in request.few_shots {
        prompt.push_str(shot.role.title());
        prompt.push_str(": ");
        prompt.push_str(shot.content());
        prompt.push('\n');
    }

    prompt.push_str("User: ");
    prompt.push_str(request.user);
    prompt.push('\n');
    prompt
}

/// Accumulates streamed chunks into the final answer
#[derive(Debug, Default)]
struct StreamAssembler {
    pending: Vec<u8>,
    reply: String,
    usage: Option<Usage>,
}

impl StreamAssembler {
    fn push(&mut self, bytes: &[u8]) -> Result<(), LlmError> {
        self.pending.extend_from_slice(bytes);
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.absorb_line(&line)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Exchange, LlmError> {
        let rest = std::mem::take(&mut self.pending);
        self.absorb_line(&rest)?;
        Ok(Exchange {
            text: self.reply.trim().to_string(),
            usage: self.usage,
        })
    }

    fn absorb_line(&mut self, line: &[u8]) -> Result<(), LlmError> {
        let line = std::str::from_utf8(line)
            .map_err(|e| LlmError::InvalidResponse(format!("Stream chunk is not UTF-8: {}", e)))?
            .trim();
        if line.is_empty() {
            return Ok(());
        }

        let chunk: GenerateChunk = serde_json::from_str(line)
            .map_err(|e| LlmError::InvalidResponse(format!("Malformed stream chunk: {}", e)))?;

        if let Some(error) = chunk.error {
            return Err(LlmError::Communication(error));
        }

        self.reply.push_str(&chunk.response);
        if chunk.done {
            self.usage = Some(Usage {
                prompt_tokens: chunk.prompt_eval_count.unwrap_or(0),
                completion_tokens: chunk.eval_count.unwrap_or(0),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn exchange(&self, request: &CompletionRequest<'_>) -> Result<Exchange, LlmError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: flatten_prompt(request),
            stream: true,
        };

        let response = self.client.post(self.generate_url()).json(&body).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut assembler = StreamAssembler::default();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            assembler.push(&chunk?)?;
        }

        let exchange = assembler.finish()?;
        debug!(model = %self.model, chars = exchange.text.len(), "Ollama stream complete");
        Ok(exchange)
    }

    async fn shutdown(&self) -> Result<(), LlmError> {
        debug!(endpoint = %self.endpoint, "Releasing Ollama connection pool");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqnlint_domain::Message;

    #[test]
    fn test_ollama_backend_creation() {
        let backend = OllamaBackend::new("http://localhost:11434", "phi").unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:11434");
        assert_eq!(backend.model(), "phi");
        assert_eq!(backend.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_generate_url_tolerates_trailing_slash() {
        let backend = OllamaBackend::new("http://host:1/", "phi").unwrap();
        assert_eq!(backend.generate_url(), "http://host:1/api/generate");
    }

    #[test]
    fn test_flatten_prompt_without_few_shots() {
        let request = CompletionRequest::new("S", &[], "U", 10);
        assert_eq!(flatten_prompt(&request), "S\nUser: U\n");
    }

    #[test]
    fn test_flatten_prompt_with_few_shots() {
        let shots = [Message::user("q1"), Message::assistant("a1")];
        let request = CompletionRequest::new("S", &shots, "U", 10);
        assert_eq!(flatten_prompt(&request), "S\nUser: q1\nAssistant: a1\nUser: U\n");
    }

    #[test]
    fn test_assembler_concatenates_chunks_split_across_reads() {
        let mut assembler = StreamAssembler::default();
        assembler.push("{\"response\":\"✅ CON".as_bytes()).unwrap();
        assembler.push(b"\"}\n{\"response\":\"SISTENT\"}\n").unwrap();
        assembler
            .push(br#"{"response":"","done":true,"prompt_eval_count":12,"eval_count":3}"#)
            .unwrap();

        let exchange = assembler.finish().unwrap();
        assert_eq!(exchange.text, "✅ CONSISTENT");
        assert_eq!(
            exchange.usage,
            Some(Usage {
                prompt_tokens: 12,
                completion_tokens: 3
            })
        );
    }

    #[test]
    fn test_assembler_trims_and_skips_blank_lines() {
        let mut assembler = StreamAssembler::default();
        assembler.push(b"\n{\"response\":\"  answer \"}\n\n").unwrap();
        assert_eq!(assembler.finish().unwrap().text, "answer");
    }

    #[test]
    fn test_assembler_rejects_malformed_chunk() {
        let mut assembler = StreamAssembler::default();
        let result = assembler.push(b"not json\n");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_assembler_surfaces_server_error() {
        let mut assembler = StreamAssembler::default();
        let result = assembler.push(b"{\"error\":\"model crashed\"}\n");
        assert!(matches!(result, Err(LlmError::Communication(msg)) if msg == "model crashed"));
    }

    #[tokio::test]
    async fn test_ollama_connection_error() {
        let backend = OllamaBackend::new("http://127.0.0.1:9", "phi").unwrap();
        let request = CompletionRequest::new("S", &[], "U", 10);
        let result = backend.exchange(&request).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
