//! Backend abstraction and model-id based selection

use crate::{LlmError, OllamaBackend, OpenAiBackend};
use async_trait::async_trait;
use eqnlint_domain::Message;

/// Model-id prefix that selects the local-server backend
pub const LOCAL_PREFIX: &str = "ollama:";

/// Environment variable holding the hosted-API credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// One request to a model backend
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// System instructions
    pub system: &'a str,
    /// Few-shot turns, sent between the system instructions and the user prompt
    pub few_shots: &'a [Message],
    /// The prompt for this fragment
    pub user: &'a str,
    /// Output-length ceiling
    pub max_tokens: u32,
}

impl<'a> CompletionRequest<'a> {
    /// Assemble a request
    pub fn new(system: &'a str, few_shots: &'a [Message], user: &'a str, max_tokens: u32) -> Self {
        Self {
            system,
            few_shots,
            user,
            max_tokens,
        }
    }
}

/// Token accounting reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u64,
    /// Tokens generated in the answer
    pub completion_tokens: u64,
}

/// The shaped answer of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Answer text, already shaped (fences stripped, stream concatenated, trimmed)
    pub text: String,
    /// Token usage, when the backend reports it
    pub usage: Option<Usage>,
}

impl Exchange {
    /// Answer without usage information
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// A model-serving endpoint
///
/// Implementations perform exactly one request/response exchange per call and
/// never retry. They hold their own connection handle, which is released by
/// [`ModelBackend::shutdown`] or on drop.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Short backend name for logs (`openai`, `ollama`, `mock`)
    fn name(&self) -> &str;

    /// Model identifier sent on the wire
    fn model(&self) -> &str;

    /// Perform one exchange
    async fn exchange(&self, request: &CompletionRequest<'_>) -> Result<Exchange, LlmError>;

    /// Best-effort teardown of the connection handle
    async fn shutdown(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

/// Which backend a model identifier selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted chat-completions API
    Hosted,
    /// Local Ollama server
    Local,
}

impl BackendKind {
    /// Split a model identifier into its backend kind and the wire model name
    ///
    /// # Examples
    ///
    /// ```
    /// use eqnlint_llm::BackendKind;
    ///
    /// assert_eq!(BackendKind::for_model("ollama:phi"), (BackendKind::Local, "phi"));
    /// assert_eq!(BackendKind::for_model("gpt-4o-mini"), (BackendKind::Hosted, "gpt-4o-mini"));
    /// ```
    pub fn for_model(model_id: &str) -> (Self, &str) {
        match model_id.strip_prefix(LOCAL_PREFIX) {
            Some(model) => (BackendKind::Local, model),
            None => (BackendKind::Hosted, model_id),
        }
    }
}

/// Endpoints and credentials used to construct backends
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Full URL of the hosted chat-completions endpoint
    pub openai_url: String,
    /// Base URL of the local Ollama server
    pub ollama_url: String,
    /// Hosted-API credential
    pub api_key: Option<String>,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            openai_url: crate::openai::DEFAULT_ENDPOINT.to_string(),
            ollama_url: crate::ollama::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

impl BackendOptions {
    /// Default endpoints with the credential read from `OPENAI_API_KEY`
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_VAR).ok().filter(|key| !key.trim().is_empty()),
            ..Self::default()
        }
    }
}

/// Construct the backend selected by `model_id`
///
/// # Errors
///
/// Returns [`LlmError::Credential`] when a hosted model is selected and no
/// credential is configured, so the run can fail before the first call.
pub fn select_backend(model_id: &str, options: &BackendOptions) -> Result<Box<dyn ModelBackend>, LlmError> {
    match BackendKind::for_model(model_id) {
        (BackendKind::Local, model) => {
            if model.is_empty() {
                return Err(LlmError::ModelNotAvailable(model_id.to_string()));
            }
            Ok(Box::new(OllamaBackend::new(&options.ollama_url, model)?))
        }
        (BackendKind::Hosted, model) => {
            let api_key = options
                .api_key
                .clone()
                .ok_or_else(|| LlmError::Credential(format!("{} is not set", API_KEY_VAR)))?;
            Ok(Box::new(OpenAiBackend::new(&options.openai_url, model, api_key)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_split() {
        assert_eq!(BackendKind::for_model("ollama:llama3"), (BackendKind::Local, "llama3"));
        assert_eq!(BackendKind::for_model("gpt-4"), (BackendKind::Hosted, "gpt-4"));
        assert_eq!(BackendKind::for_model("OLLAMA:phi").0, BackendKind::Hosted);
    }

    #[test]
    fn test_select_local_backend() {
        let backend = select_backend("ollama:phi", &BackendOptions::default()).unwrap();
        assert_eq!(backend.name(), "ollama");
        assert_eq!(backend.model(), "phi");
    }

    #[test]
    fn test_select_local_backend_requires_model_name() {
        let result = select_backend("ollama:", &BackendOptions::default());
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(_))));
    }

    #[test]
    fn test_select_hosted_backend_requires_credential() {
        let result = select_backend("gpt-4o-mini", &BackendOptions::default());
        assert!(matches!(result, Err(LlmError::Credential(_))));
    }

    #[test]
    fn test_select_hosted_backend_with_credential() {
        let options = BackendOptions {
            api_key: Some("sk-test".to_string()),
            ..BackendOptions::default()
        };
        let backend = select_backend("gpt-4o-mini", &options).unwrap();
        assert_eq!(backend.name(), "openai");
        assert_eq!(backend.model(), "gpt-4o-mini");
    }
}
