//! Integration tests for the HTTP backends
//!
//! Each test serves one canned HTTP response from a local listener and
//! inspects the request the backend sent.

use eqnlint_domain::Message;
use eqnlint_llm::{CompletionRequest, LlmError, ModelBackend, OllamaBackend, OpenAiBackend};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Raw request captured by the canned server
struct Captured {
    head: String,
    body: serde_json::Value,
}

/// Serve one connection with `status` and `body`, returning the request seen
async fn serve_once(status: &'static str, content_type: &'static str, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        let (head, body_start, length) = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending a full request");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..pos]).to_string();
                let length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                break (head, pos + 4, length);
            }
        };
        while raw.len() < body_start + length {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending the body");
            raw.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        Captured {
            head,
            body: serde_json::from_slice(&raw[body_start..body_start + length]).unwrap(),
        }
    });

    (base, handle)
}

#[tokio::test]
async fn test_ollama_streams_and_concatenates() {
    let stream = [
        r#"{"response":"✅ CONS","done":false}"#,
        r#"{"response":"ISTENT: both sides in newtons","done":false}"#,
        r#"{"response":"","done":true,"prompt_eval_count":30,"eval_count":9}"#,
    ]
    .join("\n");
    let (base, server) = serve_once("200 OK", "application/x-ndjson", stream).await;

    let backend = OllamaBackend::new(&base, "phi").unwrap();
    let shots = [Message::user("Check: E = mc^2"), Message::assistant("✅ CONSISTENT")];
    let request = CompletionRequest::new("You audit units.", &shots, "Check: F = ma", 100);
    let exchange = backend.exchange(&request).await.unwrap();

    assert_eq!(exchange.text, "✅ CONSISTENT: both sides in newtons");
    assert_eq!(exchange.usage.map(|u| u.completion_tokens), Some(9));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /api/generate"));
    assert_eq!(captured.body["model"], "phi");
    assert_eq!(captured.body["stream"], true);
    assert_eq!(
        captured.body["prompt"],
        "You audit units.\nUser: Check: E = mc^2\nAssistant: ✅ CONSISTENT\nUser: Check: F = ma\n"
    );
}

#[tokio::test]
async fn test_ollama_non_ok_status_is_an_error() {
    let (base, _server) = serve_once("500 Internal Server Error", "text/plain", "overloaded".to_string()).await;

    let backend = OllamaBackend::new(&base, "phi").unwrap();
    let request = CompletionRequest::new("S", &[], "U", 10);
    let result = backend.exchange(&request).await;

    assert!(matches!(result, Err(LlmError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_ollama_malformed_chunk_is_an_error() {
    let (base, _server) = serve_once("200 OK", "application/x-ndjson", "{\"response\":\"ok\"}\n{oops\n".to_string()).await;

    let backend = OllamaBackend::new(&base, "phi").unwrap();
    let request = CompletionRequest::new("S", &[], "U", 10);
    let result = backend.exchange(&request).await;

    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_openai_sends_chat_request_and_strips_fence() {
    let reply = serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": "```\n❌ INCONSISTENT: kg vs m\n```"}}],
        "usage": {"prompt_tokens": 55, "completion_tokens": 8}
    })
    .to_string();
    let (base, server) = serve_once("200 OK", "application/json", reply).await;

    let backend = OpenAiBackend::new(format!("{}/v1/chat/completions", base), "gpt-4o-mini", "sk-test").unwrap();
    let shots = [Message::user("Check: v = d/t"), Message::assistant("✅ CONSISTENT")];
    let request = CompletionRequest::new("You audit units.", &shots, "Check: m = v", 1200);
    let exchange = backend.exchange(&request).await.unwrap();

    assert_eq!(exchange.text, "❌ INCONSISTENT: kg vs m");
    assert_eq!(exchange.usage.map(|u| u.prompt_tokens), Some(55));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /v1/chat/completions"));
    assert!(captured
        .head
        .lines()
        .any(|line| line.eq_ignore_ascii_case("authorization: Bearer sk-test")));
    assert_eq!(captured.body["model"], "gpt-4o-mini");
    assert_eq!(captured.body["temperature"], 0.0);
    assert_eq!(captured.body["max_tokens"], 1200);

    let roles: Vec<_> = captured.body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(roles, ["system", "user", "assistant", "user"]);
    assert_eq!(captured.body["messages"][3]["content"], "Check: m = v");
}

#[tokio::test]
async fn test_openai_rate_limited() {
    let (base, _server) = serve_once("429 Too Many Requests", "application/json", "{}".to_string()).await;

    let backend = OpenAiBackend::new(&base, "gpt-4o-mini", "sk-test").unwrap();
    let request = CompletionRequest::new("S", &[], "U", 10);
    let result = backend.exchange(&request).await;

    assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_openai_unauthorized_is_credential_error() {
    let (base, _server) = serve_once("401 Unauthorized", "application/json", "{\"error\":\"bad key\"}".to_string()).await;

    let backend = OpenAiBackend::new(&base, "gpt-4o-mini", "sk-wrong").unwrap();
    let request = CompletionRequest::new("S", &[], "U", 10);
    let result = backend.exchange(&request).await;

    assert!(matches!(result, Err(LlmError::Credential(_))));
}
