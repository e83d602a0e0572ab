//! Chat-completion gateway for OpenAI-compatible providers.
//!
//! One call, one attempt. The gateway translates transport and provider
//! failures into `AdvisoryError` and never inspects the generated text.
//! Message content is never logged.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::message::ChatMessage;

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const MAX_TOKENS: u32 = 400;
pub const TEMPERATURE: f32 = 0.3;

/// Longest provider error body kept in an error value.
const ERROR_BODY_LIMIT: usize = 512;

/// The single capability the advisory pipeline needs from an LLM backend.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send `messages` and return the first choice's content.
    ///
    /// `structured` asks the provider for a JSON object; the returned text is
    /// not validated here.
    async fn complete(&self, messages: &[ChatMessage], structured: bool) -> AdvisoryResult<String>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// reqwest-backed gateway. The client pools connections across calls.
pub struct LlmGateway {
    settings: LlmSettings,
    client: reqwest::Client,
}

impl LlmGateway {
    pub fn new(settings: LlmSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .expect("Failed to build LLM HTTP client");
        Self { settings, client }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.settings.base_url, COMPLETIONS_PATH)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AdvisoryError {
        if err.is_timeout() {
            AdvisoryError::Timeout(self.settings.timeout.as_secs())
        } else {
            AdvisoryError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ChatCompletion for LlmGateway {
    async fn complete(&self, messages: &[ChatMessage], structured: bool) -> AdvisoryResult<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(AdvisoryError::ConfigurationMissing)?;

        let body = CompletionRequest {
            model: &self.settings.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            response_format: structured.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(
            model = %self.settings.model,
            message_count = messages.len(),
            structured,
            "Sending chat completion request"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if status != reqwest::StatusCode::OK {
            tracing::warn!(
                status = %status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Chat completion returned non-success status"
            );
            return Err(AdvisoryError::Provider {
                status: status.as_u16(),
                body: truncate(&text, ERROR_BODY_LIMIT),
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AdvisoryError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        tracing::info!(
            model = %self.settings.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            structured,
            "Chat completion succeeded"
        );

        Ok(content)
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::{live_settings, serve};

    /// Replies with the received request body serialized as the completion content.
    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let content = json!({ "auth": auth, "request": body }).to_string();
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
    }

    fn echo_router() -> Router {
        Router::new().route(COMPLETIONS_PATH, post(echo))
    }

    #[tokio::test]
    async fn sends_openai_compatible_payload_with_bearer_token() {
        let base_url = serve(echo_router()).await;
        let gateway = LlmGateway::new(live_settings(&base_url));

        let raw = gateway
            .complete(&[ChatMessage::system("rules"), ChatMessage::user("hi")], true)
            .await
            .expect("completion should succeed");
        let echoed: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(echoed["auth"], "Bearer sk-test");
        let request = &echoed["request"];
        assert_eq!(request["model"], "gpt-4o-mini");
        assert_eq!(request["max_tokens"], 400);
        assert!((request["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(request["response_format"]["type"], "json_object");
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn free_text_mode_omits_response_format() {
        let base_url = serve(echo_router()).await;
        let gateway = LlmGateway::new(live_settings(&base_url));

        let raw = gateway
            .complete(&[ChatMessage::user("hi")], false)
            .await
            .expect("completion should succeed");
        let echoed: Value = serde_json::from_str(&raw).unwrap();

        assert!(echoed["request"].get("response_format").is_none());
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        let settings = LlmSettings {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            ..LlmSettings::default()
        };
        let err = LlmGateway::new(settings)
            .complete(&[ChatMessage::user("hi")], false)
            .await
            .expect_err("missing key must fail");
        assert!(matches!(err, AdvisoryError::ConfigurationMissing));
    }

    #[tokio::test]
    async fn non_success_status_is_provider_error() {
        let router = Router::new().route(
            COMPLETIONS_PATH,
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let base_url = serve(router).await;

        let err = LlmGateway::new(live_settings(&base_url))
            .complete(&[ChatMessage::user("hi")], false)
            .await
            .expect_err("500 must fail");

        match err {
            AdvisoryError::Provider { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error variant: {:?}", other),
        }
    }

    #[tokio::test]
    async fn body_without_choices_is_malformed() {
        let router = Router::new().route(
            COMPLETIONS_PATH,
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base_url = serve(router).await;

        let err = LlmGateway::new(live_settings(&base_url))
            .complete(&[ChatMessage::user("hi")], false)
            .await
            .expect_err("empty choices must fail");
        assert!(matches!(err, AdvisoryError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let router = Router::new().route(COMPLETIONS_PATH, post(|| async { "<html>oops</html>" }));
        let base_url = serve(router).await;

        let err = LlmGateway::new(live_settings(&base_url))
            .complete(&[ChatMessage::user("hi")], false)
            .await
            .expect_err("html must fail");
        assert!(matches!(err, AdvisoryError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let router = Router::new().route(
            COMPLETIONS_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let base_url = serve(router).await;
        let settings = LlmSettings {
            timeout: Duration::from_millis(200),
            ..live_settings(&base_url)
        };

        let err = LlmGateway::new(settings)
            .complete(&[ChatMessage::user("hi")], false)
            .await
            .expect_err("slow provider must time out");
        assert!(matches!(err, AdvisoryError::Timeout(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
