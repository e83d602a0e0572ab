//! Advisory orchestration: risk profile + safety prompt + gateway.
//!
//! Both public operations are total. Every failure on the live path is
//! turned into a fixed fallback value in `degrade`, the only place errors
//! are absorbed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::{AdvisorConfig, ExecutionMode};
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::gateway::{ChatCompletion, LlmGateway};
use crate::message::ChatTurn;
use crate::prompt::{self, TREATMENT_REFUSAL};
use crate::risk::{self, RiskTier};
use crate::screen;

/// Structured advisory. All five fields are non-empty in every returned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdvisoryDocument {
    pub title: String,
    pub summary: String,
    pub next_steps: String,
    pub prevention: String,
    pub disclaimer: String,
}

impl AdvisoryDocument {
    /// Returned in mock mode, and when no credential is configured.
    pub fn simulated(label: &str) -> Self {
        Self {
            title: format!("Advisory for {label} (Simulation)"),
            summary: format!(
                "This is a SIMULATED advisory for {label}. The AI service is in Mock Mode."
            ),
            next_steps: "Set a valid LLM_API_KEY to get real AI advice.".to_string(),
            prevention: "Check the README for setup instructions.".to_string(),
            disclaimer: "Simulated response. NOT A DIAGNOSIS.".to_string(),
        }
    }

    /// Returned when the live path fails for any reason.
    pub fn fallback(label: &str) -> Self {
        Self {
            title: format!("Advisory for {label} (Fallback)"),
            summary: "We could not reach the AI advisor at this moment. The lesion has been analyzed, but detailed AI advice is unavailable.".to_string(),
            next_steps: "Please consult a dermatologist for a manual evaluation.".to_string(),
            prevention: "Monitor the area for changes and protect it from sun exposure."
                .to_string(),
            disclaimer: "AI service unavailable. NOT A DIAGNOSIS.".to_string(),
        }
    }

    /// Fills fields the model left out or that the output screen removed.
    pub fn salvage_defaults(label: &str) -> Self {
        Self {
            title: format!("Advisory for {label}"),
            summary: format!(
                "The classifier result is {label}. Only a clinician can confirm the condition."
            ),
            next_steps: "Please consult a dermatologist for a professional evaluation.".to_string(),
            prevention: "Monitor the area for changes and protect it from sun exposure."
                .to_string(),
            disclaimer: "AI-generated educational content. NOT A DIAGNOSIS.".to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.title,
            &self.summary,
            &self.next_steps,
            &self.prevention,
            &self.disclaimer,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut String); 5] {
        [
            ("title", &mut self.title),
            ("summary", &mut self.summary),
            ("next_steps", &mut self.next_steps),
            ("prevention", &mut self.prevention),
            ("disclaimer", &mut self.disclaimer),
        ]
    }
}

/// Reply to a chat continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub content: String,
}

impl ChatReply {
    pub fn unconfigured() -> Self {
        Self {
            content: "I cannot chat because the LLM_API_KEY is missing.".to_string(),
        }
    }

    pub fn simulated(label: &str, tier: RiskTier) -> Self {
        Self {
            content: format!(
                "[MOCK AI] I see you are asking about {label}. Since I am in simulation mode, \
                 I can confirm this is typically a {tier} risk condition. Please see a doctor!"
            ),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            content: "I apologize, but I am currently unable to connect to the AI service \
                      (Quota/Connection Error). Please try again later or consult a doctor."
                .to_string(),
        }
    }
}

/// Composes risk profiling, prompt construction and the gateway.
#[derive(Clone)]
pub struct Advisor {
    mode: ExecutionMode,
    gateway: Arc<dyn ChatCompletion>,
    output_screen: bool,
}

impl Advisor {
    pub fn new(mode: ExecutionMode, gateway: Arc<dyn ChatCompletion>) -> Self {
        Self {
            mode,
            gateway,
            output_screen: false,
        }
    }

    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self::new(config.mode, Arc::new(LlmGateway::new(config.llm.clone())))
            .with_output_screen(config.output_screen)
    }

    pub fn with_output_screen(mut self, enabled: bool) -> Self {
        self.output_screen = enabled;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Produce a structured advisory. Never fails; degrades to a fallback document.
    pub async fn generate_advisory(&self, label: &str, confidence: f64) -> AdvisoryDocument {
        match self.mode {
            ExecutionMode::Mock | ExecutionMode::Unconfigured => {
                tracing::info!(mode = self.mode.as_str(), "Serving simulated advisory");
                AdvisoryDocument::simulated(label)
            }
            ExecutionMode::Live => degrade(
                "advisory",
                self.live_advisory(label, confidence).await,
                || AdvisoryDocument::fallback(label),
            ),
        }
    }

    /// Answer the latest turn of `history`. Never fails; degrades to a fixed reply.
    pub async fn continue_chat(
        &self,
        label: &str,
        confidence: f64,
        history: &[ChatTurn],
    ) -> ChatReply {
        match self.mode {
            ExecutionMode::Unconfigured => ChatReply::unconfigured(),
            ExecutionMode::Mock => {
                let profile = risk::classify(label, confidence);
                ChatReply::simulated(label, profile.tier)
            }
            ExecutionMode::Live => degrade(
                "chat",
                self.live_chat(label, confidence, history).await,
                ChatReply::unavailable,
            ),
        }
    }

    async fn live_advisory(
        &self,
        label: &str,
        confidence: f64,
    ) -> AdvisoryResult<AdvisoryDocument> {
        let profile = risk::classify(label, confidence);
        tracing::debug!(
            group = ?risk::group_of(label),
            tier = %profile.tier,
            "Risk profile computed for advisory"
        );

        let messages = prompt::advisory_messages(label, confidence, &profile);
        let raw = self.gateway.complete(&messages, true).await?;
        let mut document = parse_advisory(&raw, label)?;

        if self.output_screen {
            let mut replacements = AdvisoryDocument::salvage_defaults(label);
            for ((field, value), (_, safe)) in document
                .fields_mut()
                .into_iter()
                .zip(replacements.fields_mut())
            {
                if let Some(term) = screen::flagged_term(value.as_str()) {
                    tracing::warn!(field, term = %term, "Advisory field replaced by output screen");
                    *value = std::mem::take(safe);
                }
            }
        }

        Ok(document)
    }

    async fn live_chat(
        &self,
        label: &str,
        confidence: f64,
        history: &[ChatTurn],
    ) -> AdvisoryResult<ChatReply> {
        let profile = risk::classify(label, confidence);
        let messages = prompt::chat_messages(label, &profile, history);
        let content = self.gateway.complete(&messages, false).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AdvisoryError::MalformedResponse(
                "empty chat completion".to_string(),
            ));
        }

        if self.output_screen {
            if let Some(term) = screen::flagged_term(content) {
                tracing::warn!(term = %term, "Chat reply replaced by output screen");
                return Ok(ChatReply {
                    content: TREATMENT_REFUSAL.to_string(),
                });
            }
        }

        Ok(ChatReply {
            content: content.to_string(),
        })
    }
}

/// Absorb a live-path failure into its fixed fallback value.
fn degrade<T>(
    operation: &'static str,
    result: AdvisoryResult<T>,
    fallback: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                operation,
                error_kind = err.kind(),
                error = %err,
                "Live LLM path failed, serving fallback"
            );
            fallback()
        }
    }
}

/// Parse structured output into an advisory.
///
/// A JSON object is salvaged field by field: missing or blank fields take the
/// value from `AdvisoryDocument::salvage_defaults`. Anything that is not a JSON
/// object is rejected.
pub fn parse_advisory(raw: &str, label: &str) -> AdvisoryResult<AdvisoryDocument> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| AdvisoryError::Parse(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(AdvisoryError::Parse("expected a JSON object".to_string()));
    };

    let mut document = AdvisoryDocument::salvage_defaults(label);
    let mut recovered = 0usize;
    for (field, slot) in document.fields_mut() {
        if let Some(text) = object.get(field).and_then(field_text) {
            *slot = text;
            recovered += 1;
        }
    }

    if recovered == 0 {
        return Err(AdvisoryError::Parse(
            "no advisory fields in structured output".to_string(),
        ));
    }
    if recovered < 5 {
        tracing::debug!(recovered, "Advisory salvaged with default fields");
    }

    Ok(document)
}

fn field_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(field_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Object(_) => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
