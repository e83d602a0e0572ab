use serde::Serialize;
use utoipa::ToSchema;

/// Structured error response for malformed caller input.
///
/// The advisory and chat operations never surface provider failures through
/// this type; they degrade to fallback documents instead.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "internal_error")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
}

/// Every way the live advisory path can fail.
///
/// These never leave the orchestrator: `Advisor` maps each of them to a fixed,
/// user-presentable fallback.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("LLM credential is not configured")]
    ConfigurationMissing,

    #[error("LLM provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("LLM provider response was malformed: {0}")]
    MalformedResponse(String),

    #[error("structured output did not match the advisory shape: {0}")]
    Parse(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM request failed: {0}")]
    Transport(String),
}

impl AdvisoryError {
    /// Short stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisoryError::ConfigurationMissing => "configuration_missing",
            AdvisoryError::Provider { .. } => "provider_error",
            AdvisoryError::MalformedResponse(_) => "malformed_response",
            AdvisoryError::Parse(_) => "parse_error",
            AdvisoryError::Timeout(_) => "transport_timeout",
            AdvisoryError::Transport(_) => "transport_error",
        }
    }
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message_includes_status_and_body() {
        let err = AdvisoryError::Provider {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "LLM provider returned status 429: quota exceeded"
        );
        assert_eq!(err.kind(), "provider_error");
    }

    #[test]
    fn timeout_kind_is_stable() {
        assert_eq!(AdvisoryError::Timeout(30).kind(), "transport_timeout");
    }
}
