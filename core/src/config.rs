//! Process-wide advisory configuration, read once at startup.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | LLM_API_KEY | unset | Unset/blank = Unconfigured, `MOCK` = Mock, anything else = Live. |
//! | LLM_BASE_URL | https://api.openai.com | OpenAI-compatible provider base URL. |
//! | LLM_MODEL | gpt-4o-mini | Model identifier sent with every request. |
//! | LLM_TIMEOUT_SECS | 30 | Upper bound for one provider call. |
//! | MELASCOPE_OUTPUT_SCREEN | false | Replace generated text that names treatments. |

use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

pub const MOCK_SENTINEL: &str = "MOCK";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LLM_BASE_URL is not a valid http(s) URL: {0}")]
    InvalidBaseUrl(String),
    #[error("LLM_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// How advisory requests are served for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// A real credential is configured; requests reach the provider.
    Live,
    /// The credential is the `MOCK` sentinel; responses are simulated.
    Mock,
    /// No credential at all.
    Unconfigured,
}

impl ExecutionMode {
    pub fn from_credential(credential: Option<&str>) -> Self {
        match credential.map(str::trim).filter(|key| !key.is_empty()) {
            None => Self::Unconfigured,
            Some(MOCK_SENTINEL) => Self::Mock,
            Some(_) => Self::Live,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
            Self::Unconfigured => "unconfigured",
        }
    }
}

/// Connection settings for the chat-completion provider.
#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub mode: ExecutionMode,
    pub llm: LlmSettings,
    pub output_screen: bool,
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, so tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = non_empty("LLM_API_KEY");
        let mode = ExecutionMode::from_credential(api_key.as_deref());

        let base_url = non_empty("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validate_base_url(&base_url)?;

        let model = non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout = match non_empty("LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let output_screen = non_empty("MELASCOPE_OUTPUT_SCREEN")
            .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            mode,
            llm: LlmSettings {
                api_key,
                base_url,
                model,
                timeout,
            },
            output_screen,
        })
    }

    /// Configuration that serves simulated responses only.
    pub fn mock() -> Self {
        Self {
            mode: ExecutionMode::Mock,
            llm: LlmSettings {
                api_key: Some(MOCK_SENTINEL.to_string()),
                ..LlmSettings::default()
            },
            output_screen: false,
        }
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
