//! Configuration for the generative-text client
//!
//! Values come from command-line flags with environment fallbacks; library
//! users can build a [`GenAiConfig`] directly.

use std::time::Duration;

use clap::Args;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`GenAiClient`](crate::genai::GenAiClient)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenAiConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    /// Deadline for one assistant request, enforced by the effect runner
    pub timeout: Duration,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GenAiConfig {
    /// Full URL of the chat-completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Command-line flags for the generative-text client
#[derive(Args, Debug, Clone)]
pub struct GenAiArgs {
    /// Base URL of the chat-completions API
    #[arg(long, env = "BOOKWORM_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model name sent with every request
    #[arg(long, env = "BOOKWORM_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API key (bearer token)
    #[arg(long, env = "BOOKWORM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl From<GenAiArgs> for GenAiConfig {
    fn from(args: GenAiArgs) -> Self {
        Self {
            base_url: args.api_url,
            model: args.model,
            api_key: args.api_key.filter(|key| !key.is_empty()),
            timeout: Duration::from_secs(args.timeout_secs.max(1)),
        }
    }
}
