use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::config::Config;
use crate::error::CheckError;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Smallest request that still exercises the model
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

/// Verdict of the inference check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    Valid,
    Unauthorized,
    Unexpected { status: StatusCode, body: String },
}

impl InferenceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for InferenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "✅ SUCCESS: API Key is active and valid for Inference."),
            Self::Unauthorized => write!(
                f,
                "❌ FAILED: 401 Unauthorized.\n   The key is invalid or expired."
            ),
            Self::Unexpected { status, body } => write!(
                f,
                "⚠️ FAILED: Status {}\n   Response: {}",
                status.as_u16(),
                body
            ),
        }
    }
}

/// Ask the chat completion endpoint for a single token using `api_key`
pub async fn check_inference(
    http_client: &Client,
    config: &Config,
    api_key: &str,
) -> Result<InferenceOutcome, CheckError> {
    let url = config.chat_completions_url();
    let request = ChatCompletionRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user",
            content: "Ping",
        }],
        max_tokens: 1,
    };

    debug!(url = %url, model = %config.model, "Sending chat completion request");

    let response = http_client
        .post(&url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    debug!(status = status.as_u16(), "Chat completion responded");

    let outcome = match status {
        StatusCode::OK => InferenceOutcome::Valid,
        StatusCode::UNAUTHORIZED => InferenceOutcome::Unauthorized,
        _ => {
            let body = response.text().await?;
            InferenceOutcome::Unexpected { status, body }
        }
    };

    Ok(outcome)
}
