use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::image::ImageReference;

pub const DEFAULT_INFERENCE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_REGISTRY_URL: &str = "https://nvcr.io";
pub const DEFAULT_MODEL: &str = "meta/llama-3.1-8b-instruct";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Service name the NGC token endpoint expects
pub const REGISTRY_SERVICE: &str = "nvcr.io";

/// Basic auth username NGC uses for API keys
pub const REGISTRY_USERNAME: &str = "$oauthtoken";

/// Endpoints and request settings shared by both checks
#[derive(Debug, Clone)]
pub struct Config {
    pub inference_url: String,
    pub registry_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Get the chat completion URL
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.inference_url.trim_end_matches('/')
        )
    }

    /// Get the token endpoint URL scoped to pulling `image`
    pub fn token_url(&self, image: &ImageReference) -> String {
        format!(
            "{}/proxy_auth?scope={}&service={}",
            self.registry_url.trim_end_matches('/'),
            image.pull_scope(),
            REGISTRY_SERVICE
        )
    }

    /// Get the manifest URL for a repository and tag
    pub fn manifest_url(&self, repository: &str, tag: &str) -> String {
        format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url.trim_end_matches('/'),
            repository,
            tag
        )
    }

    /// Build the HTTP client used for every request
    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("ngc-access-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")
    }
}
