use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

use crate::config::{Config, REGISTRY_USERNAME};
use crate::error::CheckError;
use crate::image::ImageReference;

pub const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Result of asking the registry for a pull token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    Granted(String),
    Rejected,
    Failed(StatusCode),
}

/// Verdict of the container access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOutcome {
    /// Token issued and manifest readable
    Pullable { image: ImageReference },
    /// Token issued but the tag does not exist
    TagNotFound { image: ImageReference },
    /// Token issued but this repository is off limits
    Forbidden { image: ImageReference },
    ManifestFailed { status: StatusCode },
    /// Token endpoint answered 401
    AuthRejected,
    AuthFailed { status: StatusCode },
}

impl RegistryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Pullable { .. })
    }

    /// Classify the manifest response once a token was issued
    pub fn from_manifest_status(status: StatusCode, image: &ImageReference) -> Self {
        let image = image.clone();
        match status {
            StatusCode::OK => Self::Pullable { image },
            StatusCode::NOT_FOUND => Self::TagNotFound { image },
            StatusCode::FORBIDDEN => Self::Forbidden { image },
            _ => Self::ManifestFailed { status },
        }
    }
}

impl fmt::Display for RegistryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pullable { image } => write!(
                f,
                "✅ IMAGE FOUND: Success!\n   You have permission to pull '{}'.",
                image
            ),
            Self::TagNotFound { image } => write!(
                f,
                "❌ NOT FOUND (404):\n   Authentication passed, but the version/tag '{}' does not exist.\n   Please check the version number.",
                image.tag
            ),
            Self::Forbidden { .. } => write!(
                f,
                "❌ FORBIDDEN (403):\n   You do not have permission to view this specific container."
            ),
            Self::ManifestFailed { status } => write!(f, "⚠️ ERROR: Status {}", status.as_u16()),
            Self::AuthRejected => write!(
                f,
                "❌ AUTH FAILED: 401 Unauthorized.\n   Your API key cannot access NVIDIA NGC."
            ),
            Self::AuthFailed { status } => write!(f, "⚠️ AUTH ERROR: {}", status.as_u16()),
        }
    }
}

/// Request a bearer token scoped to pulling `image`, with basic auth
pub async fn request_pull_token(
    http_client: &Client,
    config: &Config,
    api_key: &str,
    image: &ImageReference,
) -> Result<TokenGrant, CheckError> {
    let url = config.token_url(image);
    debug!(url = %url, "Requesting registry token");

    let response = http_client
        .get(&url)
        .basic_auth(REGISTRY_USERNAME, Some(api_key))
        .send()
        .await?;

    let status = response.status();
    debug!(status = status.as_u16(), "Registry token endpoint responded");

    match status {
        StatusCode::OK => {
            let body = response.text().await?;
            let token: TokenResponse = serde_json::from_str(&body)?;
            Ok(TokenGrant::Granted(token.token))
        }
        StatusCode::UNAUTHORIZED => Ok(TokenGrant::Rejected),
        _ => Ok(TokenGrant::Failed(status)),
    }
}

/// Fetch the manifest of `image` and return the response status
pub async fn fetch_manifest_status(
    http_client: &Client,
    config: &Config,
    token: &str,
    image: &ImageReference,
) -> Result<StatusCode, CheckError> {
    let url = config.manifest_url(&image.repository, &image.tag);
    debug!(url = %url, "Fetching manifest");

    let response = http_client
        .get(&url)
        .bearer_auth(token)
        .header(header::ACCEPT, MANIFEST_V2_MEDIA_TYPE)
        .send()
        .await?;

    let status = response.status();
    debug!(status = status.as_u16(), "Manifest endpoint responded");
    Ok(status)
}

/// Check that `api_key` can pull `image`: token first, then the manifest
///
/// Stops after the token step unless a token was issued.
pub async fn check_container(
    http_client: &Client,
    config: &Config,
    api_key: &str,
    image: &ImageReference,
) -> Result<RegistryOutcome, CheckError> {
    let token = match request_pull_token(http_client, config, api_key, image).await? {
        TokenGrant::Granted(token) => token,
        TokenGrant::Rejected => return Ok(RegistryOutcome::AuthRejected),
        TokenGrant::Failed(status) => return Ok(RegistryOutcome::AuthFailed { status }),
    };

    let status = fetch_manifest_status(http_client, config, &token, image).await?;
    Ok(RegistryOutcome::from_manifest_status(status, image))
}
