use std::error::Error as StdError;
use thiserror::Error;

/// Failures that keep a check from reaching a verdict
///
/// HTTP status codes are not errors; they are reported through the
/// check outcomes.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{}", describe(.0))]
    Connection(#[from] reqwest::Error),

    #[error("Malformed token response from registry: {0}")]
    InvalidTokenResponse(#[from] serde_json::Error),
}

// reqwest's top-level message ("error sending request for url ...") hides the
// actual cause, so append the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
