//! Inference check against a mock chat completion endpoint

mod common;

use common::*;
use ngc_access_check::{check_inference, CheckError, InferenceOutcome};
use reqwest::StatusCode;
use std::time::Duration;
use wiremock::matchers::{bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_chat_completions(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token(API_KEY))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "model": "meta/llama-3.1-8b-instruct",
            "messages": [{"role": "user", "content": "Ping"}],
            "max_tokens": 1
        })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ok_means_valid_key() {
    let server = MockServer::start().await;
    mock_chat_completions(&server, ResponseTemplate::new(200)).await;
    let config = config_for(&server);

    let outcome = check_inference(&client(&config), &config, API_KEY)
        .await
        .unwrap();

    assert_eq!(outcome, InferenceOutcome::Valid);
    assert!(outcome.to_string().contains("SUCCESS"));
}

#[tokio::test]
async fn test_unauthorized_means_invalid_key() {
    let server = MockServer::start().await;
    mock_chat_completions(&server, ResponseTemplate::new(401)).await;
    let config = config_for(&server);

    let outcome = check_inference(&client(&config), &config, API_KEY)
        .await
        .unwrap();

    assert_eq!(outcome, InferenceOutcome::Unauthorized);
    assert!(!outcome.is_success());
    assert!(outcome.to_string().contains("invalid or expired"));
}

#[tokio::test]
async fn test_other_status_keeps_body() {
    let server = MockServer::start().await;
    mock_chat_completions(
        &server,
        ResponseTemplate::new(403).set_body_string("Authorization failed"),
    )
    .await;
    let config = config_for(&server);

    let outcome = check_inference(&client(&config), &config, API_KEY)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        InferenceOutcome::Unexpected {
            status: StatusCode::FORBIDDEN,
            body: "Authorization failed".to_string(),
        }
    );
    let text = outcome.to_string();
    assert!(!text.contains("invalid or expired"));
    assert!(!text.contains("SUCCESS"));
}

#[tokio::test]
async fn test_timeout_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let config = impatient_config_for(&server);

    let err = check_inference(&client(&config), &config, API_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::Connection(_)));
}
