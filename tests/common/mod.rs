//! Shared fixtures for the endpoint tests

#![allow(dead_code)]

use ngc_access_check::Config;
use reqwest::Client;
use std::time::Duration;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "nvapi-test-key";
pub const REGISTRY_TOKEN: &str = "registry-bearer-token";
pub const TENSORRT: &str = "nvcr.io/nvidia/tensorrt:24.03-py3";

/// Config pointing both endpoints at the mock server
pub fn config_for(server: &MockServer) -> Config {
    Config {
        inference_url: format!("{}/v1", server.uri()),
        registry_url: server.uri(),
        timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

/// Config with a timeout short enough to trip on a delayed response
pub fn impatient_config_for(server: &MockServer) -> Config {
    Config {
        timeout: Duration::from_millis(200),
        ..config_for(server)
    }
}

pub fn client(config: &Config) -> Client {
    config.http_client().unwrap()
}

/// Token endpoint for `repository` answering with `response`
pub async fn mock_token_endpoint(server: &MockServer, repository: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/proxy_auth"))
        .and(query_param("scope", format!("repository:{}:pull", repository)))
        .and(query_param("service", "nvcr.io"))
        .and(basic_auth("$oauthtoken", API_KEY))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Token endpoint that issues `REGISTRY_TOKEN`
pub async fn mock_token_granted(server: &MockServer, repository: &str) {
    mock_token_endpoint(
        server,
        repository,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "token": REGISTRY_TOKEN })),
    )
    .await;
}
