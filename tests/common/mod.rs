#![allow(dead_code)]

use astroloyalty::{AstroClient, ClientConfig, Credentials};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

pub const BASE_PATH: &str = "/api/json";
pub const TOKEN: &str = "sample_token";

pub fn credentials() -> Credentials {
    Credentials::new("test_user", "test_pass", "client_123")
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::with_base_url(&format!("{}{BASE_PATH}", server.uri())).unwrap()
}

pub fn api_path(endpoint: &str) -> String {
    format!("{BASE_PATH}{endpoint}")
}

pub fn token_body() -> Value {
    json!({
        "access_token": TOKEN,
        "token_type": "bearer",
        "expires": "1800",
        "created": "1700000000"
    })
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api_path("/token/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(server)
        .await;
}

/// A mock server with a working token endpoint, and a client authenticated against it.
pub async fn connected() -> (MockServer, AstroClient) {
    let server = MockServer::start().await;
    mount_token(&server).await;
    let client = AstroClient::with_config(credentials(), config_for(&server))
        .await
        .expect("should authenticate against mock server");
    (server, client)
}

/// Decodes a urlencoded request body into its fields.
pub fn form_fields(request: &Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

/// The decoded `jsonData` field of a request, if any.
pub fn json_data(request: &Request) -> Option<Value> {
    form_fields(request)
        .into_iter()
        .find(|(name, _)| name == "jsonData")
        .and_then(|(_, value)| serde_json::from_str(&value).ok())
}

/// Matches requests whose `jsonData` field decodes to exactly this value.
pub struct JsonData(pub Value);

impl Match for JsonData {
    fn matches(&self, request: &Request) -> bool {
        json_data(request).as_ref() == Some(&self.0)
    }
}

/// Requests received so far, excluding the token exchange.
pub async fn api_requests(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() != api_path("/token/"))
        .collect()
}
