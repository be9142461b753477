//! Shared fixtures for the client integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bc_client::api::{ApiError, ApiResult, Credentials, HttpRequest, HttpResponse, HttpTransport};
use bc_client::config::Settings;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const BASE_URL: &str =
    "https://api.businesscentral.dynamics.com/v2.0/contoso/Production/ODataV4/Company('CRONUS')/";

pub const TOKEN_URL: &str = "https://login.microsoftonline.com/contoso/oauth2/v2.0/token";

pub fn settings() -> Settings {
    Settings::new(Credentials::new(
        "contoso",
        "Production",
        "CRONUS",
        "app-id",
        "s3cret",
    ))
}

pub fn page(values: Value, next_link: Option<&str>) -> HttpResponse {
    let mut body = json!({ "value": values });
    if let Some(link) = next_link {
        body["@odata.nextLink"] = Value::from(link);
    }
    HttpResponse::new(200, body.to_string())
}

pub fn unauthorized() -> HttpResponse {
    HttpResponse::new(
        401,
        r#"{"error":{"code":"Authentication_InvalidCredentials","message":"The token has expired."}}"#,
    )
}

/// In-memory transport.
///
/// Token requests are answered with sequential tokens `token-1`,
/// `token-2`, ... unless a token response was queued. API requests are
/// answered from a FIFO queue; an empty queue is a transport failure.
pub struct ScriptedTransport {
    token_responses: Mutex<VecDeque<HttpResponse>>,
    api_responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    issued_tokens: Mutex<u32>,
}

impl ScriptedTransport {
    pub fn new(api_responses: Vec<HttpResponse>) -> Self {
        Self {
            token_responses: Mutex::new(VecDeque::new()),
            api_responses: Mutex::new(api_responses.into()),
            requests: Mutex::new(Vec::new()),
            issued_tokens: Mutex::new(0),
        }
    }

    pub fn with_token_responses(self, responses: Vec<HttpResponse>) -> Self {
        *self.token_responses.lock().unwrap() = responses.into();
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == TOKEN_URL)
            .collect()
    }

    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url != TOKEN_URL)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let is_token_request = request.url == TOKEN_URL;
        self.requests.lock().unwrap().push(request);

        if is_token_request {
            if let Some(response) = self.token_responses.lock().unwrap().pop_front() {
                return Ok(response);
            }
            let mut issued = self.issued_tokens.lock().unwrap();
            *issued += 1;
            let body = json!({ "access_token": format!("token-{}", *issued), "token_type": "Bearer" });
            return Ok(HttpResponse::new(200, body.to_string()));
        }

        self.api_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("no scripted response left".to_string()))
    }
}
