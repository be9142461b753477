use super::constants::{self, headers};
use super::error::{ApiError, ApiResult};
use super::models::{Credentials, Token};
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Source of bearer tokens for the API client
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Request a new token and store it as the current one
    async fn acquire(&self) -> ApiResult<Token>;

    /// Same as [`acquire`](Self::acquire): every refresh is a full grant
    async fn refresh(&self) -> ApiResult<Token> {
        self.acquire().await
    }

    /// The most recently acquired token
    async fn current(&self) -> Option<Token>;
}

/// OAuth2 client-credentials grant against the tenant's authority
pub struct ClientCredentialsProvider {
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    token_url: String,
    transport: Arc<dyn HttpTransport>,
    token: RwLock<Option<Token>>,
}

impl ClientCredentialsProvider {
    pub fn new(
        credentials: &Credentials,
        authority_host: &Url,
        transport: Arc<dyn HttpTransport>,
    ) -> ApiResult<Self> {
        let token_url = authority_host
            .join(&constants::token_path(&credentials.tenant_id))?
            .to_string();

        Ok(Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            scopes: credentials.scopes.clone(),
            token_url,
            transport,
            token: RwLock::new(None),
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn acquire(&self) -> ApiResult<Token> {
        log::info!("Requesting access token for client {}", self.client_id);

        let request = HttpRequest::new(Method::POST, self.token_url.as_str())
            .header(headers::ACCEPT, headers::CONTENT_TYPE_JSON)
            .form(vec![
                ("grant_type".to_string(), "client_credentials".to_string()),
                ("client_id".to_string(), self.client_id.clone()),
                ("client_secret".to_string(), self.client_secret.clone()),
                ("scope".to_string(), self.scopes.join(" ")),
            ]);

        let response = self.transport.send(request).await?;
        log::debug!("Token request status: {}", response.status);

        // Nothing is stored unless the response carries a token
        let token = parse_token_response(&response)?;
        *self.token.write().await = Some(token.clone());

        log::info!("Access token acquired for client {}", self.client_id);
        Ok(token)
    }

    async fn current(&self) -> Option<Token> {
        self.token.read().await.clone()
    }
}

fn parse_token_response(response: &HttpResponse) -> ApiResult<Token> {
    let token_data: Value = serde_json::from_str(&response.body).map_err(|_| {
        ApiError::Authentication(format!(
            "identity service returned status {} without a JSON body",
            response.status
        ))
    })?;

    if let Some(access_token) = token_data
        .get("access_token")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
    {
        let token_type = token_data
            .get("token_type")
            .and_then(|t| t.as_str())
            .unwrap_or(constants::DEFAULT_TOKEN_TYPE);

        return Ok(Token::new(access_token, token_type));
    }

    let reason = token_data
        .get("error_description")
        .or_else(|| token_data.get("error"))
        .and_then(|e| e.as_str())
        .unwrap_or("no access token in response");

    Err(ApiError::Authentication(format!(
        "unable to obtain access token (status {}): {}",
        response.status, reason
    )))
}
