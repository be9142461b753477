use super::auth::{ClientCredentialsProvider, TokenProvider};
use super::constants::{headers, tables};
use super::error::{ApiError, ApiResult};
use super::models::Token;
use super::query::{QueryOptions, QueryParameters, ResultPage};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::config::Settings;
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// Business Central OData client.
///
/// Holds the company-scoped base URL, a transport and a token provider.
/// A 401 triggers one token refresh and one retry of the same exchange;
/// everything else is returned to the caller.
pub struct BusinessCentralClient {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    token_provider: Arc<dyn TokenProvider>,
    refresh_lock: Mutex<()>,
}

impl BusinessCentralClient {
    /// Build a reqwest-backed client and acquire the first token
    pub async fn connect(settings: &Settings) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(&settings.transport)?;
        Self::with_transport(settings, Arc::new(transport)).await
    }

    /// Build a client over a custom transport and acquire the first token
    pub async fn with_transport(
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> ApiResult<Self> {
        let token_provider = ClientCredentialsProvider::new(
            &settings.credentials,
            &settings.authority_host,
            transport.clone(),
        )?;

        let client = Self::from_parts(settings.base_url()?, transport, Arc::new(token_provider));
        client.authenticate().await?;
        Ok(client)
    }

    /// Assemble a client without contacting the identity service
    pub fn from_parts(
        base_url: Url,
        transport: Arc<dyn HttpTransport>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            base_url,
            transport,
            token_provider,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn authenticate(&self) -> ApiResult<()> {
        info!("Authenticating against {}", self.base_url);
        self.token_provider.acquire().await?;
        Ok(())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the company-scoped base URL
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Issue a request against `path`.
    ///
    /// GET requests follow `@odata.nextLink` until exhausted and return
    /// the concatenated `value` arrays as a JSON array. Other methods
    /// return the parsed body unchanged.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        params: Option<&QueryParameters>,
    ) -> ApiResult<Value> {
        if method == Method::GET {
            return Ok(Value::Array(self.get_collection(path, params).await?));
        }

        let endpoint = self.endpoint(path)?;
        let query = params.map(QueryParameters::to_pairs).unwrap_or_default();
        let response = self.send_authorized(method, endpoint.as_str(), &query).await?;
        check_status(response)?.json()
    }

    /// Fetch every record of a collection, following next links in order.
    ///
    /// A failure on any page discards the pages already collected.
    pub async fn get_collection(
        &self,
        path: &str,
        params: Option<&QueryParameters>,
    ) -> ApiResult<Vec<Value>> {
        let endpoint = self.endpoint(path)?;
        let query = params.map(QueryParameters::to_pairs).unwrap_or_default();

        let response = self.send_authorized(Method::GET, endpoint.as_str(), &query).await?;
        let first = ResultPage::from_json(check_status(response)?.json()?)?;

        let mut records = first.value;
        let mut next_link = first.next_link;
        let mut pages = 1;

        while let Some(link) = next_link {
            // Next links are absolute and already carry the query
            debug!("Fetching page {} of {}", pages + 1, path);
            let response = self.send_authorized(Method::GET, &link, &[]).await?;
            let page = ResultPage::from_json(check_status(response)?.json()?)?;

            records.extend(page.value);
            next_link = page.next_link;
            pages += 1;
        }

        debug!("Fetched {} records from {} in {} page(s)", records.len(), path, pages);
        Ok(records)
    }

    pub async fn get_customers(&self, options: &QueryOptions) -> ApiResult<Vec<Value>> {
        self.get_collection(tables::CUSTOMERS, Some(&options.to_parameters()))
            .await
    }

    pub async fn get_products(&self, options: &QueryOptions) -> ApiResult<Vec<Value>> {
        self.get_collection(tables::PRODUCTS, Some(&options.to_parameters()))
            .await
    }

    /// Customers whose number matches; uniqueness is not enforced
    pub async fn get_customer(&self, number: &str) -> ApiResult<Vec<Value>> {
        self.get_customers(&QueryOptions::number(number)).await
    }

    /// Products whose number matches; uniqueness is not enforced
    pub async fn get_product(&self, number: &str) -> ApiResult<Vec<Value>> {
        self.get_products(&QueryOptions::number(number)).await
    }

    async fn send_authorized(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
    ) -> ApiResult<HttpResponse> {
        let token = self.current_token().await?;
        let response = self
            .transport
            .send(build_request(method.clone(), url, query, &token))
            .await?;

        if !response.is_unauthorized() {
            return Ok(response);
        }

        warn!("{} {} returned 401, refreshing access token", method, url);
        let token = self.refresh_token(&token).await?;
        let response = self
            .transport
            .send(build_request(method.clone(), url, query, &token))
            .await?;

        if response.is_unauthorized() {
            return Err(ApiError::Authentication(format!(
                "{} {} still unauthorized after token refresh",
                method, url
            )));
        }

        Ok(response)
    }

    async fn current_token(&self) -> ApiResult<Token> {
        if let Some(token) = self.token_provider.current().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        match self.token_provider.current().await {
            Some(token) => Ok(token),
            None => self.token_provider.acquire().await,
        }
    }

    /// Refresh unless another request already replaced `stale`
    async fn refresh_token(&self, stale: &Token) -> ApiResult<Token> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.token_provider.current().await {
            if &current != stale {
                debug!("Access token was refreshed by a concurrent request");
                return Ok(current);
            }
        }

        self.token_provider.refresh().await
    }
}

fn build_request(method: Method, url: &str, query: &[(String, String)], token: &Token) -> HttpRequest {
    HttpRequest::new(method, url)
        .header(headers::AUTHORIZATION, token.authorization())
        .header(headers::ACCEPT, headers::CONTENT_TYPE_JSON)
        .query(query.to_vec())
}

fn check_status(response: HttpResponse) -> ApiResult<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Http {
            status: response.status,
            body: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoTransport;

    #[async_trait]
    impl HttpTransport for NoTransport {
        async fn send(&self, _request: HttpRequest) -> ApiResult<HttpResponse> {
            Err(ApiError::Transport("offline".to_string()))
        }
    }

    struct FixedToken;

    #[async_trait]
    impl TokenProvider for FixedToken {
        async fn acquire(&self) -> ApiResult<Token> {
            Ok(Token::new("t", "Bearer"))
        }

        async fn current(&self) -> Option<Token> {
            Some(Token::new("t", "Bearer"))
        }
    }

    fn client() -> BusinessCentralClient {
        let base = Url::parse(
            "https://api.businesscentral.dynamics.com/v2.0/contoso/Production/ODataV4/Company('CRONUS')/",
        )
        .unwrap();
        BusinessCentralClient::from_parts(base, Arc::new(NoTransport), Arc::new(FixedToken))
    }

    #[test]
    fn test_endpoint_resolution() {
        let client = client();
        assert_eq!(
            client.endpoint("SQLProduct").unwrap().as_str(),
            "https://api.businesscentral.dynamics.com/v2.0/contoso/Production/ODataV4/Company('CRONUS')/SQLProduct"
        );
        assert_eq!(
            client.endpoint("https://elsewhere.example.com/next?page=2").unwrap().as_str(),
            "https://elsewhere.example.com/next?page=2"
        );
    }

    #[test]
    fn test_default_headers() {
        let request = build_request(
            Method::GET,
            "https://example.com/SQLCustomer",
            &[],
            &Token::new("abc", "Bearer"),
        );
        assert_eq!(request.header_value("Authorization"), Some("Bearer abc"));
        assert_eq!(request.header_value("Accept"), Some("application/json"));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(HttpResponse::new(200, "{}")).is_ok());

        let error = check_status(HttpResponse::new(404, "missing")).unwrap_err();
        assert!(matches!(error, ApiError::Http { status: 404, ref body } if body == "missing"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let error = client().get_customers(&QueryOptions::new()).await.unwrap_err();
        assert!(matches!(error, ApiError::Transport(_)));
    }
}
