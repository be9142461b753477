use super::constants::DEFAULT_SCOPE;
use std::fmt;

/// Client-credentials identity of a Business Central company
#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub environment: String,
    pub company: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

impl Credentials {
    pub fn new(
        tenant_id: impl Into<String>,
        environment: impl Into<String>,
        company: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            environment: environment.into(),
            company: company.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: vec![DEFAULT_SCOPE.to_string()],
        }
    }

    /// Replace the requested scopes; an empty list keeps the default scope
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        if !scopes.is_empty() {
            self.scopes = scopes;
        }
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("environment", &self.environment)
            .field("company", &self.company)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Bearer token issued by the identity service.
///
/// Expiry is not tracked; an expired token shows up as a 401.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}
