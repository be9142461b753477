//! Client configuration loaded from the environment or a `.env` file

use crate::api::constants;
use crate::api::error::ApiResult;
use crate::api::models::Credentials;
use crate::api::transport::TransportOptions;
use log::{debug, info};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const TENANT_ID: &str = "TENANT_ID";
pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const COMPANY: &str = "COMPANY";
pub const CLIENT_ID: &str = "CLIENT_ID";
pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const SCOPES: &str = "SCOPES";
pub const API_HOST: &str = "BC_API_HOST";
pub const AUTHORITY_HOST: &str = "BC_AUTHORITY_HOST";
pub const TIMEOUT_SECS: &str = "BC_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to load env file '{path}': {reason}")]
    EnvFile { path: String, reason: String },
}

/// Everything needed to connect a client
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub api_host: Url,
    pub authority_host: Url,
    pub transport: TransportOptions,
}

impl Settings {
    /// Settings for the public Business Central cloud
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_host: default_host(constants::API_HOST),
            authority_host: default_host(constants::AUTHORITY_HOST),
            transport: TransportOptions::default(),
        }
    }

    pub fn with_api_host(mut self, host: Url) -> Self {
        self.api_host = with_trailing_slash(host);
        self
    }

    pub fn with_authority_host(mut self, host: Url) -> Self {
        self.authority_host = with_trailing_slash(host);
        self
    }

    /// Load from the process environment, reading `./.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        info!("Loading client settings from environment variables");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load a specific `.env` file into the environment, then read it
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading client settings from {}", path.display());

        dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let credentials = Credentials::new(
            require(TENANT_ID)?,
            require(ENVIRONMENT)?,
            require(COMPANY)?,
            require(CLIENT_ID)?,
            require(CLIENT_SECRET)?,
        )
        .with_scopes(lookup(SCOPES).map(|s| parse_scopes(&s)).unwrap_or_default());

        let mut settings = Self::new(credentials);

        if let Some(host) = lookup(API_HOST) {
            settings = settings.with_api_host(parse_host(API_HOST, &host)?);
        }
        if let Some(host) = lookup(AUTHORITY_HOST) {
            settings = settings.with_authority_host(parse_host(AUTHORITY_HOST, &host)?);
        }
        if let Some(secs) = lookup(TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                name: TIMEOUT_SECS,
                reason: format!("'{}' is not a number of seconds", secs),
            })?;
            settings.transport.timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }

    /// Company-scoped OData base URL, always ending in `/`
    pub fn base_url(&self) -> ApiResult<Url> {
        let credentials = &self.credentials;
        let segments = constants::company_segments(
            &credentials.tenant_id,
            &credentials.environment,
            &credentials.company,
        );

        let mut base = self.api_host.clone();
        base.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(&segments)
            .push("");
        Ok(base)
    }
}

/// Split a scope list on whitespace or commas
fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_host(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn default_host(raw: &str) -> Url {
    Url::parse(raw).expect("built-in host is a valid URL")
}

// Url::join replaces the last segment unless the base ends in '/'
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
