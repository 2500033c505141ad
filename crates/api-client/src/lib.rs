//! Client for the storefront's remote product API.
//!
//! The backend is reached through same-origin proxy routes that return JSON
//! arrays:
//! - `GET {base}/api/products`
//! - `GET {base}/api/categories`
//! - `GET {base}/api/seasons`
//!
//! This crate only moves bytes and checks the envelope (status code, top-level
//! array). Turning records into catalog types is the `catalog` crate's job.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the product API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: &'static str, reason: String },
}

/// The list endpoints exposed by the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Products,
    Categories,
    Seasons,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Products => "api/products",
            Self::Categories => "api/categories",
            Self::Seasons => "api/seasons",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Seasons => "seasons",
        }
    }
}

/// Connection settings
#[derive(Debug)]
pub struct ApiConfig {
    /// Origin serving the proxy routes, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Bearer token, forwarded as-is
    pub token: Option<SecretString>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }
}

/// Client for the product API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client.
    ///
    /// # Errors
    /// The base URL is not http(s), the token is not a valid header value,
    /// or the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Config(format!("Invalid token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        info!("Product API client configured for {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// GET a list endpoint and return its records as raw JSON values.
    pub async fn fetch_list(&self, endpoint: Endpoint) -> Result<Vec<Value>, ApiError> {
        let url = self.endpoint_url(endpoint);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("{} returned {}", url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let records = decode_list(&body, endpoint)?;
        debug!("Fetched {} {} records", records.len(), endpoint.name());
        Ok(records)
    }

    pub async fn fetch_products(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch_list(Endpoint::Products).await
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch_list(Endpoint::Categories).await
    }

    pub async fn fetch_seasons(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch_list(Endpoint::Seasons).await
    }
}

/// Decode a list response body.
///
/// Besides a bare array, a `{"data": [...]}` wrapper is accepted.
pub fn decode_list(body: &str, endpoint: Endpoint) -> Result<Vec<Value>, ApiError> {
    let invalid = |reason: String| ApiError::InvalidResponse {
        endpoint: endpoint.name(),
        reason,
    };
    let value: Value = serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(invalid("expected a JSON array".to_string())),
        },
        _ => Err(invalid("expected a JSON array".to_string())),
    }
}
