//! # WalletKit API
//!
//! This crate provides the REST/JSON network client used by every other
//! WalletKit component. It issues a single logical request per call, maps
//! JSON responses into typed records, and classifies failures into a fixed
//! four-way taxonomy.
//!
//! ## Outcome taxonomy
//!
//! - [`ApiError::InvalidRequest`] - the request could not be built
//! - [`ApiError::Mapping`] - the payload did not match the expected shape
//! - [`ApiError::NoConnection`] - no response was received (incl. timeout)
//! - [`ApiError::Server`] - non-2xx status with an optional decoded body
//!
//! ## Example
//!
//! ```ignore
//! use walletkit_api::{ApiClient, ApiConfig};
//!
//! let client = ApiClient::new(ApiConfig::new("https://api.example.com"))?;
//! let rates: serde_json::Value = client.get("xrates/latest/USD/index.json", None).await?;
//! ```
//!
//! No retries happen at this layer; transient failures are surfaced
//! immediately. Dropping the returned future cancels the in-flight request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use reqwest::{Client, StatusCode};
pub use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

/// Network client errors, classified by outcome
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be constructed (bad URL, bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The response payload did not match the expected shape
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// No response was received from the server
    #[error("No connection: {0}")]
    NoConnection(String),

    /// The server answered with a non-2xx status
    #[error("Server error: status {status}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Decoded error body, when the body parses as JSON
        body: Option<Value>,
    },
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Configuration for an [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all request paths are resolved against
    pub base_url: String,
    /// Fixed client-side request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Creates a configuration with the given base URL and default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> ApiResult<()> {
        Url::parse(&self.base_url).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(())
    }
}

/// HTTP/JSON client bound to one base URL.
///
/// GET requests encode parameters in the query string; all other methods
/// encode them as a JSON body. The underlying connection pool is reused
/// across calls, so cloning is cheap and the client is safe to share.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    /// Creates a new client from the given configuration.
    ///
    /// A base URL without a trailing slash would drop its last path segment
    /// during joining, so one is appended here.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        config.validate()?;
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client resolves paths against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issues a request and returns the decoded JSON payload.
    ///
    /// The path is resolved against the base URL. GET parameters land in the
    /// query string, everything else becomes a JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Map<String, Value>>,
    ) -> ApiResult<Value> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        tracing::debug!(%method, %url, "api request");

        let mut builder = self.client.request(method.clone(), url);
        if let Some(params) = params {
            if method == Method::GET {
                let pairs: Vec<(String, String)> = params
                    .iter()
                    .map(|(k, v)| (k.clone(), query_value(v)))
                    .collect();
                builder = builder.query(&pairs);
            } else {
                builder = builder.json(params);
            }
        }

        let response = builder.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::NoConnection(e.to_string()))?;

        if !status.is_success() {
            return Err(server_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Mapping(e.to_string()))
    }

    /// Convenience GET returning the raw JSON payload
    pub async fn get(&self, path: &str, params: Option<&Map<String, Value>>) -> ApiResult<Value> {
        self.request(Method::GET, path, params).await
    }

    /// Issues a request and decodes the payload into one structured record
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Map<String, Value>>,
    ) -> ApiResult<T> {
        let value = self.request(method, path, params).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Mapping(e.to_string()))
    }

    /// Issues a request and decodes the payload into a list of records
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Map<String, Value>>,
    ) -> ApiResult<Vec<T>> {
        self.fetch(method, path, params).await
    }
}

/// Renders a JSON parameter value as a query-string value.
///
/// Strings are used verbatim so they are not wrapped in quotes.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn classify_transport_error(err: reqwest::Error) -> ApiError {
    // Connect failures and timeouts also carry the request error kind, so
    // they must be checked before the builder/request classification.
    if err.is_connect() || err.is_timeout() {
        ApiError::NoConnection(err.to_string())
    } else if err.is_builder() {
        ApiError::InvalidRequest(err.to_string())
    } else {
        ApiError::NoConnection(err.to_string())
    }
}

fn server_error(status: StatusCode, body: &str) -> ApiError {
    ApiError::Server {
        status: status.as_u16(),
        body: serde_json::from_str(body).ok(),
    }
}
