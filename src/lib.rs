//!
//! Library for interacting with the New Relic REST API (v2).
//!
//! ## Client
//! Every request is authenticated with an API key sent in the `X-Api-Key` header.
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), newrelic_client::Error> {
//!     use newrelic_client::ClientBuilder;
//!
//!     let client = ClientBuilder::new("my-api-key")
//!         .timeout(std::time::Duration::from_secs(10))
//!         .build()?;
//!
//!     // List the deployments of an application, first page
//!     let deployments = client.deployments().list(Some(1234), None).await?;
//!     println!("{deployments:#}");
//!     Ok(())
//! }
//! ```
//!
//! ## Deployments
//! ### Record a deployment and remove it again
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), newrelic_client::Error> {
//!     use newrelic_client::{types::DeploymentResponse, ClientBuilder};
//!
//!     // Deleting requires an admin API key
//!     let client = ClientBuilder::new("admin-api-key").build()?;
//!     let deployments = client.deployments();
//!
//!     let created = deployments
//!         .create(1234, "a1b2c3d", "Fixed the login page", "Release 42", "jane")
//!         .await?;
//!     let created: DeploymentResponse = serde_json::from_value(created)?;
//!
//!     deployments.delete(1234, created.deployment.id).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::missing_errors_doc)]
use serde::Deserialize;

pub mod deployments;
pub mod pagination;
pub mod types;

#[cfg(feature = "env-config")]
pub mod env_config;

/// Default location of the v2 REST API
pub const DEFAULT_BASE_URL: &str = "https://api.newrelic.com/v2/";

const API_KEY_HEADER: &str = "X-Api-Key";

/// Description of an error from the REST API
#[derive(Debug, Deserialize)]
pub struct RESTError {
    /// Error message
    pub title: String,
}

/// The error document returned with failed calls, `{"error": {"title": ...}}`
#[derive(Debug, Deserialize)]
struct RESTErrorDocument {
    error: RESTError,
}

/// Error returned by client functions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required environment variable is missing
    #[error("Missing environment variable '{0}'")]
    MissingEnv(String),

    /// Failed returned by the HTTP server
    #[error("HTTP failed {0}, {1}")]
    WebServer(u16, String),

    /// JSON serialization/deserialization error
    #[error("Serde JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client error
    #[error("Reqwest: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// This error is returned from the REST API, this typically means the client did something
    /// wrong.
    #[error("REST error {:?}", .0.title)]
    Rest(RESTError),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// The HTTP primitives a resource is built on. Paths are relative to the
/// configured base URL and `params` is an already rendered query string.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// GET a JSON document
    async fn get(&self, path: &str, params: Option<&str>) -> Result<serde_json::Value>;

    /// POST a JSON document
    async fn post(
        &self,
        path: &str,
        params: Option<&str>,
        data: &serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// DELETE a resource
    async fn delete(&self, path: &str) -> Result<serde_json::Value>;
}

/// Ordered set of optional query parameters.
///
/// A parameter is only rendered when its value is present and non-zero.
#[derive(Clone, Debug, Default)]
pub struct Filters {
    params: Vec<String>,
}

impl Filters {
    /// Create an empty filter set
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Append `key=value` if `value` is present
    #[must_use]
    pub fn push(mut self, key: &str, value: Option<u64>) -> Self {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.params.push(format!("{key}={value}"));
        }
        self
    }

    /// Render the query string, `None` when no parameter is present
    #[must_use]
    pub fn build(&self) -> Option<String> {
        if self.params.is_empty() {
            None
        } else {
            Some(self.params.join("&"))
        }
    }
}

/// Builder for a New Relic [`Client`]
#[derive(Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<std::time::Duration>,
    reqwest_ca: Vec<reqwest::Certificate>,
    disable_cert_verification: bool,
}

impl ClientBuilder {
    /// Create a new builder instance using `api_key` for authentication
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            reqwest_ca: Vec::new(),
            disable_cert_verification: false,
        }
    }

    /// Override the API location, e.g. `https://api.eu.newrelic.com/v2/`
    #[must_use]
    pub fn base_url(self, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..self
        }
    }

    /// Timeout applied to every request
    #[must_use]
    pub fn timeout(self, timeout: std::time::Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Add a root certificate for API certificate verification
    pub fn add_root_certificate(mut self, cert: &[u8]) -> Result<Self> {
        let ca = reqwest::Certificate::from_pem(cert)?;
        self.reqwest_ca.push(ca);
        Ok(self)
    }

    /// Disable certificate verification
    #[must_use]
    pub fn danger_accept_invalid_certs(self) -> Self {
        Self {
            disable_cert_verification: true,
            ..self
        }
    }

    /// Create the client
    pub fn build(&self) -> Result<Client> {
        // Url::join drops the last path segment unless it ends with a slash
        let base_url = if self.base_url.ends_with('/') {
            url::Url::parse(&self.base_url)?
        } else {
            url::Url::parse(&format!("{}/", self.base_url))?
        };

        let client = reqwest::Client::builder();

        // Add CA certificates
        let client = self
            .reqwest_ca
            .iter()
            .fold(client, |client, ca| client.add_root_certificate(ca.clone()));

        let client = client.danger_accept_invalid_certs(self.disable_cert_verification);

        let client = match self.timeout {
            Some(timeout) => client.timeout(timeout),
            None => client,
        };

        Ok(Client {
            base_url,
            api_key: self.api_key.clone(),
            client: client.build()?,
        })
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("disable_cert_verification", &self.disable_cert_verification)
            .finish_non_exhaustive()
    }
}

/// The `Client` is used for all interaction with the REST API.
/// Use a [`ClientBuilder`] to create an instance.
#[derive(Clone)]
pub struct Client {
    base_url: url::Url,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a Client builder
    #[must_use]
    pub fn builder(api_key: &str) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// The base URL all paths are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Access the deployments resource
    #[must_use]
    pub const fn deployments(&self) -> deployments::Deployments<'_, Self> {
        deployments::Deployments::new(self)
    }

    /// Resolve `path` against the base URL and attach the query string verbatim.
    pub fn url(&self, path: &str, params: Option<&str>) -> Result<url::Url> {
        let mut url = self.base_url.join(path)?;
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.set_query(Some(params));
        }
        Ok(url)
    }

    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<(reqwest::header::HeaderMap, serde_json::Value)> {
        let result = builder
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = result.status();
        let headers = result.headers().clone();
        let url = result.url().clone();
        let body = result.bytes().await?;

        if status.is_success() {
            Ok((headers, parse_body(&body)?))
        } else {
            tracing::error!("call to {} failed: {}", url, status);
            Err(error_from_body(status, &body))
        }
    }
}

/// Parse a successful response body, an empty body is an empty object.
fn parse_body(body: &[u8]) -> Result<serde_json::Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

fn error_from_body(status: reqwest::StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<RESTErrorDocument>(body) {
        Ok(doc) => Error::Rest(doc.error),
        Err(_) => Error::WebServer(status.as_u16(), status.to_string()),
    }
}

#[async_trait::async_trait]
impl Transport for Client {
    async fn get(&self, path: &str, params: Option<&str>) -> Result<serde_json::Value> {
        let url = self.url(path, params)?;
        tracing::debug!("GET {}", url);

        let (headers, mut value) = self.execute(self.client.get(url)).await?;

        let links = headers
            .get_all(reqwest::header::LINK)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .collect::<Vec<_>>();
        if !links.is_empty() {
            pagination::merge_pages(&mut value, &links.join(", "));
        }
        Ok(value)
    }

    async fn post(
        &self,
        path: &str,
        params: Option<&str>,
        data: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = self.url(path, params)?;
        tracing::debug!("POST {} {:?}", url, data);

        let (_, value) = self.execute(self.client.post(url).json(data)).await?;
        Ok(value)
    }

    async fn delete(&self, path: &str) -> Result<serde_json::Value> {
        let url = self.url(path, None)?;
        tracing::debug!("DELETE {}", url);

        let (_, value) = self.execute(self.client.delete(url)).await?;
        Ok(value)
    }
}
