//! Shared HTTP transport for the backend REST API.

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cart::CartClient;
use super::error::ApiError;
use super::filters::FilterStoreClient;
use super::search::SearchClient;
use super::types::{ErrorResponse, HealthResponse};
use crate::config::ClientConfig;

/// HTTP client bound to one backend base URL.
///
/// Cheap to clone; the three endpoint clients share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_http(builder.build()?, config.api_base_url.clone()))
    }

    /// Create a client from an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: ensure_trailing_slash(base_url),
        }
    }

    /// Backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client for the filter store endpoints.
    #[must_use]
    pub fn filters(&self) -> FilterStoreClient {
        FilterStoreClient::new(self.clone())
    }

    /// Client for the product search endpoint.
    #[must_use]
    pub fn search(&self) -> SearchClient {
        SearchClient::new(self.clone())
    }

    /// Client for the cart preparation endpoint.
    #[must_use]
    pub fn cart(&self) -> CartClient {
        CartClient::new(self.clone())
    }

    /// Check that the backend is up.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a health report.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint("api/health")?;
        let health: HealthResponse = self.send(Method::GET, url, None::<&()>).await?;
        debug!(status = %health.status, "Backend health checked");
        Ok(health)
    }

    /// Resolve an API path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    /// Send a request with an optional JSON body and decode the response.
    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_body(status, &body)
    }
}

/// Decode a response body, normalizing every failure into an [`ApiError`].
///
/// A non-success status is a server error, carrying the body's `error`
/// field when one can be read. A success status whose body carries an
/// `error` field is treated the same way.
pub(crate) fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, ApiError> {
    // A blank `error` field carries no failure.
    let error_message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error)
        .filter(|m| !m.trim().is_empty());

    if !status.is_success() || error_message.is_some() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: error_message,
        });
    }

    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
