//! Authenticated HTTP client for the backend API.
//!
//! This module wraps a pooled reqwest client with the two behaviors every
//! API call shares: injecting the `Authorization: Bearer` header whenever a
//! session token is set, and mapping `401 Unauthorized` responses to
//! [`ApiError::Unauthorized`] so the auth layer can log the session out.
//!
//! There is deliberately no retry or backoff here; a failed call surfaces
//! immediately and the caller decides what to do.
//!
//! # Example
//!
//! ```no_run
//! use magiccode_client::client::{ApiClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ClientConfig::new("https://blog.example.com/api".to_string());
//!     let mut client = ApiClient::new(config).unwrap();
//!     client.set_token("session-token");
//!
//!     let posts: serde_json::Value = client.get("/posts").await.unwrap();
//!     println!("{posts}");
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Errors that can occur during API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the session (401). The auth layer should log out
    /// and disarm the expiry watchdog.
    #[error("authentication required")]
    Unauthorized,

    /// The server returned a non-success status other than 401.
    #[error("server error: {status} - {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The request failed before a response arrived, or the response body
    /// could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API (e.g. `https://blog.example.com/api`).
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default 15-second timeout.
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client with bearer-token injection and 401 mapping.
#[derive(Debug)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client with connection pooling and the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            client,
            token: None,
        })
    }

    /// Sets the session token attached to subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Clears the session token; subsequent requests go out unauthenticated.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Returns the currently attached session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Sends a GET request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    /// Sends a PUT request with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).json(body))
            .await
    }

    /// Sends a DELETE request, discarding any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Builds a request for `path`, attaching the bearer token when set.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = join_url(&self.config.base_url, path);
        debug!(%method, %url, "building API request");

        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and decodes the JSON response body.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Maps error statuses to [`ApiError`], passing successes through.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("API rejected session token");
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// Joins a base URL and a path with exactly one slash between them.
fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
