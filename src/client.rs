//! HTTP client for the remote keyprint service.
//!
//! This module provides the transport layer for storing and verifying
//! keyprint snapshots against the verification service. Requests are
//! bounded-time (10 seconds by default) and never retried; a timed-out
//! request surfaces as a distinct error so callers can offer a retry.

use crate::core::KeyprintSnapshot;
use serde::Serialize;
use std::time::Duration;

/// Default request timeout enforced by the client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default base URL for a locally running keyprint service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (no trailing slash required)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout. Intended for tests; production callers
    /// should keep the 10-second default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the store endpoint URL.
    pub fn store_url(&self) -> String {
        format!("{}/api/store-keyprint", self.base_url.trim_end_matches('/'))
    }

    /// Get the verify endpoint URL.
    pub fn verify_url(&self) -> String {
        format!("{}/api/verify-keyprint", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Keyprint client error types.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid input, raised before any network attempt
    Validation(String),
    /// Request exceeded the client-enforced timeout
    Timeout,
    /// Network/transport error
    Network(String),
    /// Server returned a non-success status
    Server { status: u16, message: String },
    /// Response body could not be interpreted
    Serialization(String),
    /// Client construction error
    Config(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation error: {msg}"),
            ApiError::Timeout => write!(f, "Request timed out"),
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::Server { status, message } => {
                write!(f, "API error ({status}): {message}")
            }
            ApiError::Serialization(msg) => write!(f, "Response error: {msg}"),
            ApiError::Config(msg) => write!(f, "Client config error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Whether this error is the timeout condition.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }
}

/// Wire request body shared by the store and verify endpoints.
#[derive(Debug, Serialize)]
struct KeyprintRequest<'a> {
    user_id: &'a str,
    keyprint: KeyprintPayload<'a>,
}

/// Wire shape of a snapshot (snake_case, per the service API).
#[derive(Debug, Serialize)]
struct KeyprintPayload<'a> {
    intervals: &'a [u64],
    duration: u64,
    backspace_count: u64,
}

impl<'a> KeyprintRequest<'a> {
    fn new(user_id: &'a str, snapshot: &'a KeyprintSnapshot) -> Self {
        Self {
            user_id,
            keyprint: KeyprintPayload {
                intervals: &snapshot.intervals,
                duration: snapshot.duration,
                backspace_count: snapshot.backspace_count,
            },
        }
    }
}

/// Normalized verification result.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyResult {
    /// Whether the submitted keyprint matched the stored one
    pub is_match: bool,
    /// Similarity score reported by the service, 0 when absent or non-numeric
    pub similarity: f64,
}

impl std::fmt::Display for VerifyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "match: {}, similarity: {:.2}",
            self.is_match, self.similarity
        )
    }
}

/// Normalize a verify response body into a fixed result shape.
///
/// The service may wrap its payload one level under a `data` field; the
/// match flag must be boolean `true` to count, and the similarity defaults
/// to 0 when absent or non-numeric.
pub(crate) fn normalize_verify_response(body: &serde_json::Value) -> VerifyResult {
    let payload = match body.get("data") {
        Some(data) if !data.is_null() => data,
        _ => body,
    };

    let is_match = payload
        .get("match_")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    let similarity = payload
        .get("similarity")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0);

    VerifyResult {
        is_match,
        similarity,
    }
}

/// Validate inputs before issuing any request.
fn validate(user_id: &str, snapshot: &KeyprintSnapshot) -> Result<(), ApiError> {
    if user_id.is_empty() {
        return Err(ApiError::Validation("User ID is required".to_string()));
    }
    if snapshot.is_empty() {
        return Err(ApiError::Validation(
            "Keyprint data with at least one interval is required".to_string(),
        ));
    }
    Ok(())
}

/// Map a reqwest failure to the client error taxonomy.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Async client for the keyprint service.
pub struct KeyprintClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl KeyprintClient {
    /// Create a new keyprint client.
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Store a user's keyprint snapshot.
    ///
    /// Returns the raw JSON response; the service's store response shape is
    /// opaque to this client beyond being a JSON object.
    pub async fn store(
        &self,
        user_id: &str,
        snapshot: &KeyprintSnapshot,
    ) -> Result<serde_json::Value, ApiError> {
        validate(user_id, snapshot)?;

        let body = self
            .post_keyprint(&self.config.store_url(), user_id, snapshot)
            .await?;

        if !body.is_object() {
            return Err(ApiError::Serialization(
                "Unexpected response format".to_string(),
            ));
        }

        Ok(body)
    }

    /// Verify a user's keyprint snapshot against their stored one.
    pub async fn verify(
        &self,
        user_id: &str,
        snapshot: &KeyprintSnapshot,
    ) -> Result<VerifyResult, ApiError> {
        validate(user_id, snapshot)?;

        let body = self
            .post_keyprint(&self.config.verify_url(), user_id, snapshot)
            .await?;

        if !body.is_object() {
            return Err(ApiError::Serialization(
                "Invalid API response format".to_string(),
            ));
        }

        Ok(normalize_verify_response(&body))
    }

    /// Issue a single bounded-time POST and parse the JSON response body.
    async fn post_keyprint(
        &self,
        url: &str,
        user_id: &str,
        snapshot: &KeyprintSnapshot,
    ) -> Result<serde_json::Value, ApiError> {
        let request = KeyprintRequest::new(user_id, snapshot);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Blocking keyprint client for use in synchronous contexts.
pub struct BlockingKeyprintClient {
    inner: KeyprintClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingKeyprintClient {
    /// Create a new blocking keyprint client.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: KeyprintClient::new(config),
            runtime,
        })
    }

    /// Store a user's keyprint snapshot.
    pub fn store(
        &self,
        user_id: &str,
        snapshot: &KeyprintSnapshot,
    ) -> Result<serde_json::Value, ApiError> {
        self.runtime.block_on(self.inner.store(user_id, snapshot))
    }

    /// Verify a user's keyprint snapshot against their stored one.
    pub fn verify(
        &self,
        user_id: &str,
        snapshot: &KeyprintSnapshot,
    ) -> Result<VerifyResult, ApiError> {
        self.runtime.block_on(self.inner.verify(user_id, snapshot))
    }
}
