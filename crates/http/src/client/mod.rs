//! Stockroom API client
//!
//! Every backend call goes through [`StockroomClient::send`] (or
//! [`StockroomClient::send_public`] for sign-in/sign-up), which is the
//! only place credentials are injected and failures are normalized.

pub mod auth;
pub mod error;
pub mod inventory;
pub mod query;
pub mod request;
pub mod sessions;
pub mod users;

pub use error::ClientError;
pub use request::ApiRequest;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use stockroom_core::{ClientConfig, SessionStore};
use tracing::{debug, warn};

/// Message used for a sign-in failure without a server-provided message
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Result of a successful call: the decoded JSON body, or `None` for
/// `204 No Content`.
pub type Payload = Option<Value>;

/// How a failure without a usable `message` field is described
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFallback {
    /// `request failed with status N`
    Status,
    /// Sign-in rejected: `invalid credentials`
    InvalidCredentials,
    /// `sign-up failed with status N`
    Signup,
}

impl ErrorFallback {
    fn message(self, status: StatusCode) -> String {
        match self {
            Self::Status => format!("request failed with status {}", status.as_u16()),
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            Self::Signup => format!("sign-up failed with status {}", status.as_u16()),
        }
    }
}

/// Stockroom API client
#[derive(Clone)]
pub struct StockroomClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl StockroomClient {
    /// Create a new client with default configuration
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
    ) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).session(session).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(
        config: &ClientConfig,
        session: Arc<SessionStore>,
    ) -> Result<Self, ClientError> {
        let mut builder = Self::builder()
            .base_url(config.base_url())
            .session(session);
        if let Some(timeout) = config.api.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Create a new client builder
    pub fn builder() -> StockroomClientBuilder {
        StockroomClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the session store this client reads credentials from
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send a request with the current bearer token, if any
    pub async fn send(&self, request: ApiRequest) -> Result<Payload, ClientError> {
        let token = self.session.token();
        self.dispatch(request, token.as_deref(), ErrorFallback::Status)
            .await
    }

    /// Send a request without credentials, whatever the session holds
    pub async fn send_public(
        &self,
        request: ApiRequest,
        fallback: ErrorFallback,
    ) -> Result<Payload, ClientError> {
        self.dispatch(request, None, fallback).await
    }

    /// Build the outgoing request: default headers, caller overrides, then
    /// the bearer token when one is supplied
    fn build(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = format!("{}{}", self.base_url, request.endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.extend(request.headers);

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = self.client.request(request.method, url).headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        Ok(builder)
    }

    async fn dispatch(
        &self,
        request: ApiRequest,
        token: Option<&str>,
        fallback: ErrorFallback,
    ) -> Result<Payload, ClientError> {
        let method = request.method.clone();
        let endpoint = request.endpoint.clone();
        debug!(%method, %endpoint, authenticated = token.is_some(), "Dispatching request");

        let response = self.build(request, token)?.send().await.map_err(|e| {
            warn!(%method, %endpoint, "Request failed before a response: {e}");
            ClientError::Transport(e)
        })?;

        let result = Self::interpret(response, fallback).await;
        if let Err(e) = &result {
            warn!(%method, %endpoint, status = ?e.status(), "Request failed: {e}");
        }
        result
    }

    /// Turn a response into a payload or a single descriptive error
    async fn interpret(
        response: reqwest::Response,
        fallback: ErrorFallback,
    ) -> Result<Payload, ClientError> {
        let status = response.status();

        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(None);
            }
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(ClientError::Decode);
        }

        // Unreadable or non-JSON error bodies fall back to a generic message
        let bytes = response.bytes().await.unwrap_or_default();
        let message = error_message(&bytes).unwrap_or_else(|| fallback.message(status));

        Err(match fallback {
            ErrorFallback::InvalidCredentials => ClientError::InvalidCredentials {
                status: status.as_u16(),
                message,
            },
            ErrorFallback::Status | ErrorFallback::Signup => {
                ClientError::from_status(status, message)
            }
        })
    }
}

/// Extract a non-empty `message` string from a JSON error body
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

impl std::fmt::Debug for StockroomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockroomClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builder for StockroomClient
#[derive(Default)]
pub struct StockroomClientBuilder {
    base_url: Option<String>,
    session: Option<Arc<SessionStore>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl StockroomClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session store credentials are read from
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<StockroomClient, ClientError> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let session = self
            .session
            .ok_or_else(|| ClientError::Configuration("session store is required".into()))?;

        // Endpoints start with '/', so the base URL must not end with one
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("stockroom/", env!("CARGO_PKG_VERSION")).to_string());
        client_builder = client_builder.user_agent(user_agent);

        let client = client_builder.build()?;

        Ok(StockroomClient {
            client,
            base_url,
            session,
        })
    }
}
