//! Public authentication endpoints
//!
//! These never carry an `Authorization` header, even when the session
//! already holds a token.

use super::request::ApiRequest;
use super::{ClientError, ErrorFallback, Payload, StockroomClient};
use crate::types::{Credentials, SigninResponse};
use serde::Serialize;
use serde_json::Value;

impl StockroomClient {
    /// Sign in and return the raw response, which carries the issued token
    pub async fn signin(&self, credentials: &Credentials) -> Result<Payload, ClientError> {
        let request = ApiRequest::post("/signin").json(credentials)?;
        self.send_public(request, ErrorFallback::InvalidCredentials)
            .await
    }

    /// Sign in and decode the issued token.
    ///
    /// The session is not modified; storing the token is up to the caller.
    pub async fn signin_for_token(
        &self,
        credentials: &Credentials,
    ) -> Result<SigninResponse, ClientError> {
        let payload = self.signin(credentials).await?.unwrap_or(Value::Null);
        SigninResponse::from_value(payload).map_err(ClientError::Decode)
    }

    /// Register a new user and company
    pub async fn signup<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Payload, ClientError> {
        let request = ApiRequest::post("/signup").json(payload)?;
        self.send_public(request, ErrorFallback::Signup).await
    }
}
