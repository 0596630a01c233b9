//! Request and response shapes exchanged with the backend
//!
//! Resource payloads are opaque to the client and travel as JSON values;
//! only the shapes the client itself inspects are typed here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Paging and filtering parameters accepted by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub filter: Option<String>,
}

/// Sign-in credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stock movement payload for the input/output endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obs: Option<String>,
}

/// Successful sign-in response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigninResponse {
    /// Bearer token issued by the backend
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,

    /// Remaining response fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SigninResponse {
    /// Extract the issued token from a raw sign-in payload
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
