//! Request descriptor for a single outbound call

use super::ClientError;
use super::query::with_query;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

/// Describes one call: endpoint, method, optional body, extra headers and
/// query. Built per call and consumed by the dispatch primitive.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) endpoint: String,
    pub(crate) body: Option<Value>,
    pub(crate) headers: HeaderMap,
}

impl ApiRequest {
    /// Create a request for an endpoint path relative to the base URL
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Add or override a header. Caller headers win over the defaults.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append a cleaned parameter bag as the query string
    pub fn query<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self, ClientError> {
        self.endpoint = with_query(&self.endpoint, params)?;
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Percent-encode a resource id for use as a single path segment
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
