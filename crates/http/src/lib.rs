//! Stockroom HTTP client
//!
//! A single request pipeline for the Stockroom backend: bearer-token
//! injection from the shared session store, JSON encoding, and one
//! normalized error type for every resource.

pub mod client;
pub mod types;

pub use client::{ApiRequest, ClientError, ErrorFallback, Payload, StockroomClient};
pub use types::{Credentials, ListParams, SigninResponse, StockMovement};
