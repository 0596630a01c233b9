//! Stockroom core: session state, navigation guarding and configuration

pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;

#[cfg(test)]
mod tests;

pub use crate::config::{ApiConfig, ClientConfig};
pub use error::{ConfigError, NavigationError, SessionError, SessionResult};
pub use guard::{
    DASHBOARD_ROUTE, Navigation, NavigationGuard, Route, RouteRecord, RouteTable, SIGNIN_ROUTE,
    SIGNUP_ROUTE,
};
pub use session::{Session, SessionStore, UserProfile};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
