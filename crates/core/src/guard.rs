//! Navigation guard and application route table
//!
//! The guard is a pure function of route metadata and the session's
//! authentication flag. It only checks that a token is present; expiry is
//! not verified here.

use crate::error::NavigationError;
use crate::session::SessionStore;
use std::sync::Arc;
use tracing::debug;

/// Sign-in entry route
pub const SIGNIN_ROUTE: &str = "/signin";
/// Sign-up entry route
pub const SIGNUP_ROUTE: &str = "/signup";
/// Default landing route for authenticated users
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// A route record in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub requires_auth: bool,
    /// Static redirect applied before the guard runs
    pub redirect: Option<&'static str>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    fn leaf(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name: Some(name),
            requires_auth: false,
            redirect: None,
            children: Vec::new(),
        }
    }
}

/// A resolved navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub name: Option<&'static str>,
    /// True if any matched record requires authentication
    pub requires_auth: bool,
}

impl Route {
    /// Build route metadata directly, bypassing the table
    pub fn new(path: impl Into<String>, requires_auth: bool) -> Self {
        Self {
            path: path.into(),
            name: None,
            requires_auth,
        }
    }

    fn is_entry(&self) -> bool {
        self.path == SIGNIN_ROUTE || self.path == SIGNUP_ROUTE
    }
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The transition may proceed unchanged
    Allow,
    /// The transition is replaced by one to this path
    Redirect(&'static str),
}

/// The application's routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            records: vec![
                RouteRecord {
                    path: "/",
                    name: None,
                    requires_auth: false,
                    redirect: Some(SIGNIN_ROUTE),
                    children: Vec::new(),
                },
                RouteRecord::leaf(SIGNIN_ROUTE, "Signin"),
                RouteRecord::leaf(SIGNUP_ROUTE, "Signup"),
                RouteRecord {
                    path: DASHBOARD_ROUTE,
                    name: None,
                    requires_auth: true,
                    redirect: None,
                    children: vec![
                        RouteRecord::leaf("", "Dashboard"),
                        RouteRecord::leaf("/inventory", "Inventory"),
                        RouteRecord::leaf("/sessions", "Session"),
                    ],
                },
            ],
        }
    }
}

impl RouteTable {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        Self { records }
    }

    /// Resolve a path to its static redirect, if the matched record has one
    pub fn redirect_for(&self, path: &str) -> Option<&'static str> {
        self.records
            .iter()
            .find(|r| r.path == path)
            .and_then(|r| r.redirect)
    }

    /// Resolve a path against the table.
    ///
    /// Child paths starting with `/` are absolute; others are relative to
    /// the parent. `requires_auth` is inherited along the matched chain.
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let path = normalize(path);
        self.records
            .iter()
            .find_map(|record| match_record(record, "", false, &path))
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn match_record(
    record: &RouteRecord,
    parent_path: &str,
    parent_requires_auth: bool,
    target: &str,
) -> Option<Route> {
    let full_path = if record.path.starts_with('/') {
        record.path.to_string()
    } else if record.path.is_empty() {
        parent_path.to_string()
    } else {
        format!("{parent_path}/{}", record.path)
    };
    let requires_auth = parent_requires_auth || record.requires_auth;

    for child in &record.children {
        if let Some(route) = match_record(child, &full_path, requires_auth, target) {
            return Some(route);
        }
    }

    (full_path == target).then(|| Route {
        path: full_path,
        name: record.name,
        requires_auth,
    })
}

/// Decides whether a route transition is permitted
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: Arc<SessionStore>,
    routes: RouteTable,
}

impl NavigationGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self::with_routes(session, RouteTable::default())
    }

    pub fn with_routes(session: Arc<SessionStore>, routes: RouteTable) -> Self {
        Self { session, routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Apply the guard policy to a resolved route
    pub fn check(&self, target: &Route) -> Navigation {
        decide(target, self.session.is_authenticated())
    }

    /// Resolve a path through the table and apply the guard policy.
    ///
    /// Static redirects such as `/` → `/signin` are reported before the
    /// policy runs on the redirected target.
    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        let normalized = normalize(path);
        let (target_path, static_redirect) = match self.routes.redirect_for(&normalized) {
            Some(redirect) => (redirect.to_string(), Some(redirect)),
            None => (normalized, None),
        };

        let route = self
            .routes
            .resolve(&target_path)
            .ok_or_else(|| NavigationError::UnknownRoute(path.to_string()))?;

        let decision = match (self.check(&route), static_redirect) {
            (Navigation::Allow, Some(redirect)) => Navigation::Redirect(redirect),
            (decision, _) => decision,
        };

        debug!(path, ?decision, "Navigation checked");
        Ok(decision)
    }
}

/// Guard policy, evaluated in order
pub fn decide(target: &Route, is_authenticated: bool) -> Navigation {
    if target.requires_auth && !is_authenticated {
        Navigation::Redirect(SIGNIN_ROUTE)
    } else if !target.requires_auth && is_authenticated && target.is_entry() {
        Navigation::Redirect(DASHBOARD_ROUTE)
    } else {
        Navigation::Allow
    }
}
