//! Session store: the single source of truth for authentication state
//!
//! The store is constructed once and shared as `Arc<SessionStore>` with the
//! API client and the navigation guard. Only the owner of the store (the
//! front end) mutates it; everything else reads snapshots.

use crate::error::{SessionError, SessionResult};
use crate::storage::TokenStorage;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Profile data for the signed-in user. Not populated by current flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Snapshot of the current authentication context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// True iff a non-empty token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Persisted authentication state
pub struct SessionStore {
    current: ArcSwap<Session>,
    storage: Box<dyn TokenStorage>,
    // Serializes writers so the durable copy and the snapshot never diverge
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Open the store, seeding it from the durable copy.
    ///
    /// An unreadable slot is logged and treated as signed out.
    pub fn open(storage: impl TokenStorage + 'static) -> Self {
        let token = match storage.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Ignoring unreadable token storage: {e}");
                None
            }
        };

        debug!(authenticated = token.is_some(), "Opened session store");

        Self {
            current: ArcSwap::from_pointee(Session { token, user: None }),
            storage: Box::new(storage),
            write_lock: Mutex::new(()),
        }
    }

    /// Open the store and wrap it for sharing
    pub fn shared(storage: impl TokenStorage + 'static) -> Arc<Self> {
        Arc::new(Self::open(storage))
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> Arc<Session> {
        self.current.load_full()
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.current.load().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.load().is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.current.load().user.clone()
    }

    /// Store a newly issued token, replacing any previous one.
    ///
    /// The durable copy is written first; if that fails the in-memory state
    /// is left untouched.
    pub fn set_token(&self, token: &str) -> SessionResult<()> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage.save(token)?;

        let user = self.current.load().user.clone();
        self.current.store(Arc::new(Session {
            token: Some(token.to_string()),
            user,
        }));

        info!("Session token updated");
        Ok(())
    }

    /// Attach profile data to the current session
    pub fn set_user(&self, user: Option<UserProfile>) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let token = self.current.load().token.clone();
        self.current.store(Arc::new(Session { token, user }));
    }

    /// Drop the token and user, in memory and on disk. Clearing an empty
    /// store is a no-op.
    ///
    /// Memory is always reset; a failure to remove the durable copy is
    /// still returned to the caller.
    pub fn clear(&self) -> SessionResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let was_authenticated = self.current.load().is_authenticated();

        self.current.store(Arc::new(Session::default()));
        self.storage.remove()?;

        if was_authenticated {
            info!("Session cleared");
        }
        Ok(())
    }

    /// Sign out. Same effect as [`SessionStore::clear`].
    pub fn logout(&self) -> SessionResult<()> {
        self.clear()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
