//! Authentication flag derived from the token store.

use std::sync::{Arc, RwLock};

use crate::dto::UserProfile;
use crate::error::AuthError;
use crate::token_store::TokenStore;

#[derive(Debug, Default)]
struct SessionState {
    authenticated: bool,
    user: Option<UserProfile>,
}

/// Client session: the stored token plus the flag views read.
///
/// `is_authenticated` is only as current as the last `check_auth`, `establish`
/// or `clear`. Requests always read the token straight from the store.
pub struct Session {
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session and run an initial `check_auth`.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let session = Self {
            store,
            state: RwLock::new(SessionState::default()),
        };
        session.check_auth();
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().map(|s| s.authenticated).unwrap_or(false)
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().ok().and_then(|s| s.user.clone())
    }

    /// Re-read the token store and update the flag. An unreadable store counts
    /// as signed out.
    pub fn check_auth(&self) -> bool {
        let present = match self.store.load() {
            Ok(token) => token.is_some(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read token store");
                false
            }
        };

        if let Ok(mut state) = self.state.write() {
            state.authenticated = present;
            if !present {
                state.user = None;
            }
        }
        present
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read token store");
                None
            }
        }
    }

    /// Persist a freshly issued token and mark the session authenticated.
    pub fn establish(&self, token: &str, user: Option<UserProfile>) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.store.save(token)?;

        if let Ok(mut state) = self.state.write() {
            state.authenticated = true;
            state.user = user;
        }
        Ok(())
    }

    pub fn set_user(&self, user: UserProfile) {
        if let Ok(mut state) = self.state.write() {
            state.user = Some(user);
        }
    }

    /// Forget the token and the user. Storage failures are logged, not returned:
    /// the in-memory flag is cleared regardless.
    pub fn clear(&self) {
        if let Err(err) = self.store.clear() {
            tracing::error!(error = %err, "failed to clear stored token");
        }
        if let Ok(mut state) = self.state.write() {
            state.authenticated = false;
            state.user = None;
        }
    }
}
