//! Session state
//!
//! Tracks the signed-in user on top of the injected [`AuthManager`].

use app_core::auth::{AuthError, AuthManager, AuthUser, Credentials, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// Signed-in user state
pub struct SessionState {
    auth: Arc<dyn AuthManager>,
    user: RwLock<Option<AuthUser>>,
}

impl SessionState {
    /// Create a signed-out session
    pub fn new(auth: Arc<dyn AuthManager>) -> Self {
        Self {
            auth,
            user: RwLock::new(None),
        }
    }

    /// Sign in and remember the user
    pub async fn sign_in(&self, credentials: Credentials) -> Result<AuthUser> {
        let remember_me = credentials.remember_me;
        let user = self.auth.sign_in(credentials).await?;
        tracing::info!(user_id = %user.id, remember_me, "Signed in");
        *self.user.write() = Some(user.clone());
        Ok(user)
    }

    /// Sign out and forget the user
    ///
    /// The local user is cleared even if the manager reports no session.
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.auth.sign_out().await;
        *self.user.write() = None;
        match result {
            Ok(()) | Err(AuthError::NoSession) => {
                tracing::info!("Signed out");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Signed-in user, if any
    pub fn current_user(&self) -> Option<AuthUser> {
        self.user.read().clone()
    }

    /// Whether someone is signed in
    pub fn is_signed_in(&self) -> bool {
        self.user.read().is_some()
    }
}
