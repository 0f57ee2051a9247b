//! Authentication contract
//!
//! The credential manager itself is an external collaborator. This module
//! only fixes what the screens send to it and what they get back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Invalid credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No active session
    #[error("No active session")]
    NoSession,

    /// Network error
    #[error("Network error: {0}")]
    Network(String),
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Sign-in parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Keep the session across launches
    pub remember_me: bool,
}

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Account ID
    pub id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
}

/// Credential manager
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthManager: Send + Sync {
    /// Sign in with email and password
    async fn sign_in(&self, credentials: Credentials) -> Result<AuthUser>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_auth_manager() {
        let mut auth = MockAuthManager::new();
        auth.expect_sign_in().returning(|credentials| {
            Ok(AuthUser {
                id: "u1".to_string(),
                email: credentials.email,
                display_name: None,
            })
        });
        auth.expect_sign_out().returning(|| Err(AuthError::NoSession));

        let user = auth
            .sign_in(Credentials {
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
                remember_me: false,
            })
            .await
            .unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(auth.sign_out().await, Err(AuthError::NoSession));
    }

    #[test]
    fn test_credentials_serialization() {
        let credentials = Credentials {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            remember_me: true,
        };
        let json = serde_json::to_string(&credentials).unwrap();
        assert!(json.contains("\"rememberMe\":true"));
    }
}
