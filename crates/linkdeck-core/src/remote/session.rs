//! Session credentials
//!
//! The remote layer reads the bearer token from a `CredentialSource` at the
//! moment each request is built, so a sign-in or token refresh elsewhere in
//! the application is picked up by the next request.

use std::sync::Arc;

use parking_lot::RwLock;

/// Supplies the current session credential
pub trait CredentialSource: Send + Sync {
    /// Bearer token for the signed-in user, if any
    fn bearer_token(&self) -> Option<String>;

    /// Identifier of the signed-in user, if known
    fn user_id(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Default)]
struct Credentials {
    user_id: Option<String>,
    token: Option<String>,
}

/// Shared, replaceable session state
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Credentials>>,
}

impl Session {
    /// Create a signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a known token
    pub fn with_token(user_id: Option<String>, token: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(user_id, token);
        session
    }

    pub fn sign_in(&self, user_id: Option<String>, token: impl Into<String>) {
        let mut creds = self.inner.write();
        creds.user_id = user_id;
        creds.token = Some(token.into());
    }

    pub fn sign_out(&self) {
        *self.inner.write() = Credentials::default();
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.read().token.is_some()
    }
}

impl CredentialSource for Session {
    fn bearer_token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    fn user_id(&self) -> Option<String> {
        self.inner.read().user_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_by_default() {
        let session = Session::new();
        assert!(!session.is_signed_in());
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn test_sign_in_visible_to_clones() {
        let session = Session::new();
        let shared = session.clone();

        session.sign_in(Some("u-1".to_string()), "abc");

        assert_eq!(shared.bearer_token().as_deref(), Some("abc"));
        assert_eq!(shared.user_id().as_deref(), Some("u-1"));

        session.sign_out();
        assert!(!shared.is_signed_in());
    }
}
