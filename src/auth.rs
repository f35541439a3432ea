// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth collaborator seam.
//!
//! Sign-in itself happens outside this crate; repositories only need to
//! know who the current user is and what token to attach to store calls.

/// Identity of the currently signed-in user, as reported by the external
/// auth collaborator.
pub trait AuthProvider: Send + Sync {
    /// Current user ID, or `None` when nobody is signed in.
    fn current_user_id(&self) -> Option<String>;

    /// Token attached to every document-store request.
    fn id_token(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }
}

/// Fixed credentials, used by the CLI binary and tests.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    user_id: String,
    token: String,
}

impl StaticAuth {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user_id(&self) -> Option<String> {
        if self.user_id.is_empty() {
            None
        } else {
            Some(self.user_id.clone())
        }
    }

    fn id_token(&self) -> Option<String> {
        if self.token.is_empty() {
            None
        } else {
            Some(self.token.clone())
        }
    }
}

/// Signed-out state.
#[derive(Debug, Clone, Default)]
pub struct Anonymous;

impl AuthProvider for Anonymous {
    fn current_user_id(&self) -> Option<String> {
        None
    }

    fn id_token(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_auth_reports_identity() {
        let auth = StaticAuth::new("uid1", "tok");
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user_id().as_deref(), Some("uid1"));
        assert_eq!(auth.id_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_empty_uid_is_signed_out() {
        let auth = StaticAuth::new("", "tok");
        assert!(!auth.is_authenticated());
        assert!(Anonymous.current_user_id().is_none());
    }
}
