//! Signed-in session slice shared by the order features.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token for backend calls
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Who is using the storefront
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is signed in
    #[default]
    Anonymous,
    /// A signed-in customer
    Authenticated {
        /// Display name or email
        user: String,
        /// Token for backend calls
        token: AccessToken,
    },
}

impl Session {
    /// Signed-in session for `user`
    #[must_use]
    pub fn authenticated(user: impl Into<String>, token: AccessToken) -> Self {
        Self::Authenticated {
            user: user.into(),
            token,
        }
    }

    /// `true` when someone is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The backend token, if signed in
    #[must_use]
    pub const fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token, .. } => Some(token),
        }
    }

    /// Applies a sign-in or sign-out
    pub fn apply(&mut self, event: SessionEvent) {
        *self = match event {
            SessionEvent::SignedIn { user, token } => Self::Authenticated { user, token },
            SessionEvent::SignedOut => Self::Anonymous,
        };
    }
}

/// Session transitions reported by the auth layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A customer signed in
    SignedIn {
        /// Display name or email
        user: String,
        /// Token for backend calls
        token: AccessToken,
    },
    /// The customer signed out, or the backend rejected the token
    SignedOut,
}
