//! Auth token capability check.

use std::sync::RwLock;

/// Supplies the current session token, if any.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Outcome of asking for a token at an operation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Authenticated(String),
    /// Not logged in. Every entry point treats this as a silent no-op.
    Unauthenticated,
}

impl AuthState {
    /// Reads the token once. An empty token counts as logged out.
    pub fn check(provider: &dyn TokenProvider) -> Self {
        match provider.token() {
            Some(token) if !token.is_empty() => AuthState::Authenticated(token),
            _ => AuthState::Unauthenticated,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated(token) => Some(token),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// In-process token slot that can be set on login and cleared on logout.
#[derive(Default)]
pub struct SharedToken {
    token: RwLock<Option<String>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl TokenProvider for SharedToken {
    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl std::fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = self.token().is_some();
        f.debug_struct("SharedToken").field("set", &set).finish()
    }
}
