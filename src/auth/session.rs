//! The signed-in user held by the auth service.

use crate::record::Record;

/// Current session: the user (already sanitized) and the token issued at
/// sign-in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<Record>,
    token: Option<String>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: Record, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    /// Get the user ID.
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(Record::id)
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.str_field("email"))
    }

    pub fn user(&self) -> Option<&Record> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }
}
