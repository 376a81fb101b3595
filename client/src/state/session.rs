use std::sync::{Arc, RwLock};

use crate::api::UserProfile;

/// In-memory authentication state. Lives exactly as long as the process;
/// nothing here is ever persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// Shared handle to the current session. Mutation is always a whole-value
/// swap, so readers never observe a half-updated token pair.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Session {
        self.inner.read().expect("session lock poisoned").clone()
    }

    pub fn set(&self, session: Session) {
        *self.inner.write().expect("session lock poisoned") = session;
    }

    pub fn clear(&self) {
        self.set(Session::default());
    }
}
