//! Synchronized credential store shared by a client and its transport.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::route::RouteAccess;

/// Session token and API key currently held by a client.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Option<String>,
    api_key: Option<String>,
}

impl Credentials {
    /// Returns the credential value that authorizes `access`, if held.
    #[must_use]
    pub fn for_access(&self, access: RouteAccess) -> Option<&str> {
        match access {
            RouteAccess::Session => self.token.as_deref(),
            RouteAccess::ApiKey => self.api_key.as_deref(),
        }
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

// Values are secrets; only presence is ever printed.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Cloneable handle to one client's credentials.
///
/// Writers are last-write-wins; a poisoned lock is recovered since the data
/// is two independent optional strings.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current credentials.
    #[must_use]
    pub fn snapshot(&self) -> Credentials {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.write(|credentials| credentials.token = Some(token.into()));
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.write(|credentials| credentials.api_key = Some(api_key.into()));
    }

    /// Drops both credentials.
    pub fn clear(&self) {
        self.write(|credentials| *credentials = Credentials::default());
    }

    fn write(&self, update: impl FnOnce(&mut Credentials)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut guard);
    }
}
