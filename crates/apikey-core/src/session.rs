//! Community session state consumed by the key client
//!
//! Login and cookie handling live outside this crate. A session here is only
//! the anti-forgery token the mutating endpoints require plus the most
//! recently fetched key.

use std::fmt;

use tracing::debug;

use crate::key::ApiKey;

/// Result of a successful key fetch, applied to a session by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedKey {
    /// Key currently assigned to the account
    pub key: ApiKey,
    /// Whether applying this result changes the session's cached key
    pub replaces_cached: bool,
}

/// Authenticated community session
#[derive(Clone)]
pub struct CommunitySession {
    session_id: String,
    api_key: Option<ApiKey>,
}

impl CommunitySession {
    /// Create a session from an existing session token
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            api_key: None,
        }
    }

    /// Session token sent as the `sessionid` form field
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Most recently fetched key, if any
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Store a fetched key, returning the cached value
    pub fn apply(&mut self, fetched: FetchedKey) -> &ApiKey {
        if fetched.replaces_cached {
            debug!("Caching API key {}", fetched.key.prefix());
        }
        self.api_key.insert(fetched.key)
    }

    /// Drop the cached key (after a revoke)
    pub fn forget_api_key(&mut self) -> Option<ApiKey> {
        self.api_key.take()
    }
}

impl fmt::Debug for CommunitySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommunitySession")
            .field("session_id", &"[REDACTED]")
            .field("api_key", &self.api_key)
            .finish()
    }
}
