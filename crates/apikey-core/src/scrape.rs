//! Key page scraping
//!
//! The key management page is plain HTML with no machine-readable schema.
//! Two checks run in order: the access denied interstitial first, then the
//! key paragraph. The order decides which error wins on ambiguous pages.

use regex::Regex;
use tracing::debug;

use crate::error::{ApiKeyError, Result};
use crate::key::ApiKey;

/// Fragment rendered when the session may not view the key page
pub const ACCESS_DENIED_MARKER: &str = "<h2>Access Denied</h2>";

/// Paragraph holding the assigned key
pub const KEY_PATTERN: &str = r"<p>Key: ([0-9A-F]+)</p>";

/// Extracts the assigned key from the key management page
#[derive(Debug, Clone)]
pub struct KeyPageScraper {
    key_re: Regex,
}

impl KeyPageScraper {
    /// Compile the key pattern
    pub fn new() -> Result<Self> {
        Self::with_pattern(KEY_PATTERN)
    }

    /// Compile a custom key pattern (first capture group is the key)
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let key_re = Regex::new(pattern).map_err(|e| ApiKeyError::Pattern(e.to_string()))?;
        Ok(Self { key_re })
    }

    /// Run both checks against a page body
    pub fn scrape(&self, body: &str) -> Result<ApiKey> {
        if body.contains(ACCESS_DENIED_MARKER) {
            debug!("Key page shows access denied marker");
            return Err(ApiKeyError::AccessDenied);
        }

        let key = self
            .key_re
            .captures(body)
            .and_then(|caps| caps.get(1))
            .filter(|key| !key.as_str().is_empty())
            .ok_or(ApiKeyError::KeyNotFound)?;

        ApiKey::parse(key.as_str())
    }
}
