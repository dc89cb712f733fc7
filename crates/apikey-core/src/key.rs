//! Web API key value type

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ApiKeyError, Result};

/// Number of characters shown by [`ApiKey::prefix`]
const PREFIX_LEN: usize = 8;

/// Uppercase hexadecimal Web API key - automatically zeroed when dropped
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Parse a key, accepting only `[0-9A-F]+`
    pub fn parse(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(ApiKeyError::InvalidKey("key is empty".to_string()));
        }

        if let Some(bad) = value
            .chars()
            .find(|c| !matches!(*c, '0'..='9' | 'A'..='F'))
        {
            return Err(ApiKeyError::InvalidKey(format!(
                "unexpected character {:?}",
                bad
            )));
        }

        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Get the key value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// First characters of the key for display (e.g., "1A2B3C4D...")
    pub fn prefix(&self) -> String {
        let head = &self.value[..self.value.len().min(PREFIX_LEN)];
        format!("{}...", head)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
