//! Key management endpoints

use url::Url;

use crate::error::{ApiKeyError, Result};

/// Default community site
pub const DEFAULT_COMMUNITY_URL: &str = "https://steamcommunity.com/";

const KEY_PAGE_PATH: &str = "dev/apikey";
const REGISTER_PATH: &str = "dev/registerkey";
const REVOKE_PATH: &str = "dev/revokekey";

/// URLs for the three key operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Key management page (GET)
    pub key_page: Url,
    /// Registration form target (POST)
    pub register: Url,
    /// Revocation form target (POST)
    pub revoke: Url,
}

impl Endpoints {
    /// Derive all endpoints from a community base URL
    pub fn with_base(base: &str) -> Result<Self> {
        let mut base = Url::parse(base)
            .map_err(|e| ApiKeyError::InvalidRequest(format!("Invalid community URL {}: {}", base, e)))?;

        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| ApiKeyError::InvalidRequest(format!("Invalid endpoint {}: {}", path, e)))
        };

        Ok(Self {
            key_page: join(KEY_PAGE_PATH)?,
            register: join(REGISTER_PATH)?,
            revoke: join(REVOKE_PATH)?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_base(DEFAULT_COMMUNITY_URL).expect("default community URL is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.key_page.as_str(), "https://steamcommunity.com/dev/apikey");
        assert_eq!(endpoints.register.as_str(), "https://steamcommunity.com/dev/registerkey");
        assert_eq!(endpoints.revoke.as_str(), "https://steamcommunity.com/dev/revokekey");
    }

    #[test]
    fn test_base_with_path() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:8080/mirror").unwrap();
        assert_eq!(endpoints.key_page.as_str(), "http://127.0.0.1:8080/mirror/dev/apikey");
    }

    #[test]
    fn test_invalid_base() {
        let result = Endpoints::with_base("not a url");
        assert!(matches!(result, Err(ApiKeyError::InvalidRequest(_))));
    }
}
