//! Error types for apikey-core

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for key management operations
pub type Result<T> = std::result::Result<T, ApiKeyError>;

/// Key management error types
#[derive(Error, Debug)]
pub enum ApiKeyError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Key pattern error: {0}")]
    Pattern(String),

    #[error("Access is denied")]
    AccessDenied,

    #[error("Unable to register API key (HTTP {status})")]
    CannotRegisterKey { status: StatusCode },

    #[error("Unable to revoke API key (HTTP {status})")]
    CannotRevokeKey { status: StatusCode },

    #[error("Key not found")]
    KeyNotFound,

    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be built or executed
    Transport,
    /// The session may not view the key page
    AccessDenied,
    /// The service answered a mutating request with a non-OK status
    Rejected,
    /// No key is currently assigned to the account
    NotFound,
    /// Local setup failure (settings, key parsing)
    Local,
}

impl ApiKeyError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::InvalidRequest(_) | Self::Pattern(_) => ErrorKind::Transport,
            Self::AccessDenied => ErrorKind::AccessDenied,
            Self::CannotRegisterKey { .. } | Self::CannotRevokeKey { .. } => ErrorKind::Rejected,
            Self::KeyNotFound => ErrorKind::NotFound,
            Self::InvalidKey(_)
            | Self::Config(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorKind::Local,
        }
    }

    /// True when the account simply has no key yet
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_share_kind() {
        let register = ApiKeyError::CannotRegisterKey {
            status: StatusCode::FORBIDDEN,
        };
        let revoke = ApiKeyError::CannotRevokeKey {
            status: StatusCode::FOUND,
        };

        assert_eq!(register.kind(), ErrorKind::Rejected);
        assert_eq!(revoke.kind(), ErrorKind::Rejected);
        assert!(register.to_string().contains("register"));
        assert!(revoke.to_string().contains("revoke"));
    }

    #[test]
    fn test_pattern_error_is_transport_class() {
        let err = ApiKeyError::Pattern("unclosed group".to_string());
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.is_not_found());
        assert!(ApiKeyError::KeyNotFound.is_not_found());
    }
}
