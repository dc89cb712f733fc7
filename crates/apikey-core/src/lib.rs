//! # apikey-core
//!
//! Manage the Steam Community Web API key of an authenticated session:
//! - Register a key for a domain
//! - Fetch the assigned key by scraping the key management page
//! - Revoke the key
//!
//! Login and cookie persistence are left to the caller, who supplies a
//! [`SessionTransport`] carrying the session cookies.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod key;
pub mod scrape;
pub mod session;
pub mod settings;
pub mod transport;

pub use client::ApiKeyClient;
pub use endpoints::{Endpoints, DEFAULT_COMMUNITY_URL};
pub use error::{ApiKeyError, ErrorKind, Result};
pub use key::ApiKey;
pub use scrape::{KeyPageScraper, ACCESS_DENIED_MARKER, KEY_PATTERN};
pub use session::{CommunitySession, FetchedKey};
pub use settings::{Settings, SettingsManager};
pub use transport::{PageResponse, ReqwestTransport, SessionTransport};
