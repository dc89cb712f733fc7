//! Web API key client
//!
//! Register, fetch and revoke the account's Web API key over an
//! authenticated community session. Each call is a single round trip with no
//! retries.

use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::endpoints::Endpoints;
use crate::error::{ApiKeyError, Result};
use crate::key::ApiKey;
use crate::scrape::KeyPageScraper;
use crate::session::{CommunitySession, FetchedKey};
use crate::transport::SessionTransport;

/// Value of the terms checkbox on the registration form
const AGREE_TO_TERMS: &str = "agreed";

/// Value of the registration submit button
const REGISTER_SUBMIT: &str = "Register";

/// Value of the revocation submit button
const REVOKE_CONFIRMATION: &str = "Revoke My Steam Web API Key";

/// Client for the key management endpoints
pub struct ApiKeyClient {
    transport: Arc<dyn SessionTransport>,
    endpoints: Endpoints,
    scraper: KeyPageScraper,
}

impl ApiKeyClient {
    /// Create a client against the default community endpoints
    pub fn new(transport: Arc<dyn SessionTransport>) -> Result<Self> {
        Self::with_endpoints(transport, Endpoints::default())
    }

    /// Create a client against custom endpoints
    pub fn with_endpoints(transport: Arc<dyn SessionTransport>, endpoints: Endpoints) -> Result<Self> {
        Ok(Self {
            transport,
            endpoints,
            scraper: KeyPageScraper::new()?,
        })
    }

    /// Endpoints in use
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Register a new key bound to `domain`
    pub async fn register(&self, session: &CommunitySession, domain: &str) -> Result<()> {
        let form = [
            ("domain", domain),
            ("agreeToTerms", AGREE_TO_TERMS),
            ("sessionid", session.session_id()),
            ("Submit", REGISTER_SUBMIT),
        ];

        debug!("Registering API key for domain {}", domain);
        let status = self
            .transport
            .post_form(&self.endpoints.register, &form)
            .await?;

        if status != StatusCode::OK {
            warn!("Key registration rejected with HTTP {}", status);
            return Err(ApiKeyError::CannotRegisterKey { status });
        }

        info!("Registered API key for domain {}", domain);
        Ok(())
    }

    /// Fetch the key currently assigned to the account
    ///
    /// The session is not modified; apply the result with
    /// [`CommunitySession::apply`] or use [`ApiKeyClient::fetch_into`].
    /// The HTTP status of the page is ignored: only the body decides.
    pub async fn fetch(&self, session: &CommunitySession) -> Result<FetchedKey> {
        let page = self.transport.get_page(&self.endpoints.key_page).await?;
        debug!("Key page returned HTTP {}", page.status);

        let key = self.scraper.scrape(&page.body)?;
        let replaces_cached = session.api_key() != Some(&key);

        debug!(
            "Found API key {} (cache {})",
            key.prefix(),
            if replaces_cached { "stale" } else { "current" }
        );

        Ok(FetchedKey {
            key,
            replaces_cached,
        })
    }

    /// Fetch the key and cache it on the session; failures leave the cache untouched
    pub async fn fetch_into<'s>(&self, session: &'s mut CommunitySession) -> Result<&'s ApiKey> {
        let fetched = self.fetch(session).await?;
        Ok(session.apply(fetched))
    }

    /// Revoke the account's key
    ///
    /// The session's cached key is left as is; see
    /// [`ApiKeyClient::revoke_and_forget`].
    pub async fn revoke(&self, session: &CommunitySession) -> Result<()> {
        let form = [
            ("revoke", REVOKE_CONFIRMATION),
            ("sessionid", session.session_id()),
        ];

        debug!("Revoking API key");
        let status = self
            .transport
            .post_form(&self.endpoints.revoke, &form)
            .await?;

        if status != StatusCode::OK {
            warn!("Key revocation rejected with HTTP {}", status);
            return Err(ApiKeyError::CannotRevokeKey { status });
        }

        info!("Revoked API key");
        Ok(())
    }

    /// Revoke the key and clear the session's cached copy on success
    pub async fn revoke_and_forget(&self, session: &mut CommunitySession) -> Result<()> {
        self.revoke(session).await?;
        if let Some(stale) = session.forget_api_key() {
            debug!("Dropped cached API key {}", stale.prefix());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::mock::{MockReply, MockTransport};

    const KEY_PAGE: &str = "<html><body><div id=\"bodyContents_ex\">\
        <h2>Your Steam Web API Key</h2><p>Key: 1A2B3C4D5E6F7890</p>\
        <p>Domain Name: example.com</p></div></body></html>";

    fn setup() -> (Arc<MockTransport>, ApiKeyClient, CommunitySession) {
        let transport = Arc::new(MockTransport::new());
        let client = ApiKeyClient::new(transport.clone()).unwrap();
        let session = CommunitySession::new("sess-42");
        (transport, client, session)
    }

    fn page(status: u16, body: &str) -> MockReply {
        MockReply::Page {
            status,
            body: body.to_string(),
        }
    }

    fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_register_sends_form() {
        let (transport, client, session) = setup();
        transport.reply(&client.endpoints().register, MockReply::Status(200));

        client.register(&session, "example.com").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "https://steamcommunity.com/dev/registerkey");
        assert_eq!(
            requests[0].form,
            form(&[
                ("domain", "example.com"),
                ("agreeToTerms", "agreed"),
                ("sessionid", "sess-42"),
                ("Submit", "Register"),
            ])
        );
    }

    #[tokio::test]
    async fn test_register_non_ok_is_cannot_register() {
        let (transport, client, session) = setup();

        for code in [201, 302, 403, 500] {
            transport.reply(&client.endpoints().register, MockReply::Status(code));
            let err = client.register(&session, "example.com").await.unwrap_err();
            match err {
                ApiKeyError::CannotRegisterKey { status } => assert_eq!(status.as_u16(), code),
                other => panic!("unexpected error for {}: {:?}", code, other),
            }
        }
    }

    #[tokio::test]
    async fn test_register_transport_failure() {
        let (transport, client, session) = setup();
        transport.reply(&client.endpoints().register, MockReply::Unreachable);

        let err = client.register(&session, "example.com").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_returns_key_and_applies() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, page(200, KEY_PAGE));

        let fetched = client.fetch(&session).await.unwrap();
        assert_eq!(fetched.key.expose(), "1A2B3C4D5E6F7890");
        assert!(fetched.replaces_cached);
        assert!(session.api_key().is_none());

        session.apply(fetched);
        assert_eq!(session.api_key().unwrap().expose(), "1A2B3C4D5E6F7890");
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, page(200, KEY_PAGE));

        let first = client.fetch_into(&mut session).await.unwrap().clone();
        let second = client.fetch(&session).await.unwrap();

        assert_eq!(first, second.key);
        assert!(!second.replaces_cached);
        session.apply(second);
        assert_eq!(session.api_key(), Some(&first));
    }

    #[tokio::test]
    async fn test_fetch_access_denied_ignores_status() {
        let (transport, client, mut session) = setup();

        for code in [200, 403] {
            transport.reply(
                &client.endpoints().key_page,
                page(code, "<h2>Access Denied</h2><p>Key: ABCDEF</p>"),
            );
            let err = client.fetch_into(&mut session).await.unwrap_err();
            assert!(matches!(err, ApiKeyError::AccessDenied));
            assert!(session.api_key().is_none());
        }
    }

    #[tokio::test]
    async fn test_fetch_not_found_keeps_cache() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, page(200, KEY_PAGE));
        client.fetch_into(&mut session).await.unwrap();

        transport.reply(
            &client.endpoints().key_page,
            page(200, "<h2>Register for a new Steam Web API Key</h2>"),
        );
        let err = client.fetch_into(&mut session).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(session.api_key().unwrap().expose(), "1A2B3C4D5E6F7890");
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, MockReply::Unreachable);

        let err = client.fetch_into(&mut session).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(session.api_key().is_none());
    }

    #[tokio::test]
    async fn test_revoke_sends_form() {
        let (transport, client, session) = setup();
        transport.reply(&client.endpoints().revoke, MockReply::Status(200));

        client.revoke(&session).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://steamcommunity.com/dev/revokekey");
        assert_eq!(
            requests[0].form,
            form(&[
                ("revoke", "Revoke My Steam Web API Key"),
                ("sessionid", "sess-42"),
            ])
        );
    }

    #[tokio::test]
    async fn test_revoke_non_ok_is_cannot_revoke() {
        let (transport, client, session) = setup();

        for code in [201, 302, 403, 500] {
            transport.reply(&client.endpoints().revoke, MockReply::Status(code));
            let err = client.revoke(&session).await.unwrap_err();
            match err {
                ApiKeyError::CannotRevokeKey { status } => assert_eq!(status.as_u16(), code),
                other => panic!("unexpected error for {}: {:?}", code, other),
            }
        }
    }

    #[tokio::test]
    async fn test_revoke_transport_failure() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, page(200, KEY_PAGE));
        transport.reply(&client.endpoints().revoke, MockReply::Unreachable);
        client.fetch_into(&mut session).await.unwrap();

        let err = client.revoke_and_forget(&mut session).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!matches!(err, ApiKeyError::CannotRevokeKey { .. }));
        assert!(session.api_key().is_some());
    }

    #[tokio::test]
    async fn test_revoke_keeps_cache_but_revoke_and_forget_clears() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, page(200, KEY_PAGE));
        transport.reply(&client.endpoints().revoke, MockReply::Status(200));
        client.fetch_into(&mut session).await.unwrap();

        client.revoke(&session).await.unwrap();
        assert!(session.api_key().is_some());

        client.revoke_and_forget(&mut session).await.unwrap();
        assert!(session.api_key().is_none());
    }

    #[tokio::test]
    async fn test_failed_revoke_and_forget_keeps_cache() {
        let (transport, client, mut session) = setup();
        transport.reply(&client.endpoints().key_page, page(200, KEY_PAGE));
        transport.reply(&client.endpoints().revoke, MockReply::Status(500));
        client.fetch_into(&mut session).await.unwrap();

        let err = client.revoke_and_forget(&mut session).await.unwrap_err();
        assert!(matches!(err, ApiKeyError::CannotRevokeKey { .. }));
        assert!(session.api_key().is_some());
    }

    #[tokio::test]
    async fn test_custom_endpoints() {
        let transport = Arc::new(MockTransport::new());
        let endpoints = Endpoints::with_base("http://127.0.0.1:9000/").unwrap();
        let client = ApiKeyClient::with_endpoints(transport.clone(), endpoints).unwrap();
        let session = CommunitySession::new("s");

        transport.reply(&client.endpoints().register, MockReply::Status(200));
        client.register(&session, "example.com").await.unwrap();

        assert_eq!(transport.requests()[0].url, "http://127.0.0.1:9000/dev/registerkey");
    }
}
