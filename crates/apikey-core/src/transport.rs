//! Authenticated HTTP transport
//!
//! The key client never builds its own HTTP stack. The surrounding session
//! code hands it a transport that already carries the login cookies.

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::settings::Settings;

/// Fully drained page response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response body
    pub body: String,
}

/// Trait for authenticated transports, allowing for mocking
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// POST a url-encoded form and return the status; the body is released unread
    async fn post_form(&self, url: &Url, form: &[(&str, &str)]) -> Result<StatusCode>;

    /// GET a page and read the whole body
    async fn get_page(&self, url: &Url) -> Result<PageResponse>;
}

/// Transport backed by a reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wrap a client that is already authenticated
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from settings around a shared cookie jar
    pub fn from_settings(settings: &Settings, cookies: Arc<Jar>) -> Result<Self> {
        let mut builder = Client::builder().cookie_provider(cookies);

        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &settings.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self::new(builder.build()?))
    }

    /// Seed a cookie jar with `name=value` cookies scoped to `url`
    pub fn cookie_jar<S: AsRef<str>>(cookies: &[S], url: &Url) -> Arc<Jar> {
        let jar = Jar::default();
        for cookie in cookies {
            let cookie = cookie.as_ref().trim();
            if cookie.is_empty() {
                continue;
            }
            if !cookie.contains('=') {
                warn!("Ignoring malformed cookie (missing '=')");
                continue;
            }
            jar.add_cookie_str(cookie, url);
        }
        Arc::new(jar)
    }
}

#[async_trait]
impl SessionTransport for ReqwestTransport {
    async fn post_form(&self, url: &Url, form: &[(&str, &str)]) -> Result<StatusCode> {
        let response = self.client.post(url.clone()).form(form).send().await?;
        let status = response.status();

        // Dropping the response releases the connection without reading the body
        drop(response);

        debug!("POST {} -> {}", url, status);
        Ok(status)
    }

    async fn get_page(&self, url: &Url) -> Result<PageResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(PageResponse { status, body })
    }
}
