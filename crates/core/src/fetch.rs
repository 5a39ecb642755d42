//! Page fetching.
//!
//! The crawler talks to the network through the [`Transport`] trait so that
//! tests can substitute canned pages. [`HttpTransport`] is the reqwest-backed
//! implementation: one client, built once, whose default headers (user agent,
//! cookie) are shared read-only by every concurrent fetch.

use std::future::Future;

#[cfg(feature = "fetch")]
use std::time::Duration;

use url::Url;

use crate::Result;
#[cfg(feature = "fetch")]
use crate::NovelError;

/// HTTP session configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Raw `Cookie` header sent with every request.
    pub cookie: Option<String>,
    /// Ignore proxies configured through the environment.
    pub no_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; novelthread/0.1)".to_string(),
            cookie: None,
            no_proxy: false,
        }
    }
}

/// Fetches one page as raw HTML.
///
/// Implementations are shared across concurrently running fetches and must
/// not rely on call order.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// reqwest-backed [`Transport`].
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: u64,
}

#[cfg(feature = "fetch")]
impl HttpTransport {
    /// Builds the shared session.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::ConfigError`] when the cookie is not a valid
    /// header value, and [`NovelError::FetchError`] when the client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));

        match &config.cookie {
            Some(cookie) => {
                let value = HeaderValue::from_str(cookie)
                    .map_err(|e| NovelError::ConfigError(format!("invalid cookie: {}", e)))?;
                headers.insert(COOKIE, value);
                tracing::info!("init session with cookie");
            }
            None => tracing::info!("init session without cookie"),
        }

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if config.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| NovelError::FetchError { url: String::new(), reason: e.to_string() })?;

        Ok(Self { client, timeout: config.timeout })
    }
}

#[cfg(feature = "fetch")]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                NovelError::FetchTimeout { url: url.to_string(), timeout: self.timeout }
            } else {
                NovelError::FetchError { url: url.to_string(), reason: e.to_string() }
            }
        };

        let response = self.client.get(url.clone()).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(NovelError::FetchError { url: url.to_string(), reason: format!("HTTP status {}", status) });
        }

        response.text().await.map_err(classify)
    }
}
