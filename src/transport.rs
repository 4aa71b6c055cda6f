use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use tracing::debug;

use crate::config::DEFAULT_USER_AGENT;
use crate::error::{LiquipediaError, Result};

/// A single GET request for a wiki page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: String,
    pub headers: HeaderMap,
}

impl PageRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }
}

/// Fetches page bodies.
///
/// Implementations return the decoded body (no content encoding left on it)
/// and report non-success responses as errors.
pub trait Transport: Send + Sync {
    fn fetch(&self, request: PageRequest) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// Gzip bodies are decompressed by reqwest itself.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, request: PageRequest) -> Result<Vec<u8>> {
        let url = request.url;
        debug!(url = %url, "fetching page");

        let response = self
            .http
            .get(&url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| LiquipediaError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LiquipediaError::UnexpectedStatus { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LiquipediaError::ResponseBody {
                url: url.clone(),
                source: e,
            })?;

        Ok(body.to_vec())
    }
}

/// Wraps a [`Transport`] and sets a fixed set of headers on every request,
/// overriding any value the request already carries.
#[derive(Debug, Clone)]
pub struct HeaderInjector<T> {
    headers: HeaderMap,
    inner: T,
}

impl<T: Transport> HeaderInjector<T> {
    pub fn new(inner: T, headers: HeaderMap) -> Self {
        Self { headers, inner }
    }

    /// The headers the wiki expects from API clients.
    pub fn wiki_defaults(inner: T, user_agent: &str) -> Self {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent).unwrap_or_else(|_| {
            debug!(user_agent, "user agent is not a valid header value, using crate default");
            HeaderValue::from_static(DEFAULT_USER_AGENT)
        });
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        Self::new(inner, headers)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl<T: Transport> Transport for HeaderInjector<T> {
    async fn fetch(&self, mut request: PageRequest) -> Result<Vec<u8>> {
        for (name, value) in &self.headers {
            request.headers.insert(name.clone(), value.clone());
        }
        self.inner.fetch(request).await
    }
}
