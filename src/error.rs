use ::scraper::error::SelectorErrorKind;
use std::string::FromUtf8Error;

/// All errors that can occur during Liquipedia scraping operations.
#[derive(thiserror::Error, Debug)]
pub enum LiquipediaError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The API response was not the expected JSON envelope.
    #[error("malformed api response from {url}: {source}")]
    Envelope {
        url: String,
        source: serde_json::Error,
    },

    /// The wiki API answered with an error object instead of a page.
    #[error("wiki api error {code}: {info}")]
    Api { code: String, info: String },

    /// A raw page body was not valid UTF-8.
    #[error("page body from {url} is not valid utf-8: {source}")]
    Encoding { url: String, source: FromUtf8Error },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    NotFound { context: &'static str },

    /// An embedded stream address could not be parsed as a URL.
    #[error("invalid stream reference {reference}: {source}")]
    InvalidReference {
        reference: String,
        source: url::ParseError,
    },

    /// The page structure does not match the configured layout.
    #[error("{page} layout mismatch: expected {expected} sections, found {found}")]
    LayoutMismatch {
        page: &'static str,
        expected: usize,
        found: usize,
    },
}

impl<'a> From<SelectorErrorKind<'a>> for LiquipediaError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        LiquipediaError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LiquipediaError>;
