// src/fetch/error.rs
// =============================================================================
// The error type for a failed fetch.
//
// A FetchError is not just reported once: the cache records it as the outcome
// for that URL and hands the same value to every later caller. That's why it
// is Clone + PartialEq (and Serialize for --json output) and why it stores
// plain strings instead of the original reqwest::Error.
//
// Every variant carries the URL, so a printed error always says which page
// failed, e.g. "not found: https://golang.org/cmd/".
// =============================================================================

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The page does not exist (unknown dataset key, HTTP 404 / 410)
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success HTTP status
    #[error("HTTP {code} from {url}")]
    Status { url: String, code: u16 },

    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("could not resolve hostname: {url}")]
    Dns { url: String },

    #[error("SSL certificate error: {url}")]
    Tls { url: String },

    #[error("too many redirects: {url}")]
    TooManyRedirects { url: String },

    #[error("connection failed: {url}: {message}")]
    Connect { url: String, message: String },

    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Catch-all for transport errors we don't categorise further
    #[error("request failed: {url}: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    pub fn not_found(url: impl Into<String>) -> Self {
        FetchError::NotFound { url: url.into() }
    }

    /// The URL this error is about
    pub fn url(&self) -> &str {
        match self {
            FetchError::NotFound { url }
            | FetchError::Status { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Dns { url }
            | FetchError::Tls { url }
            | FetchError::TooManyRedirects { url }
            | FetchError::Connect { url, .. }
            | FetchError::InvalidUrl { url, .. }
            | FetchError::Request { url, .. } => url,
        }
    }

    // Categorizes different error types from reqwest
    //
    // reqwest errors can happen for many reasons:
    // - Network timeout
    // - DNS resolution failure
    // - SSL certificate issues
    // - Too many redirects
    pub(crate) fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let url = url.to_string();
        let message = error.to_string();

        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_redirect() {
            FetchError::TooManyRedirects { url }
        } else if error.is_connect() {
            // reqwest's Display hides the cause chain, which is where the
            // TLS or DNS failure shows up
            let detail = format!("{:?}", error);
            Self::from_connect_failure(url, message, &detail)
        } else {
            FetchError::Request { url, message }
        }
    }

    // Handshake failures surface as connect errors too, so TLS is checked
    // before DNS and plain connection failures
    fn from_connect_failure(url: String, message: String, detail: &str) -> Self {
        let detail = detail.to_lowercase();

        if detail.contains("certificate") || detail.contains("ssl") {
            FetchError::Tls { url }
        } else if detail.contains("dns") {
            FetchError::Dns { url }
        } else {
            FetchError::Connect { url, message }
        }
    }
}
