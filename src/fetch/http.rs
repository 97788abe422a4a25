// src/fetch/http.rs
// =============================================================================
// This module fetches real pages over HTTP.
//
// How it works:
// 1. Validate the URL
// 2. GET it with a shared reqwest client (connection pooling, timeout,
//    redirect limit)
// 3. Turn bad status codes and transport errors into FetchError
// 4. Extract links from the body (HTML or Markdown)
// 5. Optionally keep only links on one domain
//
// The fetcher itself keeps no record of what it fetched; deduplication is the
// cache's job (src/cache/).
//
// Rust concepts:
// - Builder pattern: Client::builder()...build()
// - map_err + ?: Convert one error type into another and return early
// - Enums: DocumentKind decides how links are extracted
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::html::extract_html_links;
use super::markdown::extract_markdown_links;
use super::{FetchError, FetchResult, Fetcher, Page};
use crate::config::HttpConfig;

pub struct HttpFetcher {
    client: Client,
    // Only links on this host are reported when set
    allowed_host: Option<String>,
}

impl HttpFetcher {
    // Create one HTTP client with our settings
    // We'll reuse it for all requests (connection pooling)
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            allowed_host: None,
        })
    }

    /// Keep only links whose host is `host`.
    ///
    /// This prevents the crawler from wandering off the target website.
    pub fn restrict_to_domain(mut self, host: impl Into<String>) -> Self {
        self.allowed_host = Some(host.into());
        self
    }

    fn is_allowed(&self, link: &str) -> bool {
        match &self.allowed_host {
            None => true,
            Some(host) => Url::parse(link)
                .map(|url| url.host_str() == Some(host.as_str()))
                .unwrap_or(false),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status();
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Err(FetchError::not_found(url));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        // After redirects, relative links are relative to where we ended up
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        let kind = DocumentKind::detect(&content_type, &final_url);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let links: Vec<String> = match kind {
            DocumentKind::Html => extract_html_links(&body, &final_url),
            DocumentKind::Markdown => extract_markdown_links(&body, &final_url),
            DocumentKind::PlainText => Vec::new(),
        }
        .into_iter()
        .filter(|link| self.is_allowed(link))
        .collect();

        debug!(url, ?kind, links = links.len(), "fetched page");

        Ok(Page::new(body, links))
    }
}

// What kind of document we got back, which decides how links are found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Html,
    Markdown,
    PlainText,
}

impl DocumentKind {
    // Raw Markdown is often served as text/plain or with no type at all, so
    // the .md extension only decides for those. A rendered README.md page
    // labelled text/html is still HTML.
    fn detect(content_type: &str, url: &Url) -> Self {
        let untyped = content_type.is_empty() || content_type.starts_with("text/plain");

        if content_type.contains("markdown") || (untyped && url.path().ends_with(".md")) {
            DocumentKind::Markdown
        } else if content_type.starts_with("text/plain") {
            DocumentKind::PlainText
        } else {
            DocumentKind::Html
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why one Client for every request?
//    - reqwest::Client holds a connection pool
//    - Reusing it means TCP/TLS connections are reused between pages
//    - Cloning a Client is cheap (it's an Arc inside), creating one is not
//
// 2. What does map_err(...)? do?
//    - map_err converts the error inside a Result into another type
//    - ? then returns early if it's an Err
//    - Here we turn reqwest::Error into our own FetchError
//
// 3. Why host_str() and not domain()?
//    - domain() is None for IP addresses like 127.0.0.1
//    - host_str() works for both names and IPs
// -----------------------------------------------------------------------------
