// src/fetch/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Parse and validate URLs
// - Resolve relative URLs to absolute URLs
//
// Rust concepts:
// - Option<T>: For links that can't be resolved
// - HashSet: To drop duplicate links on the same page
// - let-else: Early return when a pattern doesn't match
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all crawlable links from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base: the URL of the page (for resolving relative links)
//
// Returns: absolute http(s) URLs in document order, without duplicates
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str, base: &Url) -> Vec<String> {
    let mut links = LinkList::default();

    let document = Html::parse_document(html);

    // "a[href]" is a constant, valid selector; parse failure would mean no links
    let Ok(selector) = Selector::parse("a[href]") else {
        return links.into_vec();
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(base, href) {
                links.push(absolute_url);
            }
        }
    }

    links.into_vec()
}

// Resolves a link (possibly relative) to an absolute http(s) URL
//
// Returns None for:
// - anchors on the same page (#section)
// - mailto:, tel:, javascript: links
// - anything that isn't http:// or https:// after resolving
// - hrefs that can't be parsed at all
//
// Fragments are stripped so "/docs#intro" and "/docs" are the same page.
pub(super) fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // base.join() handles both relative and absolute hrefs
    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);

    Some(url.to_string())
}

// An ordered list of links that ignores repeats
#[derive(Default)]
pub(super) struct LinkList {
    seen: HashSet<String>,
    links: Vec<String>,
}

impl LinkList {
    pub(super) fn push(&mut self, link: String) {
        if self.seen.insert(link.clone()) {
            self.links.push(link);
        }
    }

    pub(super) fn into_vec(self) -> Vec<String> {
        self.links
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is scraper and how does it work?
//    - scraper parses HTML into a tree structure (DOM)
//    - You can then query it using CSS selectors (like jQuery or querySelector)
//    - "a[href]" means "all <a> tags that have an href attribute"
//
// 2. What does base.join(href) do?
//    - Resolves href the way a browser would
//    - "https://example.com/page/" + "../other" = "https://example.com/other"
//    - An absolute href simply replaces the base
//
// 3. What is let-else?
//    - let Ok(x) = expr else { return ...; };
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, break, etc.)
//
// 4. Why keep both a HashSet and a Vec in LinkList?
//    - The HashSet answers "seen this already?" quickly
//    - The Vec remembers the order links appeared in the page
// -----------------------------------------------------------------------------
