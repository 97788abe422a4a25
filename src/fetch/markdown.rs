// src/fetch/markdown.rs
// =============================================================================
// This module extracts links from Markdown documents.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is fast and memory-efficient (it's a streaming parser)
//
// Unlike README scanning, a crawled Markdown page has a URL of its own, so
// relative links like [docs](./docs/README.md) are resolved against it.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use url::Url;

use super::html::{resolve_link, LinkList};

// Extracts all crawlable links from Markdown text
//
// Example input (page at https://example.com/guide/):
//   "Check out [Rust](https://www.rust-lang.org) and [the intro](intro.md)!"
//
// Example output:
//   ["https://www.rust-lang.org/", "https://example.com/guide/intro.md"]
pub fn extract_markdown_links(markdown: &str, base: &Url) -> Vec<String> {
    let mut links = LinkList::default();

    for event in Parser::new(markdown) {
        // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title).
        // Images are Tag::Image and are not pages, so they're ignored.
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            if let Some(url) = resolve_link(base, &dest_url) {
                links.push(url);
            }
        }
    }

    links.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/guide/").unwrap()
    }

    #[test]
    fn test_extract_simple_link() {
        let markdown = "Check out [Rust](https://www.rust-lang.org)!";
        let links = extract_markdown_links(markdown, &base());
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_extract_multiple_links() {
        let markdown = r#"
# Resources

- [Rust](https://www.rust-lang.org)
- [Cargo](https://doc.rust-lang.org/cargo/)
- [Docs](https://doc.rust-lang.org/)
        "#;
        let links = extract_markdown_links(markdown, &base());
        assert_eq!(links.len(), 3);
        assert!(links.contains(&"https://www.rust-lang.org/".to_string()));
    }

    #[test]
    fn test_skip_mailto_links() {
        let markdown = "Email me at [email](mailto:test@example.com)";
        let links = extract_markdown_links(markdown, &base());
        assert!(links.is_empty());
    }

    #[test]
    fn test_resolve_relative_links() {
        let markdown = "See [docs](./docs/README.md) and [home](/)";
        let links = extract_markdown_links(markdown, &base());
        assert_eq!(
            links,
            vec![
                "https://example.com/guide/docs/README.md",
                "https://example.com/",
            ]
        );
    }

    #[test]
    fn test_images_are_not_links() {
        let markdown = "![logo](https://example.com/logo.png)";
        let links = extract_markdown_links(markdown, &base());
        assert!(links.is_empty());
    }
}
