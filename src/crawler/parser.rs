//! HTML parser for extracting page text and links
//!
//! This module turns fetched HTML into:
//! - The page title
//! - Plain text, one line per block element, in document order
//! - In-scope links to follow, in document order

use crate::url::UrlScope;
use scraper::{Html, Node, Selector};
use thiserror::Error;
use url::Url;

/// Elements whose content is never part of the page text
const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "canvas",
];

/// Elements that start a new block of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section",
    "summary", "table", "td", "th", "tr", "ul",
];

/// Why a fetched page produced no text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Could not parse page: {0}")]
    ParseFailure(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Visible text, one block per line
    pub text: String,

    /// In-scope links found on the page, in document order
    pub links: Vec<Url>,
}

/// Checks that a response's Content-Type is something we can parse
///
/// A missing header is given the benefit of the doubt; `text/html` and
/// `application/xhtml+xml` (with any parameters) are accepted.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), ExtractError> {
    let Some(raw) = content_type else {
        return Ok(());
    };

    let media_type = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        "" | "text/html" | "application/xhtml+xml" => Ok(()),
        _ => Err(ExtractError::UnsupportedContentType(raw.to_string())),
    }
}

/// Text and link extractor bound to a crawl scope
#[derive(Debug, Clone)]
pub struct Extractor {
    scope: UrlScope,
}

impl Extractor {
    pub fn new(scope: UrlScope) -> Self {
        Self { scope }
    }

    /// Parses HTML content and extracts title, text and scoped links
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:** `<a href="...">` anywhere in the document, resolved
    /// against `base_url` and accepted by the crawl scope.
    ///
    /// **Exclude:**
    /// - `<a href="..." download>`
    /// - `javascript:`, `mailto:`, `tel:`, `data:` links
    /// - Off-domain links and non-text resources
    ///
    /// # Example
    ///
    /// ```
    /// use site_scribe::crawler::Extractor;
    /// use site_scribe::url::UrlScope;
    /// use url::Url;
    ///
    /// let base_url = Url::parse("https://example.com/").unwrap();
    /// let extractor = Extractor::new(UrlScope::from_seed(&base_url, false).unwrap());
    ///
    /// let html = r#"<html><head><title>Test</title></head>
    ///     <body><p>Hello</p><a href="/page">Link</a></body></html>"#;
    /// let parsed = extractor.extract(html, &base_url).unwrap();
    /// assert_eq!(parsed.title, Some("Test".to_string()));
    /// assert_eq!(parsed.text, "Hello\nLink");
    /// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
    /// ```
    pub fn extract(&self, html: &str, base_url: &Url) -> Result<ParsedPage, ExtractError> {
        if html.contains('\0') {
            return Err(ExtractError::ParseFailure(
                "body contains binary data".to_string(),
            ));
        }

        let document = Html::parse_document(html);

        Ok(ParsedPage {
            title: extract_title(&document),
            text: extract_text(&document),
            links: self.extract_links(&document, base_url),
        })
    }

    /// Extracts all in-scope links from the HTML document
    fn extract_links(&self, document: &Html, base_url: &Url) -> Vec<Url> {
        let mut links = Vec::new();

        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in document.select(&a_selector) {
                if element.value().attr("download").is_some() {
                    continue;
                }

                if let Some(href) = element.value().attr("href") {
                    if let Some(url) = self.scope.normalize(base_url, href) {
                        links.push(url);
                    }
                }
            }
        }

        links
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Flattens the visible text of a document into block-ordered lines
///
/// Walks the tree iteratively. Each text node belongs to its nearest block
/// ancestor; a change of block (or a `<br>`) starts a new line.
fn extract_text(document: &Html) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_block = None;

    for node in document.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map_or(false, |e| SKIPPED_TAGS.contains(&e.name()))
                });
                if hidden {
                    continue;
                }

                let block = node
                    .ancestors()
                    .find(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .map_or(false, |e| BLOCK_TAGS.contains(&e.name()))
                    })
                    .map(|ancestor| ancestor.id());

                if block != current_block {
                    flush_block(&mut current, &mut blocks);
                    current_block = block;
                }
                current.push_str(text);
            }
            Node::Element(element) if element.name() == "br" => {
                flush_block(&mut current, &mut blocks);
            }
            _ => {}
        }
    }
    flush_block(&mut current, &mut blocks);

    blocks.join("\n")
}

fn flush_block(current: &mut String, blocks: &mut Vec<String>) {
    let block = collapse_whitespace(current);
    if !block.is_empty() {
        blocks.push(block);
    }
    current.clear();
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
