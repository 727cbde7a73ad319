//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types. A document is
//! parsed once per analysis and never mutated afterwards; every analyzer reads
//! from the same tree.
//!
//! # Example
//!
//! ```rust
//! use aiscout_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.count("p.content"), 1);
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{AiscoutError, Result};

/// A parsed HTML page.
///
/// Holds the parsed tree and the page URL when one was given and could be
/// parsed. Parsing never fails: html5ever recovers from any
/// malformed input, so every byte string yields some tree.
///
/// # Example
///
/// ```rust
/// use aiscout_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html);
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string with no page URL.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html), base_url: None }
    }

    /// Parses HTML and records the page URL.
    ///
    /// An unparseable URL is dropped rather than reported; link
    /// classification then treats every absolute link as external.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aiscout_core::parse::Document;
    ///
    /// let doc = Document::parse_with_url("<p>Hi</p>", "https://example.com/page");
    /// assert_eq!(doc.base_url().map(|u| u.host_str()), Some(Some("example.com")));
    ///
    /// let doc = Document::parse_with_url("<p>Hi</p>", "not a url");
    /// assert!(doc.base_url().is_none());
    /// ```
    pub fn parse_with_url(html: &str, url: &str) -> Self {
        let base_url = Url::parse(url).ok();
        Self { html: Html::parse_document(html), base_url }
    }

    /// Gets the page URL, if one was given and parsed.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Gets the underlying `scraper::Html` tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the root `<html>` element.
    pub fn root(&'_ self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`AiscoutError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aiscout_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| AiscoutError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Option<Element<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.html.select(&sel).next().map(|el| Element { element: el })
    }

    /// Counts elements matching a CSS selector. Invalid selectors count zero.
    pub fn count(&self, selector: &str) -> usize {
        match Selector::parse(selector) {
            Ok(sel) => self.html.select(&sel).count(),
            Err(_) => 0,
        }
    }

    /// Gets the text of the first `<title>` element.
    pub fn title(&self) -> Option<String> {
        self.select_first("title").map(|el| el.text())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use aiscout_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`AiscoutError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| AiscoutError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the wrapped `ElementRef` for tree walks.
    pub fn element_ref(&self) -> ElementRef<'a> {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
        assert!(doc.base_url().is_none());
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("a").unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attr("href"), Some("https://example.com"));
        assert_eq!(elements[0].attr("title"), None);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(AiscoutError::HtmlParseError(_))));
        assert_eq!(doc.count("[[invalid"), 0);
    }

    #[test]
    fn test_root_lang() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.root().attr("lang"), Some("en"));
    }

    #[test]
    fn test_missing_title() {
        let doc = Document::parse("<html><body><p>Hi</p></body></html>");
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_parse_with_url() {
        let doc = Document::parse_with_url(SAMPLE_HTML, "https://example.com/a/b");
        assert_eq!(doc.base_url().unwrap().as_str(), "https://example.com/a/b");
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let doc = Document::parse("<div><p>Unclosed <b>bold<div></span>");
        assert_eq!(doc.count("p"), 1);
    }
}
