//! HTML document wrapper for results pages
//!
//! This module handles parsing HTML content to extract:
//! - The text of listing nodes matched by a CSS selector
//! - Every hyperlink with its visible text
//! - The "Next" pagination link

use scraper::{Html, Selector};

/// CSS selector for the availability line on each listing card
pub const AVAILABILITY_SELECTOR: &str = ".available-from";

/// Visible text that marks the pagination link to the following page
pub const NEXT_LINK_TEXT: &str = "Next";

/// A hyperlink found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Concatenated visible text of the `<a>` element
    pub text: String,
    /// Raw `href` attribute, not resolved
    pub href: String,
}

/// A parsed results page
///
/// Parsing is lenient: malformed markup produces a best-effort tree and
/// invalid UTF-8 is replaced rather than rejected.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw page bytes into a queryable document
    ///
    /// # Example
    ///
    /// ```
    /// use availability_crawler::crawler::Document;
    ///
    /// let doc = Document::parse(br#"<p class="available-from">Available immediately</p>"#);
    /// assert_eq!(doc.select_text(".available-from"), vec!["Available immediately"]);
    /// ```
    pub fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        Self {
            html: Html::parse_document(&text),
        }
    }

    /// Returns the text of every element matching `css`, in document order
    ///
    /// An unparsable selector matches nothing.
    pub fn select_text(&self, css: &str) -> Vec<String> {
        let selector = match Selector::parse(css) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::warn!("Invalid CSS selector {:?}: {:?}", css, e);
                return Vec::new();
            }
        };

        self.html
            .select(&selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    /// Returns the availability text of every listing on the page
    pub fn availability_texts(&self) -> Vec<String> {
        self.select_text(AVAILABILITY_SELECTOR)
    }

    /// Enumerates every `<a href>` with its visible text, in document order
    pub fn links(&self) -> Vec<Link> {
        let Ok(a_selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        self.html
            .select(&a_selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                Some(Link {
                    text: element.text().collect::<String>(),
                    href: href.to_string(),
                })
            })
            .collect()
    }

    /// Returns the href of the first link whose text contains "Next"
    ///
    /// The match is case-sensitive and on a substring, so `"Next page"` or
    /// `"Next >"` qualify but `"next"` does not.
    pub fn next_page_path(&self) -> Option<String> {
        self.links()
            .into_iter()
            .find(|link| link.text.contains(NEXT_LINK_TEXT))
            .map(|link| link.href)
    }
}
