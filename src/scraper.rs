//! URL scraping collaborator.
//!
//! The design treats scraping as an external, pure-function collaborator
//! (`URL -> {title, text}`); this module defines that seam as a trait plus
//! one concrete implementation so the crate is runnable end-to-end without
//! a caller-supplied scraper. [`HttpScraper`] is a direct port of the
//! tag-walking extraction the original scraper performs: pull `<title>`,
//! the meta description, and the text of a fixed set of content tags,
//! stopping at `<footer>`.

use crate::error::DocuError;
use scraper::{Element, Html, Selector};

/// Title and extracted text body of a scraped page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeData {
    /// Page `<title>`, empty string if absent.
    pub title: String,
    /// Whitespace-collapsed textual body extracted from content tags.
    pub content: String,
}

/// External collaborator: fetch and extract readable text from a URL.
pub trait Scraper: Send + Sync {
    /// Scrape `url`, returning its title and extracted text.
    fn scrape(&self, url: &str) -> Result<ScrapeData, DocuError>;
}

/// Content tags whose text is pulled into the scraped body, in the order
/// the original extraction walked the document.
const TEXT_TAGS: &[&str] = &[
    "a", "p", "strong", "code", "span", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Default [`Scraper`]: blocking HTTP GET plus HTML text extraction.
#[derive(Debug, Default, Clone)]
pub struct HttpScraper;

impl Scraper for HttpScraper {
    fn scrape(&self, url: &str) -> Result<ScrapeData, DocuError> {
        let trimmed = url.trim();
        let body = reqwest::blocking::get(trimmed)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| DocuError::ScrapeError {
                url: trimmed.to_string(),
                reason: e.to_string(),
            })?;

        Ok(extract(&body))
    }
}

fn extract(body: &str) -> ScrapeData {
    let document = Html::parse_document(body);

    let title = select_first_text(&document, "title");

    let mut buffer = String::new();
    buffer.push_str(&title);
    buffer.push('\n');

    if let Some(description) = meta_description(&document) {
        buffer.push_str(&description);
        buffer.push('\n');
    }

    for tag in TEXT_TAGS {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        for el in document.select(&selector) {
            if has_footer_ancestor(&el) {
                continue;
            }
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();
            if !text.is_empty() {
                buffer.push('\n');
                buffer.push_str(text);
                buffer.push(' ');
            }
        }
    }

    ScrapeData {
        title,
        content: buffer,
    }
}

fn has_footer_ancestor(el: &scraper::ElementRef) -> bool {
    let mut current = el.parent_element();
    while let Some(parent) = current {
        if parent.value().name() == "footer" {
            return true;
        }
        current = parent.parent_element();
    }
    false
}

fn select_first_text(document: &Html, selector: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<Vec<_>>().join(""))
        .unwrap_or_default()
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_description_and_body_text() {
        let html = r#"
            <html>
            <head>
                <title>Example Page</title>
                <meta name="description" content="An example page.">
            </head>
            <body>
                <p>First paragraph.</p>
                <h1>Heading</h1>
                <footer><p>copyright notice</p></footer>
            </body>
            </html>
        "#;
        let data = extract(html);
        assert_eq!(data.title, "Example Page");
        assert!(data.content.contains("An example page."));
        assert!(data.content.contains("First paragraph."));
        assert!(data.content.contains("Heading"));
        assert!(!data.content.contains("copyright notice"));
    }

    #[test]
    fn missing_title_yields_empty_string() {
        let data = extract("<html><body><p>hi</p></body></html>");
        assert_eq!(data.title, "");
    }
}
