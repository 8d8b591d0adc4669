//! Core data model: document identity, summaries, and search results.

use crate::vectorizer::{vectorize, TermVector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Source kind of an ingested document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    /// Scraped from a URL.
    Url,
    /// Supplied directly as text.
    Text,
}

impl DocType {
    /// Stable string label used in presentation and the API surface.
    pub fn label(&self) -> &'static str {
        match self {
            DocType::Url => "URL",
            DocType::Text => "Text",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Compute the document identifier: the hex-encoded SHA-256 digest of
/// `identifier` (the URL for URL documents, the text body for text
/// documents). Identical identifiers always yield the identical doc-id,
/// which is what makes ingestion idempotent.
pub fn doc_id(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hex::encode(hasher.finalize())
}

/// The compact, index-ready record of an ingested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSummary {
    /// 64-char lowercase hex SHA-256 of `identifier`.
    pub doc_id: String,
    /// Non-empty display title.
    pub title: String,
    /// Original URL or text body.
    pub identifier: String,
    /// Source kind.
    pub doc_type: DocType,
    /// token -> relative frequency in `[0, 1]`.
    pub term_freqs: HashMap<String, f64>,
    /// `sum(term_freqs[t]^2)`, precomputed so the ranker never rescans.
    pub square_norm: f64,
}

impl DocSummary {
    /// Build a summary from raw text plus the metadata the caller supplies.
    pub fn new(text: &str, identifier: &str, title: &str, doc_type: DocType) -> Self {
        let TermVector {
            term_freqs,
            square_norm,
        } = vectorize(text);
        DocSummary {
            doc_id: doc_id(identifier),
            title: title.to_string(),
            identifier: identifier.to_string(),
            doc_type,
            term_freqs,
            square_norm,
        }
    }
}

/// A single ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document identifier.
    pub doc_id: String,
    /// Display title.
    pub title: String,
    /// Original URL or text body.
    pub identifier: String,
    /// Source kind label (`"URL"` / `"Text"`).
    pub doc_type: String,
    /// Similarity score in `[0, 1]` (finite, non-negative).
    pub score: f64,
}
