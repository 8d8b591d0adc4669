//! In-memory corpus statistics: document count plus per-term document
//! frequency, used by the ranker's IDF calculation.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-term document frequency table plus a document count, versioned by
/// the timestamp of the latest contributing document.
pub struct CorpusCounter {
    inner: Mutex<CorpusCounterArtifact>,
}

/// Serializable snapshot of a [`CorpusCounter`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusCounterArtifact {
    /// Number of documents contributed so far.
    pub num_docs: u64,
    /// token -> number of documents containing it.
    pub doc_counts: HashMap<String, u64>,
    /// Timestamp of the latest document contributed.
    pub timestamp: i64,
}

impl Default for CorpusCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusCounter {
    /// A fresh, empty counter.
    pub fn new() -> Self {
        CorpusCounter {
            inner: Mutex::new(CorpusCounterArtifact::default()),
        }
    }

    /// `num_docs += 1`; for each token in `term_freqs`, `doc_counts[token]
    /// += 1`; `timestamp := timestamp`. No decrement is defined; removal
    /// requires full recovery.
    pub fn add_document(&self, term_freqs: &HashMap<String, f64>, timestamp: i64) {
        let mut inner = self.inner.lock();
        inner.num_docs += 1;
        for token in term_freqs.keys() {
            *inner.doc_counts.entry(token.clone()).or_insert(0) += 1;
        }
        inner.timestamp = timestamp;
    }

    /// Current watermark timestamp.
    pub fn timestamp(&self) -> i64 {
        self.inner.lock().timestamp
    }

    /// Total documents contributed.
    pub fn num_docs(&self) -> u64 {
        self.inner.lock().num_docs
    }

    /// Document frequency for `token`, `0` if never seen.
    pub fn doc_count(&self, token: &str) -> u64 {
        self.inner.lock().doc_counts.get(token).copied().unwrap_or(0)
    }

    /// Snapshot for persistence.
    pub fn to_artifact(&self) -> CorpusCounterArtifact {
        self.inner.lock().clone()
    }

    /// An immutable clone of the current per-term document-frequency table.
    pub fn doc_counts_snapshot(&self) -> HashMap<String, u64> {
        self.inner.lock().doc_counts.clone()
    }

    /// Rebuild a counter from a previously saved snapshot.
    pub fn from_artifact(artifact: CorpusCounterArtifact) -> Self {
        CorpusCounter {
            inner: Mutex::new(artifact),
        }
    }
}
