//! In-memory inverted index: term -> posting list of doc-ids.
//!
//! Backed by a `DashMap` bucketed hash table rather than a self-balancing
//! tree — a flat hash map is asymptotically faster for this workload and
//! avoids rebalance machinery the ranker never needed (ordered term
//! iteration is unused downstream).

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Term -> ordered posting list, plus a watermark timestamp for staleness
/// detection against the document store.
pub struct InvertedIndex {
    postings: DashMap<String, Vec<String>>,
    timestamp: parking_lot::Mutex<i64>,
}

/// Serializable snapshot of an [`InvertedIndex`], used by the artifact codec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvertedIndexArtifact {
    /// token -> ordered posting list.
    pub postings: std::collections::HashMap<String, Vec<String>>,
    /// Timestamp of the latest document contributed to this index.
    pub timestamp: i64,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InvertedIndex {
    /// An empty index with no watermark.
    pub fn new() -> Self {
        InvertedIndex {
            postings: DashMap::new(),
            timestamp: parking_lot::Mutex::new(0),
        }
    }

    /// For each token in `summary.term_freqs`, append `summary.doc_id` to
    /// that token's posting list, then raise the watermark to `timestamp`.
    pub fn insert_doc(&self, doc_id: &str, term_freqs: &std::collections::HashMap<String, f64>, timestamp: i64) {
        for token in term_freqs.keys() {
            self.postings
                .entry(token.clone())
                .or_default()
                .push(doc_id.to_string());
        }
        *self.timestamp.lock() = timestamp;
    }

    /// Look up each queried token's posting list and accumulate unique
    /// doc-ids, preserving first-seen order.
    pub fn search_tokens(&self, tokens: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for token in tokens {
            if let Some(postings) = self.postings.get(token) {
                for doc_id in postings.iter() {
                    if seen.insert(doc_id.clone()) {
                        out.push(doc_id.clone());
                    }
                }
            }
        }
        out
    }

    /// Current watermark timestamp.
    pub fn timestamp(&self) -> i64 {
        *self.timestamp.lock()
    }

    /// Snapshot the index for persistence.
    pub fn to_artifact(&self) -> InvertedIndexArtifact {
        let postings = self
            .postings
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        InvertedIndexArtifact {
            postings,
            timestamp: self.timestamp(),
        }
    }

    /// Rebuild an index from a previously saved snapshot.
    pub fn from_artifact(artifact: InvertedIndexArtifact) -> Self {
        let postings = DashMap::new();
        for (token, doc_ids) in artifact.postings {
            postings.insert(token, doc_ids);
        }
        InvertedIndex {
            postings,
            timestamp: parking_lot::Mutex::new(artifact.timestamp),
        }
    }
}
