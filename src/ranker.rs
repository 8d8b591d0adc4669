//! TF-IDF cosine ranker.
//!
//! Owns an IDF cache tagged with the corpus-counter version it was computed
//! against, and a fixed-capacity LRU of per-document weighted norms so
//! repeated queries against the same corpus don't rescan every document's
//! term-frequency map.
//!
//! The score formula below is carried over verbatim from the source this
//! design is distilled from (see design notes, open question 1): an outer
//! `sqrt` over `dot / sqrt(norms)` is mathematically unusual for cosine
//! similarity, but we preserve the shape rather than infer a cleaner
//! intent.

use crate::counter::CorpusCounter;
use crate::types::{DocSummary, SearchResult};
use crate::vectorizer::vectorize;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Default capacity of the per-document weighted-norm cache.
pub const DEFAULT_NORM_CACHE_CAPACITY: usize = 1024;

struct IdfCache {
    idf: HashMap<String, f64>,
    version: i64,
}

/// Pluggable scoring surface. The TF-IDF cosine ranker is the only
/// implementation shipped, but the trait leaves room for an alternative
/// (e.g. BM25) without touching the engine.
pub trait Searcher: Send + Sync {
    /// Rank `docs` against `query`, using `counter` for corpus statistics.
    fn search(&self, query: &str, counter: &CorpusCounter, docs: &[DocSummary]) -> Vec<SearchResult>;
}

/// TF-IDF cosine similarity ranker.
pub struct Ranker {
    idf_cache: Mutex<IdfCache>,
    norm_cache: Mutex<LruCache<String, f64>>,
}

impl Ranker {
    /// A ranker with the default norm-cache capacity ([`DEFAULT_NORM_CACHE_CAPACITY`]).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NORM_CACHE_CAPACITY)
    }

    /// A ranker whose per-document norm cache holds at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Ranker {
            idf_cache: Mutex::new(IdfCache {
                idf: HashMap::new(),
                version: -1,
            }),
            norm_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Recompute the IDF table if the counter has advanced past the
    /// version the cache was last built against. Idempotent per counter
    /// timestamp.
    fn refresh_idf(&self, counter: &CorpusCounter) {
        let counter_ts = counter.timestamp();
        let mut cache = self.idf_cache.lock();
        if cache.version == counter_ts {
            return;
        }
        let num_docs = counter.num_docs() as f64;
        let mut idf = HashMap::new();
        for (token, df) in counter.doc_counts_snapshot() {
            idf.insert(token, (num_docs / (1.0 + df as f64)).ln() + 1.0);
        }
        cache.idf = idf;
        cache.version = counter_ts;
    }

    fn idf_of(&self, token: &str) -> f64 {
        self.idf_cache
            .lock()
            .idf
            .get(token)
            .copied()
            .unwrap_or(1.0)
    }

    fn weighted_doc_norm(&self, doc: &DocSummary) -> f64 {
        if let Some(cached) = self.norm_cache.lock().get(&doc.doc_id) {
            return *cached;
        }
        let norm: f64 = doc
            .term_freqs
            .iter()
            .map(|(token, freq)| {
                let idf = self.idf_of(token);
                freq * freq * idf * idf
            })
            .sum();
        self.norm_cache.lock().put(doc.doc_id.clone(), norm);
        norm
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher for Ranker {
    fn search(&self, query: &str, counter: &CorpusCounter, docs: &[DocSummary]) -> Vec<SearchResult> {
        let q_vec = vectorize(query);
        self.refresh_idf(counter);

        // Pre-weight query terms: q_tf'[t] = f * idf[t]^2, accumulating
        // query_norm = sum(f * q_tf'[t]) = sum(f^2 * idf[t]^2).
        let mut q_weighted: HashMap<String, f64> = HashMap::with_capacity(q_vec.term_freqs.len());
        let mut query_norm = 0.0;
        for (token, freq) in &q_vec.term_freqs {
            let idf = self.idf_of(token);
            let weighted = freq * idf * idf;
            query_norm += freq * weighted;
            q_weighted.insert(token.clone(), weighted);
        }

        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|doc| {
                let doc_norm = self.weighted_doc_norm(doc);
                let raw_score: f64 = q_weighted
                    .iter()
                    .map(|(token, weighted)| weighted * doc.term_freqs.get(token).copied().unwrap_or(0.0))
                    .sum();
                let inv = (query_norm * doc_norm + 1e-8).sqrt();
                let score = (raw_score / inv).sqrt();
                SearchResult {
                    doc_id: doc.doc_id.clone(),
                    title: doc.title.clone(),
                    identifier: doc.identifier.clone(),
                    doc_type: doc.doc_type.label().to_string(),
                    score,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results
    }
}
