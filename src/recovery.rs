//! Recovery protocol for the two derived artifacts.
//!
//! The document store is authoritative; the inverted index and corpus
//! counter are optional, rebuildable caches. On startup each artifact goes
//! through the same three-step check: no documents yet -> fresh empty
//! artifact; undecodable -> rebuild; decoded but stale relative to the
//! store's latest timestamp -> rebuild. Rebuilding itself failing is fatal
//! for the current startup.

use crate::counter::{CorpusCounter, CorpusCounterArtifact};
use crate::error::{DocuError, Result};
use crate::index::{InvertedIndex, InvertedIndexArtifact};
use crate::store::DocumentStore;
use crate::{artifact, types::DocSummary};
use std::path::Path;
use tracing::{info, warn};

/// Load or recover the inverted index at `path` against `store`.
pub fn load_or_recover_index(store: &DocumentStore, path: &Path) -> Result<InvertedIndex> {
    let latest_ts = store.latest_timestamp()?;
    if latest_ts == 0 {
        return Ok(InvertedIndex::new());
    }

    match artifact::load_struct::<InvertedIndexArtifact>(path) {
        Ok(decoded) if decoded.timestamp == latest_ts => {
            return Ok(InvertedIndex::from_artifact(decoded));
        }
        Ok(decoded) => {
            warn!(
                target: "docustore::recovery",
                artifact_ts = decoded.timestamp,
                store_ts = latest_ts,
                "inverted index is out of sync with the document store, rebuilding"
            );
        }
        Err(e) => {
            warn!(target: "docustore::recovery", error = %e, "failed to decode inverted index, rebuilding");
        }
    }

    rebuild_index(store, path)
}

fn rebuild_index(store: &DocumentStore, path: &Path) -> Result<InvertedIndex> {
    let index = InvertedIndex::new();
    let doc_ids = store.list_documents().map_err(recovery_failed)?;
    for doc_id in &doc_ids {
        let (summary, ts): (DocSummary, i64) =
            store.load_doc_summary(doc_id).map_err(recovery_failed)?;
        index.insert_doc(&summary.doc_id, &summary.term_freqs, ts);
    }
    artifact::save_struct(path, &index.to_artifact()).map_err(recovery_failed)?;
    info!(target: "docustore::recovery", docs = doc_ids.len(), "inverted index rebuilt from store");
    Ok(index)
}

/// Load or recover the corpus counter at `path` against `store`.
pub fn load_or_recover_counter(store: &DocumentStore, path: &Path) -> Result<CorpusCounter> {
    let latest_ts = store.latest_timestamp()?;
    if latest_ts == 0 {
        return Ok(CorpusCounter::new());
    }

    match artifact::load_struct::<CorpusCounterArtifact>(path) {
        Ok(decoded) if decoded.timestamp == latest_ts => {
            return Ok(CorpusCounter::from_artifact(decoded));
        }
        Ok(decoded) => {
            warn!(
                target: "docustore::recovery",
                artifact_ts = decoded.timestamp,
                store_ts = latest_ts,
                "corpus counter is out of sync with the document store, rebuilding"
            );
        }
        Err(e) => {
            warn!(target: "docustore::recovery", error = %e, "failed to decode corpus counter, rebuilding");
        }
    }

    rebuild_counter(store, path)
}

fn rebuild_counter(store: &DocumentStore, path: &Path) -> Result<CorpusCounter> {
    let counter = CorpusCounter::new();
    let doc_ids = store.list_documents().map_err(recovery_failed)?;
    for doc_id in &doc_ids {
        let (summary, ts): (DocSummary, i64) =
            store.load_doc_summary(doc_id).map_err(recovery_failed)?;
        counter.add_document(&summary.term_freqs, ts);
    }
    artifact::save_struct(path, &counter.to_artifact()).map_err(recovery_failed)?;
    info!(target: "docustore::recovery", docs = doc_ids.len(), "corpus counter rebuilt from store");
    Ok(counter)
}

fn recovery_failed(e: DocuError) -> DocuError {
    DocuError::RecoveryError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocType;

    fn seeded_store(dir: &Path) -> DocumentStore {
        let store = DocumentStore::open(dir.join("storage.db")).unwrap();
        let texts = [
            ("the quick brown fox", "D1"),
            ("lazy brown dog", "D2"),
            ("completely unrelated content", "D3"),
        ];
        for (i, (text, title)) in texts.iter().enumerate() {
            let summary = DocSummary::new(text, text, title, DocType::Text);
            store.insert_document(&summary, text, i as i64 + 1).unwrap();
        }
        store
    }

    #[test]
    fn recovers_fresh_artifacts_when_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("storage.db")).unwrap();
        let index = load_or_recover_index(&store, &dir.path().join("index.bin")).unwrap();
        assert_eq!(index.timestamp(), 0);
    }

    #[test]
    fn rebuilds_from_missing_artifact_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());
        let index_path = dir.path().join("index.bin");
        let index = load_or_recover_index(&store, &index_path).unwrap();
        assert_eq!(index.timestamp(), store.latest_timestamp().unwrap());
        assert!(index_path.exists());
    }

    #[test]
    fn rebuilds_from_stale_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());
        let counter_path = dir.path().join("counter.bin");

        let stale = CorpusCounterArtifact {
            num_docs: 1,
            doc_counts: std::collections::HashMap::new(),
            timestamp: 0,
        };
        artifact::save_struct(&counter_path, &stale).unwrap();

        let counter = load_or_recover_counter(&store, &counter_path).unwrap();
        assert_eq!(counter.timestamp(), store.latest_timestamp().unwrap());
        assert_eq!(counter.num_docs(), 3);
    }

    #[test]
    fn rebuilds_from_corrupted_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path());
        let index_path = dir.path().join("index.bin");
        std::fs::write(&index_path, b"not an artifact").unwrap();

        let index = load_or_recover_index(&store, &index_path).unwrap();
        assert_eq!(index.timestamp(), store.latest_timestamp().unwrap());
    }
}
