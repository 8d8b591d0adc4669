//! Authoritative document store.
//!
//! Single-table SQLite schema: `documents(doc_id, timestamp, summary,
//! content)`. All writes go through one connection guarded by a mutex (the
//! store is the single-writer source of truth; see design §5); reads that
//! need to run in parallel open their own short-lived connection against
//! the same file, which SQLite supports concurrently.

use crate::error::{DocuError, Result};
use crate::types::DocSummary;
use parking_lot::Mutex;
use rayon::prelude::*;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Authoritative relational store for document rows.
pub struct DocumentStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Open (creating if needed) the store at `path`, idempotently creating
    /// its schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        create_schema(&conn)?;
        Ok(DocumentStore {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Insert a document row inside a transaction.
    ///
    /// Returns the number of rows affected: `0` if `doc_id` already existed
    /// (idempotent duplicate), `1` on a fresh insert.
    pub fn insert_document(
        &self,
        summary: &DocSummary,
        content: &str,
        timestamp: i64,
    ) -> Result<u64> {
        let blob = rmp_serde::to_vec(summary).map_err(|e| {
            DocuError::ArtifactError {
                path: self.path.clone(),
                source: crate::error::ArtifactCause::Encode(e),
            }
        })?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let rows = tx.execute(
            "INSERT OR IGNORE INTO documents (doc_id, timestamp, summary, content) \
             VALUES (?1, ?2, ?3, ?4)",
            params![summary.doc_id, timestamp, blob, content],
        )?;
        tx.commit()?;
        Ok(rows as u64)
    }

    /// `max(timestamp)` over all rows, `0` when the store is empty.
    pub fn latest_timestamp(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let ts: Option<i64> =
            conn.query_row("SELECT MAX(timestamp) FROM documents", [], |row| row.get(0))?;
        Ok(ts.unwrap_or(0))
    }

    /// All document identifiers currently in the store.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT doc_id FROM documents")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Load the raw content for `doc_id`.
    pub fn load_text(&self, doc_id: &str) -> Result<String> {
        let conn = self.conn.lock();
        let text = conn.query_row(
            "SELECT content FROM documents WHERE doc_id = ?1",
            params![doc_id],
            |row| row.get::<_, String>(0),
        )?;
        Ok(text)
    }

    /// Load a single document summary and the timestamp it was inserted at.
    pub fn load_doc_summary(&self, doc_id: &str) -> Result<(DocSummary, i64)> {
        let conn = self.conn.lock();
        let (blob, ts): (Vec<u8>, i64) = conn.query_row(
            "SELECT summary, timestamp FROM documents WHERE doc_id = ?1",
            params![doc_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let summary = rmp_serde::from_slice(&blob).map_err(|e| DocuError::ArtifactError {
            path: self.path.clone(),
            source: crate::error::ArtifactCause::Decode(e),
        })?;
        Ok((summary, ts))
    }

    /// Batch-load summaries for `doc_ids`, in parallel, preserving input
    /// order. The first failure flips the shared cancellation flag; loads
    /// that observe the flag before starting report
    /// [`DocuError::CancelledError`] instead of running, but the original
    /// failure always wins the race to be returned (first-error-wins,
    /// matching the cancellation model in design §5).
    pub fn load_doc_summaries(&self, doc_ids: &[String]) -> Result<Vec<DocSummary>> {
        if doc_ids.is_empty() {
            return Ok(Vec::new());
        }

        let path = self.path.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let first_error: Mutex<Option<DocuError>> = Mutex::new(None);
        let mut results: Vec<Option<DocSummary>> = (0..doc_ids.len()).map(|_| None).collect();

        results
            .par_iter_mut()
            .zip(doc_ids.par_iter())
            .for_each(|(slot, doc_id)| {
                if cancelled.load(Ordering::Relaxed) {
                    let mut guard = first_error.lock();
                    if guard.is_none() {
                        *guard = Some(DocuError::CancelledError);
                    }
                    return;
                }
                match load_one(&path, doc_id) {
                    Ok(summary) => *slot = Some(summary),
                    Err(e) => {
                        cancelled.store(true, Ordering::Relaxed);
                        let mut guard = first_error.lock();
                        if guard.is_none() {
                            *guard = Some(e);
                        }
                    }
                }
            });

        if let Some(err) = first_error.into_inner() {
            return Err(err);
        }

        Ok(results.into_iter().map(|s| s.expect("all slots filled")).collect())
    }
}

fn load_one(path: &Path, doc_id: &str) -> Result<DocSummary> {
    let conn = Connection::open(path)?;
    let (blob, _ts): (Vec<u8>, i64) = conn.query_row(
        "SELECT summary, timestamp FROM documents WHERE doc_id = ?1",
        params![doc_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    rmp_serde::from_slice(&blob).map_err(|e| DocuError::ArtifactError {
        path: path.to_path_buf(),
        source: crate::error::ArtifactCause::Decode(e),
    })
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS documents (
            doc_id TEXT PRIMARY KEY,
            timestamp INTEGER NOT NULL,
            summary BLOB NOT NULL,
            content BLOB NOT NULL
        );
        CREATE INDEX IF NOT EXISTS documents_timestamp_idx ON documents(timestamp);",
    )?;
    Ok(())
}
