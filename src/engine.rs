//! The orchestrating engine: ingest, query, and startup recovery.
//!
//! Owns the document store, the in-memory inverted index, the corpus
//! counter, and the ranker. Write operations (`add_text`/`add_url`) are
//! serialized through `write_lock` so the in-memory structures and the
//! derived artifacts never observe a torn update; `search` only reads.

use crate::artifact;
use crate::config::default_data_dir;
use crate::counter::CorpusCounter;
use crate::error::{DocuError, Result};
use crate::index::InvertedIndex;
use crate::ranker::{Ranker, Searcher};
use crate::recovery::{load_or_recover_counter, load_or_recover_index};
use crate::scraper::{HttpScraper, Scraper};
use crate::store::DocumentStore;
use crate::tokenizer::tokenize;
use crate::types::{DocSummary, DocType, SearchResult};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

const INDEX_FILE: &str = "index.bin";
const COUNTER_FILE: &str = "counter.bin";
const STORE_FILE: &str = "storage.db";

/// Orchestrates the ingest-index-query pipeline and startup recovery.
pub struct DocuEngine {
    data_dir: PathBuf,
    store: DocumentStore,
    index: InvertedIndex,
    counter: CorpusCounter,
    ranker: Box<dyn Searcher>,
    scraper: Box<dyn Scraper>,
    write_lock: Mutex<()>,
}

impl DocuEngine {
    /// Open (or create) the engine at the default, XDG-resolved data
    /// directory.
    pub fn open_default() -> Result<Self> {
        Self::open(default_data_dir())
    }

    /// Open (or create) the engine rooted at `data_dir`.
    ///
    /// 1. Ensures the data directory exists.
    /// 2. Opens the document store, creating its schema idempotently.
    /// 3. Loads (or recovers) the inverted index.
    /// 4. Loads (or recovers) the corpus counter.
    /// 5. Constructs the ranker over the counter.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(data_dir, Box::new(HttpScraper))
    }

    /// Open the engine with a caller-supplied [`Scraper`] (for tests, or to
    /// swap in a different HTML extraction strategy).
    pub fn open_with(data_dir: impl Into<PathBuf>, scraper: Box<dyn Scraper>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let store = DocumentStore::open(data_dir.join(STORE_FILE))?;
        let index = load_or_recover_index(&store, &data_dir.join(INDEX_FILE))?;
        let counter = load_or_recover_counter(&store, &data_dir.join(COUNTER_FILE))?;

        info!(
            target: "docustore::engine",
            data_dir = %data_dir.display(),
            docs = counter.num_docs(),
            "engine ready"
        );

        Ok(DocuEngine {
            data_dir,
            store,
            index,
            counter,
            ranker: Box::new(Ranker::new()),
            scraper,
            write_lock: Mutex::new(()),
        })
    }

    /// Ingest a text document. `title` and `text` must be non-empty once
    /// trimmed; the identifier is the text body itself, so ingesting the
    /// same text twice is a no-op.
    pub fn add_text(&self, text: &str, title: &str) -> Result<()> {
        let text = text.trim();
        let title = title.trim();
        self.ingest(text, text, title, DocType::Text)
    }

    /// Ingest a URL: scrape it via the configured [`Scraper`], then ingest
    /// the scraped title/content with `identifier := url`.
    pub fn add_url(&self, url: &str) -> Result<()> {
        let data = self.scraper.scrape(url)?;
        self.ingest(&data.content, url, &data.title, DocType::Url)
    }

    /// Tokenize `query`, ask the inverted index for candidates, batch-load
    /// their summaries, and rank them.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let tokens = tokenize(query);
        let doc_ids = self.index.search_tokens(&tokens);
        let docs = self.store.load_doc_summaries(&doc_ids)?;
        Ok(self.ranker.search(query, &self.counter, &docs))
    }

    /// Load the raw stored text for `doc_id`, for a document viewer.
    pub fn load_text(&self, doc_id: &str) -> Result<String> {
        self.store.load_text(doc_id)
    }

    fn ingest(&self, text: &str, identifier: &str, title: &str, doc_type: DocType) -> Result<()> {
        if title.is_empty() {
            return Err(DocuError::InputError("empty title".to_string()));
        }
        if text.is_empty() {
            return Err(DocuError::InputError("empty content".to_string()));
        }

        let _guard = self.write_lock.lock();

        let ts = now_unix();
        let summary = DocSummary::new(text, identifier, title, doc_type);

        let rows = self.store.insert_document(&summary, text, ts)?;
        if rows == 0 {
            // Duplicate doc_id: silent success, no side effects.
            return Ok(());
        }

        self.index.insert_doc(&summary.doc_id, &summary.term_freqs, ts);
        self.counter.add_document(&summary.term_freqs, ts);

        artifact::save_struct(&self.data_dir.join(INDEX_FILE), &self.index.to_artifact())?;
        artifact::save_struct(&self.data_dir.join(COUNTER_FILE), &self.counter.to_artifact())?;

        Ok(())
    }

    /// Data directory this engine is rooted at.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}

/// A no-op scraper useful in tests and for callers that never ingest URLs.
pub struct NullScraper;

impl Scraper for NullScraper {
    fn scrape(&self, url: &str) -> Result<crate::scraper::ScrapeData> {
        Err(DocuError::ScrapeError {
            url: url.to_string(),
            reason: "no scraper configured".to_string(),
        })
    }
}

/// A fixed-response scraper for tests: always returns the same `ScrapeData`.
pub struct StubScraper(pub Arc<crate::scraper::ScrapeData>);

impl Scraper for StubScraper {
    fn scrape(&self, _url: &str) -> Result<crate::scraper::ScrapeData> {
        Ok((*self.0).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::ScrapeData;

    fn engine_with_scraper(dir: &Path, scraper: Box<dyn Scraper>) -> DocuEngine {
        DocuEngine::open_with(dir.to_path_buf(), scraper).unwrap()
    }

    fn engine(dir: &Path) -> DocuEngine {
        engine_with_scraper(dir, Box::new(NullScraper))
    }

    #[test]
    fn empty_title_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let result = engine.add_text("some content", "");
        assert!(matches!(result, Err(DocuError::InputError(_))));
        assert!(engine.store.list_documents().unwrap().is_empty());
    }

    #[test]
    fn empty_content_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let result = engine.add_text("   ", "title");
        assert!(matches!(result, Err(DocuError::InputError(_))));
    }

    #[test]
    fn add_url_uses_scraper_title_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubScraper(Arc::new(ScrapeData {
            title: "Scraped Title".to_string(),
            content: "scraped body text".to_string(),
        }));
        let engine = engine_with_scraper(dir.path(), Box::new(stub));
        engine.add_url("https://example.com").unwrap();

        let results = engine.search("scraped body").unwrap();
        assert_eq!(results[0].title, "Scraped Title");
        assert_eq!(results[0].doc_type, "URL");
    }

    #[test]
    fn timestamps_stay_in_sync_after_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        engine.add_text("alpha", "a").unwrap();
        engine.add_text("beta", "b").unwrap();

        let store_ts = engine.store.latest_timestamp().unwrap();
        assert_eq!(engine.index.timestamp(), store_ts);
        assert_eq!(engine.counter.timestamp(), store_ts);
    }
}
