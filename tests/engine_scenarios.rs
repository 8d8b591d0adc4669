//! End-to-end scenario tests against the document store, recovery protocol,
//! and ranker wired together through [`DocuEngine`].

use docustore::{DocuEngine, DocuError};

fn open(dir: &std::path::Path) -> DocuEngine {
    DocuEngine::open(dir.to_path_buf()).unwrap()
}

#[test]
fn s1_idempotent_ingest_is_a_silent_noop() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());
    engine.add_text("hello world", "t1").unwrap();
    engine.add_text("hello world", "t1").unwrap();

    let results = engine.search("hello").unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn s2_empty_title_or_content_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());
    assert!(matches!(
        engine.add_text("some content", ""),
        Err(DocuError::InputError(_))
    ));
    assert!(matches!(
        engine.add_text("", "a title"),
        Err(DocuError::InputError(_))
    ));
}

#[test]
fn s3_multi_doc_ranking_orders_by_relevance() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());
    engine.add_text("the quick brown fox", "D1").unwrap();
    engine.add_text("lazy brown dog", "D2").unwrap();
    engine.add_text("completely unrelated content", "D3").unwrap();

    let results = engine.search("brown fox").unwrap();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["D1", "D2", "D3"]);
    assert!(results[0].score > results[1].score);
    assert!(results[1].score > 0.0);
    assert_eq!(results[2].score, 0.0);
}

#[test]
fn s4_recovery_after_artifact_loss() {
    let dir = tempfile::tempdir().unwrap();
    {
        let engine = open(dir.path());
        engine.add_text("the quick brown fox", "D1").unwrap();
        engine.add_text("lazy brown dog", "D2").unwrap();
        engine.add_text("completely unrelated content", "D3").unwrap();
    }

    std::fs::remove_file(dir.path().join("index.bin")).unwrap();
    std::fs::remove_file(dir.path().join("counter.bin")).unwrap();

    let engine = open(dir.path());
    let results = engine.search("brown fox").unwrap();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["D1", "D2", "D3"]);
}

#[test]
fn s5_stale_artifact_triggers_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    {
        let engine = open(dir.path());
        engine.add_text("the quick brown fox", "D1").unwrap();
        engine.add_text("lazy brown dog", "D2").unwrap();
    }

    // Corrupt the artifact outright rather than reach into its internals:
    // any undecodable artifact takes the same rebuild path as a stale one.
    std::fs::write(dir.path().join("counter.bin"), b"not an artifact").unwrap();

    let engine = open(dir.path());
    let results = engine.search("brown").unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn s6_unicode_queries_fold_to_the_same_tokens_as_ascii() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path());
    engine.add_text("café résumé", "t2").unwrap();

    let hits = engine.search("cafe").unwrap();
    assert_eq!(hits[0].title, "t2");
    assert!(hits[0].score > 0.0);

    let hits_upper = engine.search("CAFE").unwrap();
    assert_eq!(hits_upper[0].title, "t2");
}

#[test]
fn reopening_an_existing_data_dir_preserves_search_results() {
    let dir = tempfile::tempdir().unwrap();
    {
        let engine = open(dir.path());
        engine.add_text("persistent content across restarts", "P1").unwrap();
    }

    let engine = open(dir.path());
    let results = engine.search("persistent").unwrap();
    assert_eq!(results[0].title, "P1");
}
