//! End-to-end ingestion: text in, additive per-document links out.

mod common;

use common::{file_ingestor, incidence, links_of, memory_ingestor, PROSE};
use std::sync::{Arc, Barrier};
use std::thread;
use wordweave::{LinkType, WordStore};

#[test]
fn reingesting_doubles_every_incidence() {
    let ingestor = memory_ingestor();

    ingestor.ingest_text("prose", PROSE).unwrap();
    let words_after_first = ingestor.store().word_count().unwrap();
    let first = links_of(ingestor.store().as_ref(), "prose");

    let second_report = ingestor.ingest_text("prose", PROSE).unwrap();
    let second = links_of(ingestor.store().as_ref(), "prose");

    assert_eq!(second_report.words_inserted, 0);
    assert_eq!(ingestor.store().word_count().unwrap(), words_after_first);
    assert_eq!(first.len(), second.len(), "no duplicate link rows");
    for (before, after) in first.iter().zip(&second) {
        assert_eq!(before.a_word_id, after.a_word_id);
        assert_eq!(before.link_type, after.link_type);
        assert_eq!(after.incidence, before.incidence * 2);
    }
}

#[test]
fn same_document_name_accumulates_under_one_id() {
    let ingestor = memory_ingestor();

    let first = ingestor.ingest_text("d1", "Word list here. Word again.").unwrap();
    let second = ingestor.ingest_text("d1", "Word again.").unwrap();

    assert_eq!(first.doc_id, second.doc_id);
    assert_eq!(ingestor.store().list_docs().unwrap().len(), 1);

    let links = links_of(ingestor.store().as_ref(), "d1");
    assert_eq!(incidence(&links, "Word", "again", LinkType::Start), Some(2));
    assert_eq!(incidence(&links, "Word", "list", LinkType::Start), Some(1));
    assert_eq!(incidence(&links, "list", "here", LinkType::Stop), Some(1));
}

#[test]
fn overlapping_vocabulary_across_documents() {
    let ingestor = memory_ingestor();

    ingestor.ingest_text("a", "the cat sat.").unwrap();
    let report = ingestor.ingest_text("b", "the cat ran.").unwrap();

    assert_eq!(report.words_inserted, 1, "only 'ran' is new");
    assert_eq!(ingestor.store().word_count().unwrap(), 4);

    let a = links_of(ingestor.store().as_ref(), "a");
    let b = links_of(ingestor.store().as_ref(), "b");
    assert_eq!(incidence(&a, "the", "cat", LinkType::Start), Some(1));
    assert_eq!(incidence(&b, "the", "cat", LinkType::Start), Some(1));
    assert_eq!(incidence(&a, "cat", "ran", LinkType::Stop), None);
}

#[test]
fn abbreviations_keep_sentences_together() {
    let ingestor = memory_ingestor();
    let report = ingestor.ingest_text("prose", PROSE).unwrap();

    // "Dr. Smith ..." and "... e.g. for apples." stay in one sentence each
    assert_eq!(report.sentences, 6);

    let links = links_of(ingestor.store().as_ref(), "prose");
    assert_eq!(incidence(&links, "Dr", "Smith", LinkType::Start), Some(1));
    assert_eq!(incidence(&links, "g", "for", LinkType::Cont), Some(1));
}

#[test]
fn one_token_sentence_adds_word_without_links() {
    let ingestor = memory_ingestor();
    let report = ingestor.ingest_text("hi", "Hi.").unwrap();

    assert_eq!(report.words_inserted, 1);
    assert!(links_of(ingestor.store().as_ref(), "hi").is_empty());
}

#[test]
fn counts_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("words.db");

    file_ingestor(&db_path).ingest_text("d1", "red fox runs.").unwrap();
    let ingestor = file_ingestor(&db_path);
    ingestor.ingest_text("d1", "red fox runs.").unwrap();

    let links = links_of(ingestor.store().as_ref(), "d1");
    assert_eq!(incidence(&links, "red", "fox", LinkType::Start), Some(2));
    assert_eq!(incidence(&links, "fox", "runs", LinkType::Stop), Some(2));
}

#[test]
fn concurrent_writers_share_one_document() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shared.db");

    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db_path = db_path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                // Every writer opens the fresh file at the same moment
                barrier.wait();
                let ingestor = file_ingestor(&db_path);
                for _ in 0..5 {
                    ingestor.ingest_text("shared", "one two three.").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let ingestor = file_ingestor(&db_path);
    let store = ingestor.store();
    assert_eq!(store.list_docs().unwrap().len(), 1);
    assert_eq!(store.word_count().unwrap(), 3);

    let links = links_of(store.as_ref(), "shared");
    assert_eq!(incidence(&links, "one", "two", LinkType::Start), Some(20));
    assert_eq!(incidence(&links, "two", "three", LinkType::Stop), Some(20));
}
