//! Ingestor: the main entry point for turning text into stored links

use super::aggregate::LinkBatch;
use crate::model::{DocId, Document, ModelError};
use crate::storage::{StorageError, WordStore};
use crate::text::HashScheme;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort the ingestion of one document
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Outcome of ingesting one document
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub doc_name: String,
    /// `None` when the document had no tokens and nothing was stored
    pub doc_id: Option<DocId>,
    pub sentences: usize,
    pub tokens: usize,
    pub distinct_words: usize,
    pub words_inserted: usize,
    pub distinct_links: usize,
    /// Sum of link incidences added by this ingestion
    pub incidence: u64,
}

/// Ingests documents into a word store
///
/// Segmentation and aggregation happen in memory; the store is touched once
/// per document, through a single atomic `commit`.
pub struct Ingestor {
    store: Arc<dyn WordStore>,
    scheme: HashScheme,
    /// Document ids already resolved, by name. Filled by `ingest` and
    /// `document_id`, read only by `document_id`: `commit` resolves the id
    /// inside its own transaction.
    doc_ids: DashMap<String, DocId>,
}

impl Ingestor {
    /// Create an ingestor over a store. Word ids are derived with the
    /// scheme the store was opened with, so ids always match the scheme
    /// recorded in the store.
    pub fn new(store: Arc<dyn WordStore>) -> Self {
        let scheme = store.scheme();
        Self {
            store,
            scheme,
            doc_ids: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn WordStore> {
        &self.store
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Create-or-fetch a document id by name
    pub fn document_id(&self, doc_name: &str) -> IngestResult<DocId> {
        if let Some(id) = self.doc_ids.get(doc_name) {
            return Ok(*id);
        }
        let id = self.store.create_or_fetch_doc(doc_name)?;
        self.doc_ids.insert(doc_name.to_string(), id);
        Ok(id)
    }

    /// Aggregate and persist one document.
    ///
    /// A document without tokens is a no-op and leaves the store untouched.
    #[tracing::instrument(skip_all, fields(doc = document.name()))]
    pub fn ingest(&self, document: &Document) -> IngestResult<IngestReport> {
        let batch = LinkBatch::from_document(self.scheme, document);

        let mut report = IngestReport {
            doc_name: document.name().to_string(),
            doc_id: None,
            sentences: document.sentences().len(),
            tokens: document.token_count(),
            distinct_words: batch.word_count(),
            words_inserted: 0,
            distinct_links: batch.link_count(),
            incidence: batch.total_incidence(),
        };

        if batch.is_empty() {
            tracing::info!("document has no tokens, nothing to store");
            return Ok(report);
        }

        let summary = self.store.commit(document.name(), &batch)?;
        self.doc_ids.insert(document.name().to_string(), summary.doc_id);

        report.doc_id = Some(summary.doc_id);
        report.words_inserted = summary.words_inserted;

        tracing::info!(
            doc_id = %summary.doc_id,
            sentences = report.sentences,
            words = report.distinct_words,
            new_words = report.words_inserted,
            links = report.distinct_links,
            incidence = report.incidence,
            "ingested document"
        );

        Ok(report)
    }

    pub fn ingest_text(&self, doc_name: &str, text: &str) -> IngestResult<IngestReport> {
        let document = Document::from_text(doc_name, text)?;
        self.ingest(&document)
    }

    /// Decode UTF-8 bytes, then ingest. Invalid encoding fails before any
    /// store access.
    pub fn ingest_bytes(&self, doc_name: &str, bytes: &[u8]) -> IngestResult<IngestReport> {
        let document = Document::from_bytes(doc_name, bytes)?;
        self.ingest(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkType;
    use crate::storage::{OpenStore, SqliteStore};
    use crate::text::identify;

    fn create_ingestor() -> Ingestor {
        let store = SqliteStore::open_in_memory(HashScheme::default()).unwrap();
        Ingestor::new(Arc::new(store))
    }

    #[test]
    fn test_ingest_reports_counts() {
        let ingestor = create_ingestor();
        let report = ingestor.ingest_text("d1", "Word list here. Word again.").unwrap();

        assert_eq!(report.sentences, 2);
        assert_eq!(report.tokens, 5);
        assert_eq!(report.distinct_words, 4);
        assert_eq!(report.words_inserted, 4);
        assert_eq!(report.distinct_links, 3);
        assert_eq!(report.incidence, 3);
        assert!(report.doc_id.is_some());
    }

    #[test]
    fn test_empty_text_is_noop() {
        let ingestor = create_ingestor();
        let report = ingestor.ingest_text("blank", "   ").unwrap();

        assert_eq!(report.doc_id, None);
        assert_eq!(report.sentences, 0);
        assert!(ingestor.store().find_doc("blank").unwrap().is_none());
        assert_eq!(ingestor.store().word_count().unwrap(), 0);
    }

    #[test]
    fn test_one_token_sentence_stores_word_only() {
        let ingestor = create_ingestor();
        let report = ingestor.ingest_text("greeting", "Hi.").unwrap();

        let doc_id = report.doc_id.unwrap();
        assert_eq!(report.words_inserted, 1);
        assert!(ingestor.store().load_links(doc_id).unwrap().is_empty());
        assert!(ingestor.store().find_word(identify("Hi")).unwrap().is_some());
    }

    #[test]
    fn test_document_id_matches_ingested_id() {
        let ingestor = create_ingestor();
        let before = ingestor.document_id("d1").unwrap();
        let report = ingestor.ingest_text("d1", "a b.").unwrap();
        assert_eq!(report.doc_id, Some(before));
        assert_eq!(ingestor.document_id("d1").unwrap(), before);
    }

    #[test]
    fn test_ingestor_uses_store_scheme() {
        let ingestor = create_ingestor();
        assert_eq!(ingestor.scheme(), ingestor.store().scheme());
    }

    #[test]
    fn test_ingest_fills_document_id_cache() {
        let ingestor = create_ingestor();
        let doc_id = ingestor.ingest_text("d1", "a b.").unwrap().doc_id.unwrap();
        assert_eq!(ingestor.doc_ids.get("d1").map(|id| *id), Some(doc_id));
    }

    #[test]
    fn test_invalid_bytes_fail_before_storage() {
        let ingestor = create_ingestor();
        let result = ingestor.ingest_bytes("bad", b"ok \xff\xfe text.");

        assert!(matches!(
            result,
            Err(IngestError::Model(ModelError::InvalidEncoding(_)))
        ));
        assert!(ingestor.store().find_doc("bad").unwrap().is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        let ingestor = create_ingestor();
        let result = ingestor.ingest_text("", "a b.");
        assert!(matches!(
            result,
            Err(IngestError::Model(ModelError::EmptyDocumentName))
        ));
    }

    #[test]
    fn test_two_token_sentence_is_start_link() {
        let ingestor = create_ingestor();
        let doc_id = ingestor.ingest_text("d1", "Good night.").unwrap().doc_id.unwrap();

        let links = ingestor.store().load_links(doc_id).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link_type, LinkType::Start);
        assert_eq!(links[0].a_word_id, identify("Good"));
        assert_eq!(links[0].b_word_id, identify("night"));
    }
}
