//! Storage trait definitions

use crate::ingest::LinkBatch;
use crate::model::{DocId, Link, Word};
use crate::text::{HashScheme, WordId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store uses identifier scheme '{stored}' but '{requested}' was requested")]
    SchemeMismatch { stored: String, requested: String },

    #[error("Unknown link type id: {0}")]
    UnknownLinkType(i64),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("Store connection lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored document row
#[derive(Debug, Clone, Serialize)]
pub struct DocRecord {
    pub id: DocId,
    pub doc_name: String,
    pub created_at: DateTime<Utc>,
}

/// What one `commit` changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub doc_id: DocId,
    /// Words that were not yet stored
    pub words_inserted: usize,
    /// Link rows inserted or incremented
    pub links_upserted: usize,
    /// Sum of incidences added across all links
    pub incidence_added: u64,
}

/// Trait for word-graph storage backends
///
/// Implementations must be thread-safe (Send + Sync) so that one store can
/// be shared by concurrent ingestions.
pub trait WordStore: Send + Sync {
    /// Identifier scheme the stored word ids were derived with
    fn scheme(&self) -> HashScheme;

    // === Document Operations ===

    /// Look up a document id by name
    fn find_doc(&self, doc_name: &str) -> StorageResult<Option<DocId>>;

    /// Fetch a document id by name, inserting the document first if absent.
    /// Never creates a second row for the same name.
    fn create_or_fetch_doc(&self, doc_name: &str) -> StorageResult<DocId>;

    /// List all documents
    fn list_docs(&self) -> StorageResult<Vec<DocRecord>>;

    // === Word Operations ===

    fn find_word(&self, id: WordId) -> StorageResult<Option<Word>>;

    fn word_count(&self) -> StorageResult<usize>;

    // === Link Operations ===

    /// All links owned by a document
    fn load_links(&self, doc_id: DocId) -> StorageResult<Vec<Link>>;

    /// Persist one document's batch as a unit.
    ///
    /// Creates or fetches the document, inserts words that are not yet
    /// stored, and adds each link's batch incidence to the stored incidence
    /// (inserting the link if absent). Either everything is applied or
    /// nothing is.
    fn commit(&self, doc_name: &str, batch: &LinkBatch) -> StorageResult<CommitSummary>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: WordStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>, scheme: HashScheme) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory(scheme: HashScheme) -> StorageResult<Self>;
}
