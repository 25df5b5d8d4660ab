//! wordweave: text-to-graph ingestion
//!
//! Splits raw text into sentences and tokens, gives every distinct word a
//! stable identifier, and records which words follow each other inside a
//! sentence. Counts accumulate per document in a persistent store.
//!
//! # Core Concepts
//!
//! - **Words**: distinct token strings, identified by a fixed hash scheme
//! - **Documents**: named units of ingestion that own their links
//! - **Links**: directed adjacent word pairs tagged START, CONT or STOP,
//!   with an incidence count that only ever grows
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wordweave::{HashScheme, Ingestor, OpenStore, SqliteStore};
//!
//! let store = SqliteStore::open_in_memory(HashScheme::default()).unwrap();
//! let ingestor = Ingestor::new(Arc::new(store));
//! let report = ingestor.ingest_text("d1", "Word list here. Word again.").unwrap();
//! assert_eq!(report.distinct_links, 3);
//! ```

pub mod config;
pub mod ingest;
pub mod model;
pub mod storage;
pub mod text;

pub use config::{Config, ConfigError};
pub use ingest::{IngestError, IngestReport, IngestResult, Ingestor, LinkBatch, LinkKey};
pub use model::{
    DocId, Document, Link, LinkType, ModelError, Sentence, SentenceId, Token, TokenRecord, Word,
};
pub use storage::{
    CommitSummary, DocRecord, OpenStore, SqliteStore, StorageError, StorageResult, WordStore,
};
pub use text::{identify, sentencize, tokenize, CollisionReport, HashScheme, WordId, WordKey};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
