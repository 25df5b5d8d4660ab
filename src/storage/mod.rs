//! Storage backends for wordweave
//!
//! The ingestion pipeline talks to storage through the `WordStore` trait.
//! The primary implementation is `SqliteStore` for persistent storage.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CommitSummary, DocRecord, OpenStore, StorageError, StorageResult, WordStore};
