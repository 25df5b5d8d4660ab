//! SQLite storage backend for wordweave

use super::traits::{CommitSummary, DocRecord, OpenStore, StorageError, StorageResult, WordStore};
use crate::ingest::LinkBatch;
use crate::model::{DocId, Link, LinkType, Word};
use crate::text::{HashScheme, WordId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Key of the identifier scheme row in the `meta` table
const SCHEME_KEY: &str = "hash_scheme";

/// How long a writer waits for another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed word graph store
///
/// Uses a single SQLite database file with tables for words, documents,
/// link types and links. Thread-safe via internal mutex on the connection.
/// Several stores may share one file; writes are serialized by SQLite's
/// write lock.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    scheme: HashScheme,
}

impl SqliteStore {
    /// Initialize the database schema, seed the link type table and record
    /// the identifier scheme.
    ///
    /// Everything after the pragmas runs in one IMMEDIATE transaction, so
    /// several processes opening the same fresh file agree on one schema
    /// and one scheme row.
    fn init_schema(conn: &mut Connection, scheme: HashScheme) -> StorageResult<()> {
        // journal_mode cannot change inside a transaction
        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(
            r#"
            -- Store-level settings (identifier scheme)
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Words, keyed by their derived identifier
            CREATE TABLE IF NOT EXISTS word (
                id INTEGER PRIMARY KEY,
                word TEXT NOT NULL UNIQUE
            );

            -- Documents, unique by name
            CREATE TABLE IF NOT EXISTS doc (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS link_type (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            -- Per-document adjacency counts
            CREATE TABLE IF NOT EXISTS link (
                id INTEGER PRIMARY KEY,
                a_word_id INTEGER NOT NULL REFERENCES word(id),
                b_word_id INTEGER NOT NULL REFERENCES word(id),
                link_type_id INTEGER NOT NULL REFERENCES link_type(id),
                doc_id INTEGER NOT NULL REFERENCES doc(id),
                incidence INTEGER NOT NULL,
                UNIQUE (a_word_id, b_word_id, link_type_id, doc_id)
            );

            CREATE INDEX IF NOT EXISTS idx_link_doc ON link(doc_id);
            "#,
        )?;

        for link_type in LinkType::ALL {
            tx.execute(
                "INSERT INTO link_type (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING",
                params![link_type.id(), link_type.name()],
            )?;
        }

        Self::check_scheme(&tx, scheme)?;
        tx.commit()?;
        Ok(())
    }

    /// Record the identifier scheme on first open; refuse a different one later.
    fn check_scheme(conn: &Connection, scheme: HashScheme) -> StorageResult<()> {
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO NOTHING",
            params![SCHEME_KEY, scheme.name()],
        )?;

        let stored: String = conn.query_row(
            "SELECT value FROM meta WHERE key = ?1",
            params![SCHEME_KEY],
            |row| row.get(0),
        )?;

        if stored == scheme.name() {
            Ok(())
        } else {
            Err(StorageError::SchemeMismatch {
                stored,
                requested: scheme.name().to_string(),
            })
        }
    }

    fn from_connection(mut conn: Connection, scheme: HashScheme) -> StorageResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init_schema(&mut conn, scheme)?;

        Ok(Self {
            conn: Mutex::new(conn),
            scheme,
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn fetch_doc(conn: &Connection, doc_name: &str) -> StorageResult<Option<DocId>> {
        let id = conn
            .query_row(
                "SELECT id FROM doc WHERE doc_name = ?1",
                params![doc_name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(id.map(DocId::from_raw))
    }

    /// Create-or-fetch on an open connection or transaction.
    fn create_or_fetch_doc_on(conn: &Connection, doc_name: &str) -> StorageResult<DocId> {
        match Self::fetch_doc(conn, doc_name)? {
            Some(id) => Ok(id),
            None => Self::insert_doc(conn, doc_name),
        }
    }

    /// Insert a document row.
    ///
    /// A concurrent writer may insert the same name between our select and
    /// insert; the UNIQUE constraint rejects the second insert and we fetch
    /// the winner's row once.
    fn insert_doc(conn: &Connection, doc_name: &str) -> StorageResult<DocId> {
        let inserted = conn.execute(
            "INSERT INTO doc (doc_name, created_at) VALUES (?1, ?2)",
            params![doc_name, Utc::now().to_rfc3339()],
        );

        match inserted {
            Ok(_) => Ok(DocId::from_raw(conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(
                    doc_name,
                    "document name already inserted by another writer, fetching it"
                );
                Self::fetch_doc(conn, doc_name)?.ok_or(StorageError::Database(e))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>, scheme: HashScheme) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_connection(Connection::open(path)?, scheme)
    }

    fn open_in_memory(scheme: HashScheme) -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, scheme)
    }
}

impl WordStore for SqliteStore {
    fn scheme(&self) -> HashScheme {
        self.scheme
    }

    // === Document Operations ===

    fn find_doc(&self, doc_name: &str) -> StorageResult<Option<DocId>> {
        let conn = self.lock()?;
        Self::fetch_doc(&conn, doc_name)
    }

    fn create_or_fetch_doc(&self, doc_name: &str) -> StorageResult<DocId> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = Self::create_or_fetch_doc_on(&tx, doc_name)?;
        tx.commit()?;
        Ok(id)
    }

    fn list_docs(&self) -> StorageResult<Vec<DocRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, doc_name, created_at FROM doc ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, doc_name, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StorageError::DateParse(e.to_string()))?
                .with_timezone(&Utc);
            docs.push(DocRecord {
                id: DocId::from_raw(id),
                doc_name,
                created_at,
            });
        }

        Ok(docs)
    }

    // === Word Operations ===

    fn find_word(&self, id: WordId) -> StorageResult<Option<Word>> {
        let conn = self.lock()?;
        let word = conn
            .query_row(
                "SELECT word FROM word WHERE id = ?1",
                params![id.as_i64()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(word.map(|word| Word { id, word }))
    }

    fn word_count(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM word", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // === Link Operations ===

    fn load_links(&self, doc_id: DocId) -> StorageResult<Vec<Link>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT a_word_id, b_word_id, link_type_id, incidence
             FROM link WHERE doc_id = ?1
             ORDER BY a_word_id, b_word_id, link_type_id",
        )?;
        let rows = stmt.query_map(params![doc_id.as_i64()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut links = Vec::new();
        for row in rows {
            let (a, b, type_id, incidence) = row?;
            let link_type =
                LinkType::from_id(type_id).ok_or(StorageError::UnknownLinkType(type_id))?;
            links.push(Link {
                a_word_id: WordId::from_raw(a),
                b_word_id: WordId::from_raw(b),
                link_type,
                doc_id,
                incidence: incidence as u64,
            });
        }

        Ok(links)
    }

    fn commit(&self, doc_name: &str, batch: &LinkBatch) -> StorageResult<CommitSummary> {
        let mut conn = self.lock()?;

        // IMMEDIATE takes the write lock up front, so the create-or-fetch
        // and every upsert below see one consistent state.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let doc_id = Self::create_or_fetch_doc_on(&tx, doc_name)?;

        let mut words_inserted = 0;
        let mut links_upserted = 0;
        let mut incidence_added = 0;
        {
            let mut insert_word = tx.prepare_cached(
                "INSERT INTO word (id, word) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
            )?;
            for (id, word) in batch.words() {
                words_inserted += insert_word.execute(params![id.as_i64(), word])?;
            }

            let mut upsert_link = tx.prepare_cached(
                r#"
                INSERT INTO link (a_word_id, b_word_id, link_type_id, doc_id, incidence)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(a_word_id, b_word_id, link_type_id, doc_id) DO UPDATE SET
                    incidence = link.incidence + excluded.incidence
                "#,
            )?;
            for (key, incidence) in batch.links() {
                links_upserted += upsert_link.execute(params![
                    key.a_word_id.as_i64(),
                    key.b_word_id.as_i64(),
                    key.link_type.id(),
                    doc_id.as_i64(),
                    incidence as i64,
                ])?;
                incidence_added += incidence;
            }
        }

        tx.commit()?;

        Ok(CommitSummary {
            doc_id,
            words_inserted,
            links_upserted,
            incidence_added,
        })
    }
}
