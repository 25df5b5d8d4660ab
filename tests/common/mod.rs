//! Common test utilities for wordweave integration tests

use std::path::Path;
use std::sync::Arc;
use wordweave::{HashScheme, Ingestor, Link, LinkType, OpenStore, SqliteStore, WordStore};

/// Ingestor over a fresh in-memory store
pub fn memory_ingestor() -> Ingestor {
    let store = SqliteStore::open_in_memory(HashScheme::default()).expect("open in-memory store");
    Ingestor::new(Arc::new(store))
}

/// Ingestor over a store file at `path`
pub fn file_ingestor(path: &Path) -> Ingestor {
    let store = SqliteStore::open(path, HashScheme::default()).expect("open store file");
    Ingestor::new(Arc::new(store))
}

/// Incidence of the link `a -> b` with `link_type`, if stored
pub fn incidence(links: &[Link], a: &str, b: &str, link_type: LinkType) -> Option<u64> {
    let (a, b) = (wordweave::identify(a), wordweave::identify(b));
    links
        .iter()
        .find(|l| l.a_word_id == a && l.b_word_id == b && l.link_type == link_type)
        .map(|l| l.incidence)
}

/// All links of a named document
pub fn links_of(store: &dyn WordStore, doc_name: &str) -> Vec<Link> {
    let doc_id = store
        .find_doc(doc_name)
        .expect("find doc")
        .expect("document exists");
    store.load_links(doc_id).expect("load links")
}

/// A few paragraphs of ordinary prose
pub const PROSE: &str = "\
The quick brown fox jumps over the lazy dog. The dog sleeps.
Dr. Smith walked to the market, e.g. for apples. He bought three!
Did the fox return? Nobody knows.
";
