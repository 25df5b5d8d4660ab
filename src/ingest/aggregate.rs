//! Link aggregation
//!
//! Turns a document's token records into the batch that gets persisted: the
//! distinct words with their ids, and a count for every
//! `(a_word_id, b_word_id, link_type)` observed between adjacent positions of
//! one sentence.

use crate::model::{Document, LinkType, SentenceId, TokenRecord};
use crate::text::{HashScheme, WordId};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Grouping key of a link within one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkKey {
    pub a_word_id: WordId,
    pub b_word_id: WordId,
    pub link_type: LinkType,
}

/// Words and link counts from one ingestion of one document
#[derive(Debug, Clone, Default)]
pub struct LinkBatch {
    words: BTreeMap<WordId, String>,
    links: BTreeMap<LinkKey, u64>,
}

impl LinkBatch {
    pub fn from_document(scheme: HashScheme, document: &Document) -> Self {
        Self::from_records(scheme, document.records())
    }

    /// Aggregate token records. Records pair up when they share a sentence
    /// and `b.position == a.position + 1`.
    pub fn from_records<'a>(
        scheme: HashScheme,
        records: impl IntoIterator<Item = TokenRecord<'a>>,
    ) -> Self {
        let mut batch = Self::default();
        let mut sentences: HashMap<SentenceId, BTreeMap<usize, Vec<(WordId, LinkType)>>> =
            HashMap::new();

        for record in records {
            let id = batch.add_word(scheme, record.word);
            sentences
                .entry(record.sentence_id)
                .or_default()
                .entry(record.position)
                .or_default()
                .push((id, record.link_type));
        }

        for positions in sentences.values() {
            for (position, heads) in positions {
                let Some(tails) = positions.get(&(position + 1)) else {
                    continue;
                };
                for &(a_word_id, a_type) in heads {
                    for &(b_word_id, b_type) in tails {
                        let key = LinkKey {
                            a_word_id,
                            b_word_id,
                            link_type: LinkType::for_pair(a_type, b_type),
                        };
                        *batch.links.entry(key).or_insert(0) += 1;
                    }
                }
            }
        }

        tracing::debug!(
            words = batch.words.len(),
            links = batch.links.len(),
            sentences = sentences.len(),
            "aggregated link batch"
        );

        batch
    }

    fn add_word(&mut self, scheme: HashScheme, word: &str) -> WordId {
        let id = scheme.identify(word);
        match self.words.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(word.to_string());
            }
            Entry::Occupied(slot) if slot.get() != word => {
                tracing::warn!(
                    %id,
                    kept = %slot.get(),
                    dropped = %word,
                    scheme = scheme.name(),
                    "word identifier collision in batch"
                );
            }
            Entry::Occupied(_) => {}
        }
        id
    }

    /// Distinct words, ordered by id
    pub fn words(&self) -> impl Iterator<Item = (WordId, &str)> + '_ {
        self.words.iter().map(|(id, w)| (*id, w.as_str()))
    }

    /// Link counts, ordered by key
    pub fn links(&self) -> impl Iterator<Item = (LinkKey, u64)> + '_ {
        self.links.iter().map(|(k, n)| (*k, *n))
    }

    pub fn incidence(&self, key: &LinkKey) -> u64 {
        self.links.get(key).copied().unwrap_or(0)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Sum of all link counts in the batch
    pub fn total_incidence(&self) -> u64 {
        self.links.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
