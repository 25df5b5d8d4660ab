//! Stable word identifiers
//!
//! A word's identifier is derived from its bytes alone, so the same word maps
//! to the same id in every process and on every platform. The scheme is a
//! fixed, versioned contract: changing it invalidates every stored word id
//! and orphans existing links. Stores record the scheme name and refuse to
//! open under a different one.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};

/// Identifier of a word, derived by a [`HashScheme`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(i64);

impl WordId {
    /// Wrap a raw id read back from storage
    pub fn from_raw(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for WordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Input to the identifier scheme.
///
/// Text and raw bytes share one canonical path: text is hashed as its UTF-8
/// encoding, so `WordKey::Text("x")` and `WordKey::Bytes(b"x")` agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKey<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> WordKey<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            WordKey::Text(s) => s.as_bytes(),
            WordKey::Bytes(b) => b,
        }
    }
}

impl<'a> From<&'a str> for WordKey<'a> {
    fn from(s: &'a str) -> Self {
        WordKey::Text(s)
    }
}

impl<'a> From<&'a String> for WordKey<'a> {
    fn from(s: &'a String) -> Self {
        WordKey::Text(s.as_str())
    }
}

impl<'a> From<&'a [u8]> for WordKey<'a> {
    fn from(b: &'a [u8]) -> Self {
        WordKey::Bytes(b)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for WordKey<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        WordKey::Bytes(b.as_slice())
    }
}

/// Word identifier scheme.
///
/// There is exactly one scheme. A second variant would only be added
/// together with an explicit migration of stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashScheme {
    /// First 8 bytes of the SHA-256 digest, read as a signed big-endian i64
    #[default]
    Sha256Prefix64,
}

impl HashScheme {
    /// Name recorded alongside stored data
    pub const fn name(&self) -> &'static str {
        match self {
            HashScheme::Sha256Prefix64 => "sha256-prefix64-be/v1",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha256-prefix64-be/v1" => Some(HashScheme::Sha256Prefix64),
            _ => None,
        }
    }

    /// Derive the identifier for a word. Case is significant.
    pub fn identify<'a>(&self, key: impl Into<WordKey<'a>>) -> WordId {
        let key = key.into();
        match self {
            HashScheme::Sha256Prefix64 => {
                let digest = Sha256::digest(key.as_bytes());
                let mut prefix = [0u8; 8];
                prefix.copy_from_slice(&digest[..8]);
                WordId(i64::from_be_bytes(prefix))
            }
        }
    }
}

impl std::fmt::Display for HashScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identify a word with the default scheme
pub fn identify<'a>(key: impl Into<WordKey<'a>>) -> WordId {
    HashScheme::default().identify(key)
}

/// Identifier collisions found over a word list
#[derive(Debug, Clone, Serialize)]
pub struct CollisionReport {
    pub scheme: &'static str,
    /// Number of distinct words examined
    pub distinct_words: usize,
    /// Groups of distinct words sharing one id, sorted
    pub collisions: Vec<Vec<String>>,
}

impl CollisionReport {
    /// Identify every distinct word and group those that share an id.
    pub fn from_words<I, S>(scheme: HashScheme, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> =
            words.into_iter().map(|w| w.as_ref().to_string()).collect();

        let mut by_id: HashMap<WordId, Vec<String>> = HashMap::new();
        for word in &distinct {
            by_id.entry(scheme.identify(word)).or_default().push(word.clone());
        }

        let mut collisions: Vec<Vec<String>> = by_id
            .into_values()
            .filter(|group| group.len() > 1)
            .collect();
        collisions.sort();

        Self {
            scheme: scheme.name(),
            distinct_words: distinct.len(),
            collisions,
        }
    }

    /// Colliding groups as a percentage of distinct words
    pub fn collision_percent(&self) -> f64 {
        if self.distinct_words == 0 {
            return 0.0;
        }
        self.collisions.len() as f64 / self.distinct_words as f64 * 100.0
    }
}
