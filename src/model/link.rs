//! Link types and the entities owned by the store

use crate::text::{HashScheme, WordId};
use serde::{Deserialize, Serialize};

/// Role of a token, or of an adjacent token pair, within its sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkType {
    Start,
    Stop,
    Cont,
}

impl LinkType {
    pub const ALL: [LinkType; 3] = [LinkType::Start, LinkType::Stop, LinkType::Cont];

    /// Stable integer id used in storage
    pub const fn id(self) -> i64 {
        match self {
            LinkType::Start => 1,
            LinkType::Stop => 2,
            LinkType::Cont => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        LinkType::ALL.into_iter().find(|t| t.id() == id)
    }

    pub const fn name(self) -> &'static str {
        match self {
            LinkType::Start => "START",
            LinkType::Stop => "STOP",
            LinkType::Cont => "CONT",
        }
    }

    /// Tag for the token at `position` in a sentence of `len` tokens.
    ///
    /// START wins over STOP, so the only token of a one-token sentence is
    /// tagged START.
    pub fn for_position(position: usize, len: usize) -> Self {
        if position == 0 {
            LinkType::Start
        } else if position + 1 == len {
            LinkType::Stop
        } else {
            LinkType::Cont
        }
    }

    /// Tag for the adjacent pair `(a, b)` given each token's own tag.
    ///
    /// Precedence: `a` is START, then `b` is STOP, otherwise CONT. A
    /// two-token sentence therefore yields one START pair.
    pub fn for_pair(a: LinkType, b: LinkType) -> Self {
        if a == LinkType::Start {
            LinkType::Start
        } else if b == LinkType::Stop {
            LinkType::Stop
        } else {
            LinkType::Cont
        }
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// A distinct word and its derived identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub word: String,
}

impl Word {
    pub fn new(scheme: HashScheme, word: impl Into<String>) -> Self {
        let word = word.into();
        Self {
            id: scheme.identify(&word),
            word,
        }
    }
}

/// Store-assigned document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(i64);

impl DocId {
    pub fn from_raw(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A directed adjacency between two words within one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub a_word_id: WordId,
    pub b_word_id: WordId,
    pub link_type: LinkType,
    pub doc_id: DocId,
    /// Times this pair was observed in the document, across all ingestions
    pub incidence: u64,
}
