//! Sentences: ordered tokens with positional link tags

use super::link::LinkType;
use crate::text::tokenize;
use uuid::Uuid;

/// A token: one or more characters produced by segmentation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(chars: impl Into<String>) -> Self {
        Self(chars.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ephemeral id grouping the tokens of one sentence during ingestion.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentenceId(Uuid);

impl SentenceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SentenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SentenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One token of a sentence, tagged for link aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRecord<'a> {
    pub word: &'a str,
    /// 0-based position within the sentence
    pub position: usize,
    pub link_type: LinkType,
    pub sentence_id: SentenceId,
}

/// An ordered, immutable sequence of tokens
#[derive(Debug, Clone)]
pub struct Sentence {
    id: SentenceId,
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            id: SentenceId::new(),
            tokens,
        }
    }

    /// Tokenize one sentence string
    pub fn from_text(text: &str) -> Self {
        Self::new(tokenize(text).into_iter().map(Token::new).collect())
    }

    pub fn id(&self) -> SentenceId {
        self.id
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Link tag of each token, in order
    pub fn link_types(&self) -> impl Iterator<Item = LinkType> + '_ {
        let len = self.tokens.len();
        (0..len).map(move |i| LinkType::for_position(i, len))
    }

    pub fn records(&self) -> impl Iterator<Item = TokenRecord<'_>> + '_ {
        self.tokens
            .iter()
            .zip(self.link_types())
            .enumerate()
            .map(move |(position, (token, link_type))| TokenRecord {
                word: token.as_str(),
                position,
                link_type,
                sentence_id: self.id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_tokenizes() {
        let sentence = Sentence::from_text("Sentence Three four five.");
        let words: Vec<_> = sentence.tokens().iter().map(Token::as_str).collect();
        assert_eq!(words, vec!["Sentence", "Three", "four", "five"]);
    }

    #[test]
    fn records_carry_position_and_tag() {
        let sentence = Sentence::from_text("a b c");
        let records: Vec<_> = sentence.records().collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].word, "a");
        assert_eq!(records[0].link_type, LinkType::Start);
        assert_eq!(records[1].position, 1);
        assert_eq!(records[1].link_type, LinkType::Cont);
        assert_eq!(records[2].link_type, LinkType::Stop);
        assert!(records.iter().all(|r| r.sentence_id == sentence.id()));
    }

    #[test]
    fn single_token_sentence_is_start() {
        let sentence = Sentence::from_text("Hi.");
        let records: Vec<_> = sentence.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link_type, LinkType::Start);
    }

    #[test]
    fn punctuation_only_sentence_is_empty() {
        let sentence = Sentence::from_text("?!");
        assert!(sentence.is_empty());
        assert_eq!(sentence.records().count(), 0);
    }

    #[test]
    fn sentence_ids_are_unique() {
        assert_ne!(Sentence::from_text("x").id(), Sentence::from_text("x").id());
    }
}
