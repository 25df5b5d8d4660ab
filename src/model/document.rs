//! Documents: named, ordered sentences

use super::sentence::{Sentence, TokenRecord};
use crate::text::sentencize;
use thiserror::Error;

/// Errors raised while building a document
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Document name must not be empty")]
    EmptyDocumentName,

    #[error("Document text is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// A named document, segmented in memory
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(name: impl Into<String>, sentences: Vec<Sentence>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyDocumentName);
        }
        Ok(Self { name, sentences })
    }

    /// Segment text into sentences. Empty text gives an empty document.
    pub fn from_text(name: impl Into<String>, text: &str) -> Result<Self, ModelError> {
        let sentences = sentencize(text)
            .iter()
            .map(|s| Sentence::from_text(s))
            .collect();
        Self::new(name, sentences)
    }

    /// Decode UTF-8 bytes, then segment
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, ModelError> {
        let text = std::str::from_utf8(bytes)?;
        Self::from_text(name, text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Token records of every sentence, in sentence order
    pub fn records(&self) -> impl Iterator<Item = TokenRecord<'_>> + '_ {
        self.sentences.iter().flat_map(|s| s.records())
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    /// True when the document holds no tokens at all
    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkType;

    #[test]
    fn from_text_builds_sentences() {
        let text = "Sentence one.\nSentence Two. Sentence Three four five.";
        let doc = Document::from_text("d1", text).unwrap();
        assert_eq!(doc.name(), "d1");
        assert_eq!(doc.sentences().len(), 3);
        assert_eq!(doc.token_count(), 8);
    }

    #[test]
    fn records_preserve_sentence_order() {
        let doc = Document::from_text("d1", "Word list here. Word again.").unwrap();
        let records: Vec<_> = doc.records().collect();

        let words: Vec<_> = records.iter().map(|r| r.word).collect();
        assert_eq!(words, vec!["Word", "list", "here", "Word", "again"]);

        assert_eq!(records[3].position, 0);
        assert_eq!(records[3].link_type, LinkType::Start);
        assert_eq!(records[4].link_type, LinkType::Stop);
        assert_ne!(records[0].sentence_id, records[3].sentence_id);
    }

    #[test]
    fn empty_text_is_an_empty_document() {
        let doc = Document::from_text("blank", "  \n ").unwrap();
        assert!(doc.sentences().is_empty());
        assert!(doc.is_empty());
    }

    #[test]
    fn rejects_blank_name() {
        assert!(matches!(Document::from_text(" ", "text"), Err(ModelError::EmptyDocumentName)));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let result = Document::from_bytes("bad", &[0x66, 0xff, 0x2e]);
        assert!(matches!(result, Err(ModelError::InvalidEncoding(_))));
    }
}
