//! In-memory text model and persisted entity types

mod document;
mod link;
mod sentence;

pub use document::{Document, ModelError};
pub use link::{DocId, Link, LinkType, Word};
pub use sentence::{Sentence, SentenceId, Token, TokenRecord};
