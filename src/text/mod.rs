//! Text processing: segmentation and stable word identifiers

pub mod identify;
pub mod segment;

pub use identify::{identify, CollisionReport, HashScheme, WordId, WordKey};
pub use segment::{normalize_whitespace, sentencize, tokenize};
