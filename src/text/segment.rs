//! Sentence and token segmentation
//!
//! Segmentation is pure and deterministic. Sentence boundaries use a small
//! abbreviation guard instead of a dictionary, so `"e.g. this"` and
//! `"Dr. Smith"` stay in one sentence while `"A. B."` splits. The guard is
//! deliberately heuristic and will mis-split some text.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern compiles"))
}

fn token_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9A-Za-z']").expect("token boundary pattern compiles"))
}

/// Collapse every run of whitespace into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text, " ").into_owned()
}

/// Split raw text into trimmed, non-empty sentence strings.
pub fn sentencize(text: &str) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    let chars: Vec<char> = normalized.chars().collect();

    let mut sentences = Vec::new();
    let mut start = 0;
    for i in 0..chars.len() {
        if chars[i].is_whitespace() && is_sentence_break(&chars, i) {
            push_trimmed(&mut sentences, &chars[start..i]);
            start = i + 1;
        }
    }
    push_trimmed(&mut sentences, &chars[start..]);

    sentences
}

/// Split one sentence into tokens: maximal runs of ASCII letters, digits
/// and apostrophes. Everything else is a boundary and is dropped.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    token_boundary()
        .split(sentence)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Whether the whitespace at `i` ends a sentence.
///
/// The preceding character must be `.`, `?` or `!`, and neither guard may
/// match:
/// - dotted abbreviation: word char, `.`, word char, terminator (`e.g. `)
/// - capitalised short form: `A-Z`, `a-z`, `.` (`Dr. `, `Mr. `)
fn is_sentence_break(chars: &[char], i: usize) -> bool {
    let before = |n: usize| i.checked_sub(n).map(|j| chars[j]);

    if !matches!(before(1), Some('.' | '?' | '!')) {
        return false;
    }

    let dotted = matches!(
        (before(4), before(3), before(2)),
        (Some(a), Some('.'), Some(b)) if is_word_char(a) && is_word_char(b)
    );
    let short_form = matches!(
        (before(3), before(2), before(1)),
        (Some(a), Some(b), Some('.')) if a.is_ascii_uppercase() && b.is_ascii_lowercase()
    );

    !dotted && !short_form
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn push_trimmed(sentences: &mut Vec<String>, chars: &[char]) {
    let sentence: String = chars.iter().collect();
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
