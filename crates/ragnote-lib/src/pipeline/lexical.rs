use crate::config::{SNIPPET_CHARS_AFTER, SNIPPET_CHARS_BEFORE, STOP_WORDS};
use crate::vault::Document;

/// A document that matched the query lexically, with its snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub document: &'a Document,
    pub snippet: String,
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Lower-cased query tokens with stop words removed, in first-seen order
/// and without duplicates.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();
    for token in lowered.split(|c: char| !is_word_char(c)) {
        if token.is_empty() || STOP_WORDS.contains(&token) {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }
    keywords
}

/// Keep the documents whose lower-cased content contains at least one query
/// keyword as a substring, and cut a snippet around the earliest hit.
///
/// Input order is preserved. A query without keywords matches nothing.
pub fn filter<'a>(query: &str, documents: &'a [Document]) -> Vec<Candidate<'a>> {
    let keywords = extract_keywords(query);
    if keywords.is_empty() {
        return Vec::new();
    }

    documents
        .iter()
        .filter_map(|document| {
            let folded = Folded::new(&document.content);
            let first_hit = keywords
                .iter()
                .filter_map(|k| folded.text.find(k.as_str()))
                .min()?;
            let hit_char = folded.original_char(first_hit)?;
            Some(Candidate {
                document,
                snippet: extract_snippet(&document.content, hit_char),
            })
        })
        .collect()
}

/// Lower-cased copy of a text that remembers, for every byte of the folded
/// text, which character of the original produced it. Lower-casing can
/// change the character count (`İ` folds to `i̇`), so positions in the
/// folded text are not positions in the original.
struct Folded {
    text: String,
    origin: Vec<usize>,
}

impl Folded {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (char_idx, ch) in original.chars().enumerate() {
            for lower in ch.to_lowercase() {
                text.push(lower);
                origin.resize(text.len(), char_idx);
            }
        }
        Self { text, origin }
    }

    /// Character index in the original of the folded byte offset `byte`.
    fn original_char(&self, byte: usize) -> Option<usize> {
        self.origin.get(byte).copied()
    }
}

/// Window of `SNIPPET_CHARS_BEFORE` characters before `hit_char` up to
/// `SNIPPET_CHARS_AFTER` characters from it, clipped to the text, with
/// newline runs collapsed to one space.
pub fn extract_snippet(text: &str, hit_char: usize) -> String {
    let start = hit_char.saturating_sub(SNIPPET_CHARS_BEFORE);
    let end = hit_char.saturating_add(SNIPPET_CHARS_AFTER);
    let window = &text[byte_offset(text, start)..byte_offset(text, end)];
    collapse_newlines(window)
}

/// Byte offset of the `char_pos`-th character, or the text length past the
/// end.
fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(idx, _)| idx)
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(ch);
            in_break = false;
        }
    }
    out
}
