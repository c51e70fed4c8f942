//! Turns a raw context string into a [`Context`].
//!
//! Every pass works on `(char, offset)` pairs, where `offset` is the
//! character offset in the input that produced the character. Characters
//! introduced by a pass (replacement or separator spaces) borrow the offset
//! of the text they stand for, so back-references survive every edit.

use crate::flush::FlushPattern;
use crate::token::{Context, Token};
use crate::translation::TranslationTable;

type OffsetChars = Vec<(char, usize)>;

/// Tokenize `text` with the query point at character offset `marker`.
///
/// See the module docs for how offsets are tracked. A marker sitting on
/// whitespace or noise is attributed to the end of the preceding token; a
/// marker past the end clamps to the end of the last token.
pub fn tokenize(
    text: &str,
    marker: usize,
    flush: &FlushPattern,
    translations: Option<&TranslationTable>,
) -> Context {
    let chars = flush_noise(text, flush);
    let chars = collapse_whitespace(chars);
    let chars = split_symbols(chars);
    let spans = split_tokens(&chars);

    let (marked_index, char_offset) = match locate_marker(&spans, marker) {
        Some((idx, offset)) => (Some(idx), offset),
        None => (None, 0),
    };

    let marker_at_end =
        marked_index.map_or(false, |idx| char_offset == spans[idx].offsets.len());

    let tokens: Vec<Token> = spans
        .into_iter()
        .map(|span| span.into_token(translations))
        .collect();

    // A translated glyph is one char long but its spelling is not.
    let char_offset = match marked_index {
        Some(idx) if marker_at_end => tokens[idx].char_len(),
        _ => char_offset,
    };

    tracing::trace!(
        chars = text.chars().count(),
        tokens = tokens.len(),
        marked_index = ?marked_index,
        char_offset,
        "tokenized context"
    );

    Context {
        tokens,
        marked_index,
        char_offset,
    }
}

/// Tokenize without a query point.
pub fn tokenize_unmarked(
    text: &str,
    flush: &FlushPattern,
    translations: Option<&TranslationTable>,
) -> Context {
    let mut ctx = tokenize(text, 0, flush, translations);
    ctx.marked_index = None;
    ctx.char_offset = 0;
    ctx
}

/// Replace every non-empty flush match with one space.
fn flush_noise(text: &str, flush: &FlushPattern) -> OffsetChars {
    fn keep(slice: &str, out: &mut OffsetChars, char_idx: &mut usize) {
        for c in slice.chars() {
            out.push((c, *char_idx));
            *char_idx += 1;
        }
    }

    let mut out = Vec::with_capacity(text.len());
    let mut char_idx = 0;
    let mut last_byte = 0;

    for m in flush.regex().find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        keep(&text[last_byte..m.start()], &mut out, &mut char_idx);
        out.push((' ', char_idx));
        char_idx += m.as_str().chars().count();
        last_byte = m.end();
    }
    keep(&text[last_byte..], &mut out, &mut char_idx);
    out
}

/// Collapse whitespace runs into a single space carrying the run's first offset.
fn collapse_whitespace(chars: OffsetChars) -> OffsetChars {
    let mut out: OffsetChars = Vec::with_capacity(chars.len());
    for (c, offset) in chars {
        if c.is_whitespace() {
            if !matches!(out.last(), Some((' ', _))) {
                out.push((' ', offset));
            }
        } else {
            out.push((c, offset));
        }
    }
    out
}

/// Surround every non-alphanumeric, non-space character with spaces.
fn split_symbols(chars: OffsetChars) -> OffsetChars {
    let mut out = Vec::with_capacity(chars.len() * 2);
    for (c, offset) in chars {
        if c == ' ' || c.is_alphanumeric() {
            out.push((c, offset));
        } else {
            out.push((' ', offset));
            out.push((c, offset));
            out.push((' ', offset));
        }
    }
    out
}

/// A contiguous run of non-space normalized characters.
struct Span {
    text: String,
    offsets: Vec<usize>,
}

impl Span {
    fn start(&self) -> usize {
        self.offsets[0]
    }

    fn into_token(self, translations: Option<&TranslationTable>) -> Token {
        let offset = self.start();
        let mut chars = self.text.chars();
        if let (Some(table), Some(glyph), None) = (translations, chars.next(), chars.next()) {
            if let Some(token) = table
                .get(glyph)
                .and_then(|spellings| Token::alternatives(spellings.iter().cloned(), offset))
            {
                return token;
            }
        }
        Token::Single {
            text: self.text,
            offset,
        }
    }
}

fn split_tokens(chars: &[(char, usize)]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Option<Span> = None;
    for &(c, offset) in chars {
        if c == ' ' {
            spans.extend(current.take());
            continue;
        }
        let span = current.get_or_insert_with(|| Span {
            text: String::new(),
            offsets: Vec::new(),
        });
        span.text.push(c);
        span.offsets.push(offset);
    }
    spans.extend(current);
    spans
}

/// Find `(marked_index, char_offset)` for `marker`.
fn locate_marker(spans: &[Span], marker: usize) -> Option<(usize, usize)> {
    if spans.is_empty() {
        return None;
    }
    let idx = spans
        .iter()
        .rposition(|span| span.start() <= marker)
        .unwrap_or(0);
    let char_offset = spans[idx]
        .offsets
        .iter()
        .take_while(|&&offset| offset < marker)
        .count();
    Some((idx, char_offset))
}
