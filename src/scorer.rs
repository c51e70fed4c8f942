//! Pairwise token similarity used by the aligner.

use crate::token::Token;

/// Score query token `a` against target token `b`.
///
/// A match earns the square of the matched text's length. A mismatch costs
/// the length of `a`.
pub fn score(a: &Token, b: &Token) -> i64 {
    match matched_len(a, b) {
        Some(len) => square(len),
        None => -(a.char_len() as i64),
    }
}

fn square(len: usize) -> i64 {
    let len = len as i64;
    len * len
}

/// Length of the shorter matched spelling, or `None` when the tokens differ.
fn matched_len(a: &Token, b: &Token) -> Option<usize> {
    match (a, b) {
        (Token::Single { text: x, .. }, Token::Single { text: y, .. }) => {
            (x == y).then(|| shorter(x, y))
        }
        (Token::Alternatives { .. }, Token::Single { text, .. }) => {
            a.accepts(text).then(|| text.chars().count())
        }
        (Token::Single { text, .. }, Token::Alternatives { .. }) => {
            b.accepts(text).then(|| text.chars().count())
        }
        (Token::Alternatives { texts, .. }, Token::Alternatives { .. }) => texts
            .iter()
            .filter(|text| b.accepts(text))
            .map(|text| text.chars().count())
            .max(),
    }
}

fn shorter(x: &str, y: &str) -> usize {
    x.chars().count().min(y.chars().count())
}
