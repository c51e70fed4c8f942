//! Plain-text rendering of alignments for logs and snapshots.

use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::aligner::Alignment;
use crate::token::Token;

const GAP: &str = "·";
const SPACE_PADDING: usize = 2;

/// Column-aligned rendering of an alignment, query on top.
///
/// ```text
/// score 49
/// alpha  beta  gamma
/// alpha  ·     gamma
/// ```
///
/// `·` marks a gap.
pub struct AlignmentDisplay<'a, 'b> {
    alignment: &'b Alignment<'a, Token>,
}

impl<'a, 'b> AlignmentDisplay<'a, 'b> {
    pub fn new(alignment: &'b Alignment<'a, Token>) -> Self {
        Self { alignment }
    }
}

impl fmt::Display for AlignmentDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score {}", self.alignment.score)?;

        let mut top = String::new();
        let mut bottom = String::new();
        for (idx, pair) in self.alignment.pairs.iter().enumerate() {
            let left = pair.left_item().map(Token::to_string);
            let right = pair.right_item().map(Token::to_string);
            let left = left.as_deref().unwrap_or(GAP);
            let right = right.as_deref().unwrap_or(GAP);

            if idx > 0 {
                pad(&mut top, SPACE_PADDING);
                pad(&mut bottom, SPACE_PADDING);
            }

            let width = UnicodeWidthStr::width(left).max(UnicodeWidthStr::width(right));
            top.push_str(left);
            pad(&mut top, width - UnicodeWidthStr::width(left));
            bottom.push_str(right);
            pad(&mut bottom, width - UnicodeWidthStr::width(right));
        }

        f.write_char('\n')?;
        f.write_str(top.trim_end())?;
        f.write_char('\n')?;
        f.write_str(bottom.trim_end())
    }
}

fn pad(line: &mut String, count: usize) {
    line.extend(std::iter::repeat(' ').take(count));
}
