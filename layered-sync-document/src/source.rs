//! Markup source buffer with a line index.
//!
//! All positions are character offsets into the whole buffer. Lines and
//! columns are 0-based; columns count characters.

use serde::{Deserialize, Serialize};

/// Half-open character range `begin..end` in a [`SourceDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub begin: usize,
    pub end: usize,
}

impl Region {
    pub fn new(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end: end.max(begin),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// True if `offset` lies inside the region, or on its end.
    pub fn contains(&self, offset: usize) -> bool {
        self.begin <= offset && offset <= self.end
    }
}

/// A line/column position in the source, as reported by a coarse locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Source text plus the character offset of every line start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    chars: Vec<char>,
    line_starts: Vec<usize>,
}

impl SourceDocument {
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut line_starts = vec![0];
        line_starts.extend(
            chars
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == '\n')
                .map(|(idx, _)| idx + 1),
        );
        Self { chars, line_starts }
    }

    /// Number of lines. A trailing newline opens one last empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    /// Region of `line`'s content, without its newline.
    pub fn line_region(&self, line: usize) -> Option<Region> {
        let begin = *self.line_starts.get(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.chars.len(),
        };
        Some(Region::new(begin, end))
    }

    pub fn line_text(&self, line: usize) -> Option<String> {
        self.line_region(line).map(|region| self.slice(region))
    }

    /// Absolute offset of `column` on `line`. Columns past the end of the
    /// line clamp to the line end.
    pub fn line_column_to_offset(&self, line: usize, column: usize) -> Option<usize> {
        let region = self.line_region(line)?;
        Some((region.begin + column).min(region.end))
    }

    /// Inverse of [`line_column_to_offset`](Self::line_column_to_offset).
    /// Offsets past the end map to the end of the last line.
    pub fn offset_to_line_column(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.chars.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        SourceLocation::new(line, offset - self.line_starts[line])
    }

    /// Raw text of `region`, clamped to the buffer.
    pub fn slice(&self, region: Region) -> String {
        let end = region.end.min(self.chars.len());
        let begin = region.begin.min(end);
        self.chars[begin..end].iter().collect()
    }
}
