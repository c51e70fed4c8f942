//! Interfaces to the systems that own the coarse mapping and the rendered
//! page. Implementations live with the host (a SyncTeX reader, a PDF text
//! extractor); tests use in-memory fakes.

use crate::geometry::{Glyph, PageRect, Point, Rect};
use crate::source::SourceLocation;

/// The coarse position oracle.
pub trait CoarseLocator {
    /// Source line/column for a point on `page`.
    fn locate_backward(&self, page: usize, point: Point) -> Option<SourceLocation>;

    /// Page rectangles produced by the source at `line`/`column`.
    fn locate_forward(&self, line: usize, column: usize) -> Option<Vec<PageRect>>;
}

/// Text and geometry of the rendered pages.
pub trait TextLayout {
    /// Text around `point`, up to `budget` characters on each side.
    fn context_at(&self, page: usize, point: Point, budget: usize) -> Option<RenderedContext>;

    /// Glyphs inside `rect`, in reading order.
    fn text_in(&self, page: usize, rect: Rect) -> Option<Vec<Glyph>>;
}

/// Rendered text split at the clicked point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedContext {
    pub before: String,
    pub after: String,
}

impl RenderedContext {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Joined text cut to `budget` characters on each side, and the
    /// character offset of the clicked point in it.
    pub fn window(&self, budget: usize) -> (String, usize) {
        let skip = self.before.chars().count().saturating_sub(budget);
        let mut text: String = self.before.chars().skip(skip).collect();
        let marker = text.chars().count();
        text.extend(self.after.chars().take(budget));
        (text, marker)
    }
}
