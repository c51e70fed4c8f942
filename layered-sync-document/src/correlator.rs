//! Backward (page → source) and forward (source → page) search.
//!
//! Both directions start from the coarse locator's answer and try to narrow
//! it to one word. When narrowing fails, or its heuristic is switched off,
//! the coarse answer is returned unchanged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use layered_sync::{
    correlate, tokenize, tokenize_unmarked, Context, Correlation, CorrelationObserver,
    Direction, NoopObserver, SyncConfig, SyncError, SyncResult,
};

use crate::collaborators::{CoarseLocator, TextLayout};
use crate::construct::{source_region, ConstructFinder, LatexEnvironments};
use crate::geometry::{merge_rects, Glyph, PageRect, Point, Rect};
use crate::source::{Region, SourceDocument};

/// Where a click on a page lands in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackwardTarget {
    /// Character offset in the source document.
    Exact { offset: usize, score: i64 },
    /// The locator's own line and column.
    Coarse { line: usize, column: usize },
}

/// Where a source position shows up on the rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForwardTarget {
    /// Bounding box of the matched word.
    Exact { page: usize, rect: Rect, score: i64 },
    Coarse { page: usize },
}

impl ForwardTarget {
    pub fn page(&self) -> usize {
        match self {
            ForwardTarget::Exact { page, .. } | ForwardTarget::Coarse { page } => *page,
        }
    }
}

/// Runs correlations against one set of collaborators.
pub struct Correlator<'a> {
    config: &'a SyncConfig,
    locator: &'a dyn CoarseLocator,
    layout: &'a dyn TextLayout,
    constructs: Option<&'a dyn ConstructFinder>,
    observer: &'a dyn CorrelationObserver,
}

impl<'a> Correlator<'a> {
    pub fn new(
        config: &'a SyncConfig,
        locator: &'a dyn CoarseLocator,
        layout: &'a dyn TextLayout,
    ) -> Self {
        Self {
            config,
            locator,
            layout,
            constructs: None,
            observer: &NoopObserver,
        }
    }

    /// Replace the default LaTeX environment lookup.
    pub fn with_constructs(mut self, constructs: &'a dyn ConstructFinder) -> Self {
        self.constructs = Some(constructs);
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn CorrelationObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Map a click at `point` on `page` to the source.
    ///
    /// Fails only with [`SyncError::NoOracleMatch`].
    #[tracing::instrument(level = "debug", skip(self, document))]
    pub fn backward(
        &self,
        document: &SourceDocument,
        page: usize,
        point: Point,
    ) -> SyncResult<BackwardTarget> {
        let location = self
            .locator
            .locate_backward(page, point)
            .ok_or(SyncError::NoOracleMatch)?;
        let coarse = BackwardTarget::Coarse {
            line: location.line,
            column: location.column,
        };
        if !self.config.backward_heuristic {
            return Ok(coarse);
        }

        match self.refine_backward(document, page, point, location.line) {
            Ok(target) => Ok(target),
            Err(error) => {
                tracing::debug!(%error, "keeping coarse source location");
                Ok(coarse)
            }
        }
    }

    fn refine_backward(
        &self,
        document: &SourceDocument,
        page: usize,
        point: Point,
        line: usize,
    ) -> SyncResult<BackwardTarget> {
        let budget = self.config.context_budget;
        let rendered = self
            .layout
            .context_at(page, point, budget)
            .ok_or(SyncError::EmptyContext)?;
        let (text, marker) = rendered.window(budget);
        let query = tokenize(
            &text,
            marker,
            &self.config.rendered_flush,
            Some(&self.config.translations),
        );

        let region = self.region(document, line)?;
        let target = tokenize_unmarked(&document.slice(region), &self.config.markup_flush, None);

        let found = self.correlate(Direction::Backward, &query, &target)?;
        Ok(BackwardTarget::Exact {
            offset: region.begin + found.position,
            score: found.score,
        })
    }

    /// Map the source position `line`/`column` to the rendered pages.
    ///
    /// Fails only with [`SyncError::NoOracleMatch`].
    #[tracing::instrument(level = "debug", skip(self, document))]
    pub fn forward(
        &self,
        document: &SourceDocument,
        line: usize,
        column: usize,
    ) -> SyncResult<ForwardTarget> {
        let rects = self
            .locator
            .locate_forward(line, column)
            .map(|rects| merge_rects(&rects, self.config.merge_tolerance))
            .filter(|rects| !rects.is_empty())
            .ok_or(SyncError::NoOracleMatch)?;
        let page = rects[0].page;
        if !self.config.forward_heuristic {
            return Ok(ForwardTarget::Coarse { page });
        }

        match self.refine_forward(document, line, column, page, &rects) {
            Ok(target) => Ok(target),
            Err(error) => {
                tracing::debug!(%error, page, "keeping coarse page");
                Ok(ForwardTarget::Coarse { page })
            }
        }
    }

    fn refine_forward(
        &self,
        document: &SourceDocument,
        line: usize,
        column: usize,
        page: usize,
        rects: &[PageRect],
    ) -> SyncResult<ForwardTarget> {
        let cursor = document
            .line_column_to_offset(line, column)
            .ok_or(SyncError::EmptyContext)?;
        let region = self.region(document, line)?;
        let marker = cursor
            .checked_sub(region.begin)
            .ok_or(SyncError::RegionHeuristicMiss { offset: cursor })?;
        let query = tokenize(
            &document.slice(region),
            marker,
            &self.config.markup_flush,
            None,
        );

        let page_text = PageText::collect(self.layout, page, rects);
        let target = tokenize_unmarked(
            &page_text.text,
            &self.config.rendered_flush,
            Some(&self.config.translations),
        );

        let found = self.correlate(Direction::Forward, &query, &target)?;
        let rect = page_text
            .word_rect(found.token.offset())
            .ok_or(SyncError::EmptyContext)?;
        Ok(ForwardTarget::Exact {
            page,
            rect,
            score: found.score,
        })
    }

    fn region(&self, document: &SourceDocument, line: usize) -> SyncResult<Region> {
        let latex = LatexEnvironments::new(&self.config.enclosing_constructs)
            .with_max_lines(self.config.construct_lines);
        let finder: &dyn ConstructFinder = match self.constructs {
            Some(finder) => finder,
            None => &latex,
        };
        source_region(document, line, finder).ok_or(SyncError::EmptyContext)
    }

    fn correlate(
        &self,
        direction: Direction,
        query: &Context,
        target: &Context,
    ) -> SyncResult<Correlation> {
        correlate(
            direction,
            query,
            target,
            &self.config.alignment,
            self.observer,
        )
    }
}

/// Page text rebuilt from glyphs, one slot per character. Separator slots
/// hold no glyph.
struct PageText {
    text: String,
    glyphs: Vec<Option<Glyph>>,
}

impl PageText {
    /// Glyphs of every rectangle on `page`, in order. A glyph seen twice is
    /// kept once; a jump in the page's character index becomes a space.
    fn collect(layout: &dyn TextLayout, page: usize, rects: &[PageRect]) -> Self {
        let mut text = String::new();
        let mut glyphs = Vec::new();
        let mut seen = HashSet::new();
        let mut last_index: Option<usize> = None;

        for rect in rects.iter().filter(|rect| rect.page == page) {
            for glyph in layout.text_in(page, rect.rect).unwrap_or_default() {
                if !seen.insert(glyph.index) {
                    continue;
                }
                if last_index.map_or(false, |last| glyph.index != last + 1) {
                    text.push(' ');
                    glyphs.push(None);
                }
                text.push(glyph.ch);
                glyphs.push(Some(glyph));
                last_index = Some(glyph.index);
            }
        }

        Self { text, glyphs }
    }

    /// Union of the glyph rectangles of the word around character `anchor`.
    /// A non-alphanumeric glyph is its own word.
    fn word_rect(&self, anchor: usize) -> Option<Rect> {
        let glyph = self.glyphs.get(anchor)?.as_ref()?;
        if !glyph.ch.is_alphanumeric() {
            return Some(glyph.rect);
        }

        let in_word = |slot: &Option<Glyph>| matches!(slot, Some(g) if g.ch.is_alphanumeric());
        let start = self.glyphs[..anchor]
            .iter()
            .rposition(|slot| !in_word(slot))
            .map_or(0, |idx| idx + 1);
        let end = self.glyphs[anchor..]
            .iter()
            .position(|slot| !in_word(slot))
            .map_or(self.glyphs.len(), |idx| anchor + idx);

        self.glyphs[start..end]
            .iter()
            .flatten()
            .map(|g| g.rect)
            .reduce(|a, b| a.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_row(text: &str, first_index: usize) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let x = (first_index + i) as f64 * 5.0;
                Glyph::new(ch, first_index + i, Rect::new(x, 0.0, x + 5.0, 10.0))
            })
            .collect()
    }

    #[test]
    fn test_word_rect_spans_alphanumeric_run() {
        let mut glyphs: Vec<Option<Glyph>> = glyph_row("ab(cd)", 0).into_iter().map(Some).collect();
        glyphs.push(None);
        glyphs.extend(glyph_row("ef", 7).into_iter().map(Some));
        let page = PageText {
            text: "ab(cd) ef".to_string(),
            glyphs,
        };

        assert_eq!(page.word_rect(4), Some(Rect::new(15.0, 0.0, 25.0, 10.0)));
        assert_eq!(page.word_rect(0), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(page.word_rect(2), Some(Rect::new(10.0, 0.0, 15.0, 10.0)));
        assert_eq!(page.word_rect(8), Some(Rect::new(35.0, 0.0, 45.0, 10.0)));
        assert_eq!(page.word_rect(6), None);
        assert_eq!(page.word_rect(40), None);
    }
}
