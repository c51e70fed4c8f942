//! Backward and forward search between rendered pages and markup source.
//!
//! This crate drives `layered-sync` against the collaborators a viewer or
//! editor already has: a coarse locator (SyncTeX or similar), the page text
//! layout, and the source buffer.
//!
//! ## Core Types
//!
//! - [`Correlator`] - runs [`backward`](Correlator::backward) and
//!   [`forward`](Correlator::forward) searches
//! - [`CoarseLocator`] / [`TextLayout`] - host-provided collaborators
//! - [`SourceDocument`] / [`Region`] - source text with a line index
//! - [`ConstructFinder`] / [`LatexEnvironments`] - multi-line source regions
//! - [`Rect`] / [`PageRect`] / [`Glyph`] - page geometry
//!
//! ## Example
//!
//! ```
//! use layered_sync_document::{Region, SourceDocument};
//!
//! let doc = SourceDocument::from_text("\\begin{equation}\n  E = mc^2\n\\end{equation}");
//! assert_eq!(doc.line_count(), 3);
//! assert_eq!(doc.line_region(1), Some(Region::new(17, 27)));
//! ```

mod collaborators;
mod construct;
mod correlator;
mod geometry;
mod source;

// Collaborators
pub use collaborators::{CoarseLocator, RenderedContext, TextLayout};

// Source side
pub use construct::{
    source_region, ConstructFinder, LatexEnvironments, SingleLine, DEFAULT_CONSTRUCT_LINES,
};
pub use source::{Region, SourceDocument, SourceLocation};

// Page side
pub use geometry::{merge_rects, Glyph, PageRect, Point, Rect};

// Search
pub use correlator::{BackwardTarget, Correlator, ForwardTarget};

#[cfg(test)]
mod tests;
