//! The align-then-resolve step shared by both correlation directions.

use crate::aligner::{align, AlignmentConfig};
use crate::errors::{SyncError, SyncResult};
use crate::observer::{CorrelationObserver, Direction};
use crate::resolver::{resolve_context, ResolutionKind};
use crate::scorer::score;
use crate::token::{Context, Token};

/// Outcome of a successful correlation, detached from the contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    /// Position in the target's raw context.
    pub position: usize,
    /// The target token that was hit.
    pub token: Token,
    /// Offset inside `token`.
    pub offset: usize,
    pub kind: ResolutionKind,
    /// Score of the alignment the position was read from.
    pub score: i64,
}

/// Align `query` against `target` and resolve the query's marked position.
///
/// An empty side fails with [`SyncError::EmptyContext`] before any
/// alignment work is done.
pub fn correlate(
    direction: Direction,
    query: &Context,
    target: &Context,
    config: &AlignmentConfig,
    observer: &dyn CorrelationObserver,
) -> SyncResult<Correlation> {
    if query.is_empty() || target.is_empty() {
        return Err(SyncError::EmptyContext);
    }

    observer.before_alignment(direction, query, target);
    let alignment = align(&query.tokens, &target.tokens, score, config);
    observer.after_alignment(direction, &alignment);

    let outcome = resolve_context(query, &alignment);
    observer.after_resolution(direction, &outcome);

    let resolution = outcome?;
    Ok(Correlation {
        position: resolution.position(),
        token: resolution.token.clone(),
        offset: resolution.offset,
        kind: resolution.kind,
        score: alignment.score,
    })
}
