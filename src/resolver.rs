//! Maps a marked query position onto the target side of an alignment.

use crate::aligner::Alignment;
use crate::errors::{SyncError, SyncResult};
use crate::token::{Context, Token};

/// A resolved location in the target sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The target token the query point maps onto.
    pub token: &'a Token,
    /// Offset inside `token`'s normalized text.
    pub offset: usize,
    /// How the token was found.
    pub kind: ResolutionKind,
}

impl<'a> Resolution<'a> {
    /// Position in the target's raw context: back-reference plus offset.
    pub fn position(&self) -> usize {
        self.token.offset() + self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// The marked token itself was matched.
    Exact,
    /// Snapped to the start of the next matched token.
    NextNeighbor,
    /// Snapped to the end of the previous matched token.
    PreviousNeighbor,
}

/// Resolve the marked position of `query` through `alignment`.
///
/// `alignment` must have been built with `query`'s tokens on the left.
pub fn resolve_context<'a>(
    query: &Context,
    alignment: &Alignment<'a, Token>,
) -> SyncResult<Resolution<'a>> {
    match query.marked_index {
        Some(marked) if !query.is_empty() => resolve(marked, query.char_offset, alignment),
        _ => Err(SyncError::EmptyContext),
    }
}

/// Resolve `(marked, char_offset)` on the left side of `alignment`.
///
/// When the marked token has no partner, one step to the right (start of
/// that token) and then one step to the left (end of that token) are tried.
/// The search never goes further, so a missing match cannot drift far from
/// the query point.
pub fn resolve<'a>(
    marked: usize,
    char_offset: usize,
    alignment: &Alignment<'a, Token>,
) -> SyncResult<Resolution<'a>> {
    let aligned = alignment.right_by_left();
    if aligned.is_empty() {
        return Err(SyncError::EmptyContext);
    }

    debug_assert!(
        marked < aligned.len(),
        "marked index {} out of range for {} aligned query tokens",
        marked,
        aligned.len()
    );
    if marked >= aligned.len() {
        return Err(SyncError::AlignmentIndexInvariantViolation {
            marked,
            aligned: aligned.len(),
        });
    }

    if let Some(token) = aligned[marked] {
        return Ok(Resolution {
            token,
            offset: char_offset,
            kind: ResolutionKind::Exact,
        });
    }

    if let Some(&Some(token)) = aligned.get(marked + 1) {
        return Ok(Resolution {
            token,
            offset: 0,
            kind: ResolutionKind::NextNeighbor,
        });
    }

    if let Some(&Some(token)) = marked.checked_sub(1).and_then(|prev| aligned.get(prev)) {
        return Ok(Resolution {
            token,
            offset: token.char_len(),
            kind: ResolutionKind::PreviousNeighbor,
        });
    }

    Err(SyncError::ResolutionGapExhausted { marked })
}
