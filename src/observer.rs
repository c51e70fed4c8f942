//! Instrumentation hooks called by the correlation pipeline.
//!
//! Observers see every stage of a correlation without being part of it:
//! before alignment, after alignment, and after resolution. The pipeline
//! behaves identically whichever observer is plugged in.

use std::sync::{Mutex, MutexGuard};

use crate::aligner::Alignment;
use crate::display::AlignmentDisplay;
use crate::errors::SyncResult;
use crate::resolver::Resolution;
use crate::token::{Context, Token};

/// Direction of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Rendered view → markup source.
    Backward,
    /// Markup source → rendered view.
    Forward,
}

/// Receives pipeline events. Every method defaults to doing nothing.
pub trait CorrelationObserver {
    fn before_alignment(&self, _direction: Direction, _query: &Context, _target: &Context) {}

    fn after_alignment(&self, _direction: Direction, _alignment: &Alignment<'_, Token>) {}

    fn after_resolution(&self, _direction: Direction, _outcome: &SyncResult<Resolution<'_>>) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CorrelationObserver for NoopObserver {}

/// Forwards events to `tracing` at debug level, and the full alignment
/// table at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CorrelationObserver for TracingObserver {
    fn before_alignment(&self, direction: Direction, query: &Context, target: &Context) {
        tracing::debug!(
            ?direction,
            query_tokens = query.len(),
            target_tokens = target.len(),
            marked_index = ?query.marked_index,
            char_offset = query.char_offset,
            "aligning contexts"
        );
    }

    fn after_alignment(&self, direction: Direction, alignment: &Alignment<'_, Token>) {
        tracing::debug!(
            ?direction,
            score = alignment.score,
            matches = alignment.match_count(),
            query_gaps = alignment.left_gaps().count(),
            target_gaps = alignment.right_gaps().count(),
            "aligned contexts"
        );
        tracing::trace!(
            ?direction,
            "alignment table\n{}",
            AlignmentDisplay::new(alignment)
        );
    }

    fn after_resolution(&self, direction: Direction, outcome: &SyncResult<Resolution<'_>>) {
        match outcome {
            Ok(resolution) => tracing::debug!(
                ?direction,
                token = %resolution.token,
                offset = resolution.offset,
                position = resolution.position(),
                kind = ?resolution.kind,
                "resolved position"
            ),
            Err(error) => tracing::debug!(?direction, %error, "resolution failed"),
        }
    }
}

/// One recorded pipeline event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    BeforeAlignment {
        direction: Direction,
        query_tokens: usize,
        target_tokens: usize,
    },
    AfterAlignment {
        direction: Direction,
        score: i64,
        matches: usize,
    },
    AfterResolution {
        direction: Direction,
        position: Option<usize>,
    },
}

/// Collects events in memory, for tests and debugging sessions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ObservedEvent>> {
        // A panicking test thread must not hide the events recorded so far.
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CorrelationObserver for RecordingObserver {
    fn before_alignment(&self, direction: Direction, query: &Context, target: &Context) {
        self.lock().push(ObservedEvent::BeforeAlignment {
            direction,
            query_tokens: query.len(),
            target_tokens: target.len(),
        });
    }

    fn after_alignment(&self, direction: Direction, alignment: &Alignment<'_, Token>) {
        self.lock().push(ObservedEvent::AfterAlignment {
            direction,
            score: alignment.score,
            matches: alignment.match_count(),
        });
    }

    fn after_resolution(&self, direction: Direction, outcome: &SyncResult<Resolution<'_>>) {
        self.lock().push(ObservedEvent::AfterResolution {
            direction,
            position: outcome.as_ref().ok().map(Resolution::position),
        });
    }
}
