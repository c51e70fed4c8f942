#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Word-level correlation between a rendered document and its markup source.
//!
//! A coarse locator (such as SyncTeX) maps a click in a PDF to a source line,
//! or a source line to a page region, but not to a word. This crate closes
//! the gap: it tokenizes a small window of text on each side, aligns the two
//! token sequences, and reads the exact word and intra-word offset off the
//! alignment.
//!
//! ## Pipeline
//!
//! - [`tokenize`] - raw context string to position-tagged [`Token`]s
//! - [`score`] - pairwise token similarity
//! - [`align`] - semi-global (infix) sequence alignment
//! - [`resolve`] - marked query position to target position
//! - [`correlate`] - the above, with [`CorrelationObserver`] hooks
//!
//! Orchestration against real collaborators (oracle, page text, source
//! buffer) lives in `layered-sync-document`.
//!
//! ## Example
//!
//! ```
//! use layered_sync::{correlate, tokenize, tokenize_unmarked, Direction, NoopObserver, SyncConfig};
//!
//! let config = SyncConfig::default();
//! let rendered = "The integral ∫ f(x) dx";
//! let source = r"The $\int f(x)\,dx$";
//!
//! let glyph = rendered.chars().position(|c| c == '∫').unwrap();
//! let query = tokenize(rendered, glyph, &config.rendered_flush, Some(&config.translations));
//! let target = tokenize_unmarked(source, &config.markup_flush, None);
//!
//! let found = correlate(Direction::Backward, &query, &target, &config.alignment, &NoopObserver).unwrap();
//! assert_eq!(found.token.canonical(), "int");
//! assert_eq!(found.position, 6);
//! ```

mod aligner;
mod config;
mod correlate;
mod display;
mod errors;
mod flush;
mod observer;
mod resolver;
mod scorer;
mod token;
mod tokenizer;
mod translation;

pub use aligner::{align, AlignedPair, Alignment, AlignmentConfig, AlignmentMode};
pub use config::SyncConfig;
pub use correlate::{correlate, Correlation};
pub use display::AlignmentDisplay;
pub use errors::{SyncError, SyncResult};
pub use flush::FlushPattern;
pub use observer::{
    CorrelationObserver, Direction, NoopObserver, ObservedEvent, RecordingObserver,
    TracingObserver,
};
pub use resolver::{resolve, resolve_context, Resolution, ResolutionKind};
pub use scorer::score;
pub use token::{Context, Token};
pub use tokenizer::{tokenize, tokenize_unmarked};
pub use translation::TranslationTable;
