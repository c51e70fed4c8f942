//! Noise-removal patterns applied before tokenization.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{SyncError, SyncResult};

// Brackets, braces, dots, pipes, backslashes, control characters and
// hyphenated line wraps, as they come out of text extraction.
const RENDERED_NOISE: &str = r"-\n+|[\[\]{}.·|\\]|\p{Cc}";

// Markup that never shows up as text: line breaks, structural and reference
// commands, math delimiters, ties and comments. `\\` comes first so that the
// `%` after a line break still starts a comment.
const MARKUP_NOISE: &str =
    r"\\\\|\\(?:begin|end|(?:eq)?ref|label|cite)\{[^}]*\}|\\[\[\]()]|\\%|%[^\n]*|[$~]";

static RENDERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(RENDERED_NOISE).expect("Invalid rendered noise regex"));
static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(MARKUP_NOISE).expect("Invalid markup noise regex"));

/// A compiled flush pattern.
///
/// Serializes as its regex source.
#[derive(Clone)]
pub struct FlushPattern {
    regex: Regex,
}

impl FlushPattern {
    /// Compile a user-supplied pattern.
    pub fn new(pattern: &str) -> SyncResult<Self> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|e| SyncError::Config {
                message: format!("invalid flush pattern {:?}: {}", pattern, e),
            })
    }

    /// Noise found in text extracted from rendered pages.
    pub fn rendered() -> Self {
        Self {
            regex: RENDERED.clone(),
        }
    }

    /// Noise found in markup source.
    pub fn markup() -> Self {
        Self {
            regex: MARKUP.clone(),
        }
    }

    /// A pattern that never matches.
    pub fn none() -> Self {
        Self {
            regex: NEVER.clone(),
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

// End of text directly followed by start of text: only ever an empty match.
static NEVER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\z\A").expect("Invalid empty regex"));

impl fmt::Debug for FlushPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FlushPattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for FlushPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for FlushPattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FlushPattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        FlushPattern::new(&pattern).map_err(serde::de::Error::custom)
    }
}
