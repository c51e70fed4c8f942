//! Correlation configuration.
//!
//! A [`SyncConfig`] is an immutable value handed to every correlation call.
//! Hosts may swap it between calls; nothing reads it from global state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aligner::AlignmentConfig;
use crate::errors::{SyncError, SyncResult};
use crate::flush::FlushPattern;
use crate::translation::TranslationTable;

/// Every tunable of the correlation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Refine backward (rendered → source) results below line granularity.
    pub backward_heuristic: bool,
    /// Refine forward (source → rendered) results below page granularity.
    pub forward_heuristic: bool,
    /// Characters of rendered text taken on each side of a clicked point.
    pub context_budget: usize,
    /// Largest vertical gap between two rectangles that still merges them,
    /// in page units.
    pub merge_tolerance: f64,
    /// Noise removed from rendered text.
    pub rendered_flush: FlushPattern,
    /// Noise removed from markup source.
    pub markup_flush: FlushPattern,
    /// Environments whose whole body forms one source region in forward
    /// search. Empty means every environment qualifies.
    pub enclosing_constructs: Vec<String>,
    /// Most source lines one construct region may span, delimiters included.
    pub construct_lines: usize,
    // TOML output needs tables after plain values.
    pub alignment: AlignmentConfig,
    /// Glyph spellings applied to rendered text.
    pub translations: TranslationTable,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backward_heuristic: true,
            forward_heuristic: true,
            context_budget: 64,
            merge_tolerance: 3.0,
            rendered_flush: FlushPattern::rendered(),
            markup_flush: FlushPattern::markup(),
            enclosing_constructs: [
                "equation",
                "equation*",
                "align",
                "align*",
                "gather",
                "gather*",
                "multline",
                "multline*",
                "eqnarray",
                "eqnarray*",
                "displaymath",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
            construct_lines: 50,
            alignment: AlignmentConfig::default(),
            translations: TranslationTable::tex_math(),
        }
    }
}

impl SyncConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> SyncResult<Self> {
        toml::from_str(content).map_err(|e| SyncError::Config {
            message: e.to_string(),
        })
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> SyncResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SyncError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            SyncError::Config { message } => SyncError::Config {
                message: format!("failed to parse {}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> SyncResult<String> {
        toml::to_string(self).map_err(|e| SyncError::Config {
            message: e.to_string(),
        })
    }

    /// Disable both heuristics, leaving the oracle's coarse positions.
    pub fn coarse_only(mut self) -> Self {
        self.backward_heuristic = false;
        self.forward_heuristic = false;
        self
    }
}
