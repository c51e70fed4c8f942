//! Character-to-spelling translation for rendered symbols.
//!
//! Typeset output shows `∫` where the source says `\int`. The table maps
//! such glyphs to the spellings they may have in the markup, so the scorer
//! can reward the correspondence.

use std::collections::BTreeMap;
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

/// Mapping from a single character to one or more equivalent spellings.
///
/// Serializes as a map from one-character strings to lists of spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct TranslationTable {
    entries: BTreeMap<char, Vec<String>>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glyphs produced by common TeX math macros.
    pub fn tex_math() -> Self {
        const ENTRIES: &[(char, &[&str])] = &[
            ('∫', &["int"]),
            ('∬', &["iint"]),
            ('∮', &["oint"]),
            ('∑', &["sum"]),
            ('∏', &["prod"]),
            ('×', &["times"]),
            ('÷', &["div"]),
            ('±', &["pm"]),
            ('∓', &["mp"]),
            ('≤', &["leq", "le"]),
            ('≥', &["geq", "ge"]),
            ('≠', &["neq", "ne"]),
            ('≈', &["approx"]),
            ('≡', &["equiv"]),
            ('∼', &["sim"]),
            ('∞', &["infty"]),
            ('∂', &["partial"]),
            ('∇', &["nabla"]),
            ('√', &["sqrt"]),
            ('∈', &["in"]),
            ('∉', &["notin"]),
            ('⊂', &["subset"]),
            ('⊆', &["subseteq"]),
            ('∪', &["cup"]),
            ('∩', &["cap"]),
            ('∅', &["emptyset", "varnothing"]),
            ('∀', &["forall"]),
            ('∃', &["exists"]),
            ('¬', &["neg", "lnot"]),
            ('∧', &["wedge", "land"]),
            ('∨', &["vee", "lor"]),
            ('→', &["to", "rightarrow"]),
            ('←', &["leftarrow", "gets"]),
            ('⇒', &["Rightarrow", "implies"]),
            ('⇔', &["Leftrightarrow", "iff"]),
            ('↦', &["mapsto"]),
            ('…', &["ldots", "dots"]),
            ('⋯', &["cdots"]),
            ('α', &["alpha"]),
            ('β', &["beta"]),
            ('γ', &["gamma"]),
            ('δ', &["delta"]),
            ('ε', &["varepsilon", "epsilon"]),
            ('ϵ', &["epsilon"]),
            ('θ', &["theta"]),
            ('λ', &["lambda"]),
            ('μ', &["mu"]),
            ('π', &["pi"]),
            ('ρ', &["rho"]),
            ('σ', &["sigma"]),
            ('τ', &["tau"]),
            ('φ', &["varphi", "phi"]),
            ('ϕ', &["phi"]),
            ('χ', &["chi"]),
            ('ψ', &["psi"]),
            ('ω', &["omega"]),
            ('Γ', &["Gamma"]),
            ('Δ', &["Delta"]),
            ('Θ', &["Theta"]),
            ('Λ', &["Lambda"]),
            ('Π', &["Pi"]),
            ('Σ', &["Sigma"]),
            ('Φ', &["Phi"]),
            ('Ψ', &["Psi"]),
            ('Ω', &["Omega"]),
        ];

        let mut table = Self::new();
        for (glyph, spellings) in ENTRIES {
            table.insert(*glyph, spellings.iter().copied());
        }
        table
    }

    /// Add or replace the spellings for `glyph`.
    pub fn insert<I, S>(&mut self, glyph: char, spellings: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spellings: Vec<String> = spellings.into_iter().map(Into::into).collect();
        if spellings.is_empty() {
            self.entries.remove(&glyph);
        } else {
            self.entries.insert(glyph, spellings);
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<I, S>(mut self, glyph: char, spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(glyph, spellings);
        self
    }

    pub fn get(&self, glyph: char) -> Option<&[String]> {
        self.entries.get(&glyph).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TranslationTable {
    type Error = String;

    fn try_from(map: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for (key, spellings) in map {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(glyph), None) => table.insert(glyph, spellings),
                _ => {
                    return Err(format!(
                        "translation key {:?} must be exactly one character",
                        key
                    ))
                }
            }
        }
        Ok(table)
    }
}

impl From<TranslationTable> for BTreeMap<String, Vec<String>> {
    fn from(table: TranslationTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(glyph, spellings)| (glyph.to_string(), spellings))
            .collect()
    }
}
