//! Semi-global sequence alignment over token sequences.
//!
//! The alignment is a queryable value, not just an intermediate result:
//! the resolver walks it, the observer reports on it, and tests inspect
//! its matches and gaps directly.
//!
//! # Example
//!
//! ```
//! use layered_sync::{align, AlignmentConfig};
//!
//! let left = ["alpha", "beta", "gamma"];
//! let right = ["alpha", "gamma"];
//! let alignment = align(&left, &right, |a, b| if a == b { 1 } else { -1 }, &AlignmentConfig::default());
//!
//! assert_eq!(alignment.match_count(), 2);
//! assert_eq!(alignment.left_gaps().count(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Which ends of the sequences may be skipped without penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// Every gap is penalized.
    Global,
    /// Trailing runs on either axis are free.
    Prefix,
    /// Leading runs on either axis are free.
    Suffix,
    /// Leading and trailing runs on either axis are free.
    Infix,
}

impl AlignmentMode {
    fn free_leading(self) -> bool {
        matches!(self, AlignmentMode::Suffix | AlignmentMode::Infix)
    }

    fn free_trailing(self) -> bool {
        matches!(self, AlignmentMode::Prefix | AlignmentMode::Infix)
    }
}

impl Default for AlignmentMode {
    fn default() -> Self {
        AlignmentMode::Infix
    }
}

/// Configuration for sequence alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub mode: AlignmentMode,
    /// Score added for every penalized gap. Should be negative.
    pub gap_penalty: i64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Infix,
            gap_penalty: -1,
        }
    }
}

/// One column of an alignment: an element from each side, or a gap.
///
/// Each present side carries its index in the original sequence.
#[derive(Debug, PartialEq)]
pub struct AlignedPair<'a, T> {
    pub left: Option<(usize, &'a T)>,
    pub right: Option<(usize, &'a T)>,
}

impl<'a, T> Clone for AlignedPair<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for AlignedPair<'a, T> {}

impl<'a, T> AlignedPair<'a, T> {
    /// Both sides present.
    pub fn is_match(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn left_item(&self) -> Option<&'a T> {
        self.left.map(|(_, item)| item)
    }

    pub fn right_item(&self) -> Option<&'a T> {
        self.right.map(|(_, item)| item)
    }
}

/// An ordered, non-crossing pairing of two sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment<'a, T> {
    pub pairs: Vec<AlignedPair<'a, T>>,
    pub score: i64,
}

impl<'a, T> Alignment<'a, T> {
    /// Pairs with both sides present.
    pub fn matches(&self) -> impl Iterator<Item = &AlignedPair<'a, T>> {
        self.pairs.iter().filter(|p| p.is_match())
    }

    /// Left elements with no partner.
    pub fn left_gaps(&self) -> impl Iterator<Item = &AlignedPair<'a, T>> {
        self.pairs
            .iter()
            .filter(|p| p.left.is_some() && p.right.is_none())
    }

    /// Right elements with no partner.
    pub fn right_gaps(&self) -> impl Iterator<Item = &AlignedPair<'a, T>> {
        self.pairs
            .iter()
            .filter(|p| p.left.is_none() && p.right.is_some())
    }

    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    /// Fraction of left elements that found a partner.
    pub fn coverage(&self) -> f64 {
        let total = self.pairs.iter().filter(|p| p.left.is_some()).count();
        if total == 0 {
            return 0.0;
        }
        self.match_count() as f64 / total as f64
    }

    /// The right side of every pair whose left side is present, in left order.
    ///
    /// The result is indexable in parallel with the left sequence.
    pub fn right_by_left(&self) -> Vec<Option<&'a T>> {
        self.pairs
            .iter()
            .filter(|p| p.left.is_some())
            .map(AlignedPair::right_item)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    /// Consume one element from both sides.
    Diag,
    /// Consume a left element against a gap.
    Up,
    /// Consume a right element against a gap.
    Left,
}

/// Align `left` against `right`, maximizing the summed `score`.
///
/// Per cell, ties prefer a diagonal step, then a left-only step. Among
/// equally good end cells the first in row-major order wins.
pub fn align<'a, T, F>(
    left: &'a [T],
    right: &'a [T],
    score: F,
    config: &AlignmentConfig,
) -> Alignment<'a, T>
where
    F: Fn(&T, &T) -> i64,
{
    let n = left.len();
    let m = right.len();
    let width = m + 1;
    let gap = config.gap_penalty;
    let leading_gap = if config.mode.free_leading() { 0 } else { gap };

    let mut values = vec![0i64; (n + 1) * width];
    let mut steps = vec![Step::Start; (n + 1) * width];
    let at = |i: usize, j: usize| i * width + j;

    for i in 1..=n {
        values[at(i, 0)] = values[at(i - 1, 0)] + leading_gap;
        steps[at(i, 0)] = Step::Up;
    }
    for j in 1..=m {
        values[at(0, j)] = values[at(0, j - 1)] + leading_gap;
        steps[at(0, j)] = Step::Left;
    }

    for i in 1..=n {
        for j in 1..=m {
            let diag = values[at(i - 1, j - 1)] + score(&left[i - 1], &right[j - 1]);
            let up = values[at(i - 1, j)] + gap;
            let lft = values[at(i, j - 1)] + gap;

            let (best, step) = if diag >= up && diag >= lft {
                (diag, Step::Diag)
            } else if up >= lft {
                (up, Step::Up)
            } else {
                (lft, Step::Left)
            };
            values[at(i, j)] = best;
            steps[at(i, j)] = step;
        }
    }

    let (end_i, end_j) = if config.mode.free_trailing() {
        let mut end = None::<(usize, usize)>;
        for i in 0..=n {
            for j in 0..=m {
                if i != n && j != m {
                    continue;
                }
                match end {
                    Some((bi, bj)) if values[at(i, j)] <= values[at(bi, bj)] => {}
                    _ => end = Some((i, j)),
                }
            }
        }
        end.unwrap_or((n, m))
    } else {
        (n, m)
    };

    let mut pairs = Vec::with_capacity(n + m);
    let (mut i, mut j) = (end_i, end_j);
    loop {
        match steps[at(i, j)] {
            Step::Start => break,
            Step::Diag => {
                pairs.push(AlignedPair {
                    left: Some((i - 1, &left[i - 1])),
                    right: Some((j - 1, &right[j - 1])),
                });
                i -= 1;
                j -= 1;
            }
            Step::Up => {
                pairs.push(AlignedPair {
                    left: Some((i - 1, &left[i - 1])),
                    right: None,
                });
                i -= 1;
            }
            Step::Left => {
                pairs.push(AlignedPair {
                    left: None,
                    right: Some((j - 1, &right[j - 1])),
                });
                j -= 1;
            }
        }
    }
    pairs.reverse();

    pairs.extend((end_i..n).map(|idx| AlignedPair {
        left: Some((idx, &left[idx])),
        right: None,
    }));
    pairs.extend((end_j..m).map(|idx| AlignedPair {
        left: None,
        right: Some((idx, &right[idx])),
    }));

    let alignment = Alignment {
        pairs,
        score: values[at(end_i, end_j)],
    };

    tracing::trace!(
        left = n,
        right = m,
        score = alignment.score,
        matches = alignment.match_count(),
        "aligned sequences"
    );

    alignment
}
