//! Source regions used as correlation context.
//!
//! The default region is one source line. A line that opens or closes a
//! paired construct widens the region to the whole construct.

use once_cell::sync::Lazy;
use regex::Regex;

use layered_sync::{SyncError, SyncResult};

use crate::source::{Region, SourceDocument};

/// Locates the paired construct that `line` opens or closes.
pub trait ConstructFinder {
    /// The region from the first line of the construct to the end of its
    /// last line, or [`SyncError::RegionHeuristicMiss`].
    fn find_enclosing_construct(&self, document: &SourceDocument, line: usize)
        -> SyncResult<Region>;
}

/// Finds no construct. Every region is a single line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLine;

impl ConstructFinder for SingleLine {
    fn find_enclosing_construct(
        &self,
        document: &SourceDocument,
        line: usize,
    ) -> SyncResult<Region> {
        Err(SyncError::RegionHeuristicMiss {
            offset: line_start(document, line),
        })
    }
}

static LEADING_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\\(begin|end)\{([^}]*)\}").expect("Invalid leading delimiter regex")
});

static DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(begin|end)\{([^}]*)\}").expect("Invalid environment delimiter regex")
});

/// Lines a construct may span, delimiters included, unless configured.
pub const DEFAULT_CONSTRUCT_LINES: usize = 50;

/// LaTeX `\begin{name}` / `\end{name}` pairs.
///
/// Nested environments of the same name are skipped while searching for the
/// partner. An empty name list accepts every environment. The partner must
/// lie within `max_lines` lines of the starting line, counting both.
#[derive(Debug, Clone, Copy)]
pub struct LatexEnvironments<'a> {
    names: &'a [String],
    max_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Delimiter {
    line: usize,
    opens: bool,
    name: String,
}

impl<'a> LatexEnvironments<'a> {
    pub fn new(names: &'a [String]) -> Self {
        Self {
            names,
            max_lines: DEFAULT_CONSTRUCT_LINES,
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    fn accepts(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n == name)
    }

    fn delimiters_on(document: &SourceDocument, line: usize) -> Vec<Delimiter> {
        let text = document.line_text(line).unwrap_or_default();
        DELIMITER
            .captures_iter(&text)
            .map(|caps| Delimiter {
                line,
                opens: &caps[1] == "begin",
                name: caps[2].to_string(),
            })
            .collect()
    }

    /// Line of the delimiter closing the first `\begin{name}` on `line`.
    fn closing_line(&self, document: &SourceDocument, line: usize, name: &str) -> Option<usize> {
        let mut depth = 0usize;
        let mut seen_opening = false;
        let stop = document.line_count().min(line.saturating_add(self.max_lines));
        for idx in line..stop {
            for delimiter in Self::delimiters_on(document, idx) {
                if delimiter.name != name {
                    continue;
                }
                if delimiter.opens {
                    seen_opening = true;
                    depth += 1;
                } else if seen_opening {
                    depth -= 1;
                    if depth == 0 {
                        return Some(delimiter.line);
                    }
                }
            }
        }
        None
    }

    /// Line of the delimiter opening the last `\end{name}` on `line`.
    fn opening_line(&self, document: &SourceDocument, line: usize, name: &str) -> Option<usize> {
        let mut depth = 0usize;
        let mut seen_closing = false;
        let start = (line + 1).saturating_sub(self.max_lines);
        for idx in (start..=line).rev() {
            for delimiter in Self::delimiters_on(document, idx).into_iter().rev() {
                if delimiter.name != name {
                    continue;
                }
                if !delimiter.opens {
                    seen_closing = true;
                    depth += 1;
                } else if seen_closing {
                    depth -= 1;
                    if depth == 0 {
                        return Some(delimiter.line);
                    }
                }
            }
        }
        None
    }
}

impl ConstructFinder for LatexEnvironments<'_> {
    fn find_enclosing_construct(
        &self,
        document: &SourceDocument,
        line: usize,
    ) -> SyncResult<Region> {
        let miss = || SyncError::RegionHeuristicMiss {
            offset: line_start(document, line),
        };

        let text = document.line_text(line).ok_or_else(miss)?;
        let caps = LEADING_DELIMITER.captures(&text).ok_or_else(miss)?;
        let name = &caps[2];
        if !self.accepts(name) {
            return Err(miss());
        }

        let (first, last) = if &caps[1] == "begin" {
            (line, self.closing_line(document, line, name).ok_or_else(miss)?)
        } else {
            (self.opening_line(document, line, name).ok_or_else(miss)?, line)
        };

        match (document.line_region(first), document.line_region(last)) {
            (Some(first), Some(last)) => Ok(Region::new(first.begin, last.end)),
            _ => Err(miss()),
        }
    }
}

/// The construct around `line`, or the line itself when the finder misses
/// or returns a region that does not cover the whole line.
/// `None` only when `line` is outside the document.
pub fn source_region(
    document: &SourceDocument,
    line: usize,
    finder: &dyn ConstructFinder,
) -> Option<Region> {
    let single = document.line_region(line)?;
    match finder.find_enclosing_construct(document, line) {
        Ok(region) if region.contains(single.begin) && region.contains(single.end) => {
            Some(region)
        }
        Ok(region) => {
            tracing::debug!(
                line,
                begin = region.begin,
                end = region.end,
                "construct region misses its line, using single-line region"
            );
            Some(single)
        }
        Err(error) => {
            tracing::trace!(line, %error, "using single-line region");
            Some(single)
        }
    }
}

fn line_start(document: &SourceDocument, line: usize) -> usize {
    document
        .line_region(line)
        .map_or(document.char_len(), |region| region.begin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r"Some text.
\begin{align}
  a &= b \\
  \begin{align}
    c &= d
  \end{align}
\end{align}
After.";

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_begin_line_extends_to_partner() {
        let doc = SourceDocument::from_text(SOURCE);
        let all: Vec<String> = Vec::new();
        let finder = LatexEnvironments::new(&all);

        let region = finder.find_enclosing_construct(&doc, 1).unwrap();
        let text = doc.slice(region);
        assert!(text.starts_with(r"\begin{align}"));
        assert!(text.ends_with(r"  \end{align}
\end{align}"));
    }

    #[test]
    fn test_end_line_extends_to_partner() {
        let doc = SourceDocument::from_text(SOURCE);
        let all: Vec<String> = Vec::new();
        let finder = LatexEnvironments::new(&all);

        let inner = finder.find_enclosing_construct(&doc, 5).unwrap();
        assert_eq!(
            doc.slice(inner),
            "  \\begin{align}\n    c &= d\n  \\end{align}"
        );

        let outer = finder.find_enclosing_construct(&doc, 6).unwrap();
        assert_eq!(outer, finder.find_enclosing_construct(&doc, 1).unwrap());
    }

    #[test]
    fn test_single_line_environment() {
        let doc = SourceDocument::from_text(r"x \begin{equation}y\end{equation}");
        let all: Vec<String> = Vec::new();
        let finder = LatexEnvironments::new(&all);
        // Not at the start of the line.
        assert!(finder.find_enclosing_construct(&doc, 0).is_err());

        let doc = SourceDocument::from_text(r"\begin{equation}y\end{equation} z");
        let region = finder.find_enclosing_construct(&doc, 0).unwrap();
        assert_eq!(region, doc.line_region(0).unwrap());
    }

    #[test]
    fn test_misses() {
        let doc = SourceDocument::from_text(SOURCE);
        let math = names(&["equation"]);
        let finder = LatexEnvironments::new(&math);

        assert_eq!(
            finder.find_enclosing_construct(&doc, 1),
            Err(SyncError::RegionHeuristicMiss { offset: 11 })
        );

        let unbalanced = SourceDocument::from_text("\\begin{equation}\nx");
        assert!(finder.find_enclosing_construct(&unbalanced, 0).is_err());
        assert!(finder.find_enclosing_construct(&doc, 0).is_err());
    }

    #[test]
    fn test_partner_beyond_line_budget() {
        let mut text = String::from("\\begin{document}\n");
        for idx in 0..60 {
            text.push_str(&format!("line {}\n", idx));
        }
        text.push_str("\\end{document}");
        let doc = SourceDocument::from_text(&text);
        let all: Vec<String> = Vec::new();

        let bounded = LatexEnvironments::new(&all);
        assert!(bounded.find_enclosing_construct(&doc, 0).is_err());
        assert!(bounded.find_enclosing_construct(&doc, 61).is_err());
        assert_eq!(source_region(&doc, 0, &bounded), doc.line_region(0));

        let wide = LatexEnvironments::new(&all).with_max_lines(62);
        let region = wide.find_enclosing_construct(&doc, 0).unwrap();
        assert_eq!(region, Region::new(0, doc.char_len()));
        assert_eq!(wide.find_enclosing_construct(&doc, 61), Ok(region));
        assert!(LatexEnvironments::new(&all)
            .with_max_lines(61)
            .find_enclosing_construct(&doc, 0)
            .is_err());
    }

    struct NextLine;

    impl ConstructFinder for NextLine {
        fn find_enclosing_construct(
            &self,
            document: &SourceDocument,
            line: usize,
        ) -> SyncResult<Region> {
            document
                .line_region(line + 1)
                .ok_or(SyncError::RegionHeuristicMiss { offset: 0 })
        }
    }

    #[test]
    fn test_region_must_cover_line() {
        let doc = SourceDocument::from_text(SOURCE);
        assert_eq!(source_region(&doc, 0, &NextLine), doc.line_region(0));
        assert_eq!(source_region(&doc, 7, &NextLine), doc.line_region(7));
    }

    #[test]
    fn test_source_region_falls_back_to_line() {
        let doc = SourceDocument::from_text(SOURCE);
        let math = names(&["equation"]);

        assert_eq!(
            source_region(&doc, 1, &LatexEnvironments::new(&math)),
            doc.line_region(1)
        );
        assert_eq!(source_region(&doc, 2, &SingleLine), doc.line_region(2));
        assert_eq!(source_region(&doc, 40, &SingleLine), None);
    }
}
