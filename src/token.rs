//! Position-tagged tokens and the contexts built from them.

use std::fmt;

/// A normalized unit of text carrying a back-reference into its raw context.
///
/// `offset` is the character offset of the token's first character in the
/// text it was tokenized from. For translated symbols every alternative
/// shares the glyph's offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// One canonical spelling.
    Single { text: String, offset: usize },
    /// Several acceptable spellings; the first one is canonical.
    Alternatives { texts: Vec<String>, offset: usize },
}

impl Token {
    pub fn single(text: impl Into<String>, offset: usize) -> Self {
        Token::Single {
            text: text.into(),
            offset,
        }
    }

    /// Create a token from a list of spellings.
    ///
    /// A list with exactly one entry collapses to [`Token::Single`].
    /// Returns `None` for an empty list.
    pub fn alternatives<I, S>(texts: I, offset: usize) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        match texts.len() {
            0 => None,
            1 => texts.pop().map(|text| Token::Single { text, offset }),
            _ => Some(Token::Alternatives { texts, offset }),
        }
    }

    /// Character offset of this token in its originating context.
    pub fn offset(&self) -> usize {
        match self {
            Token::Single { offset, .. } | Token::Alternatives { offset, .. } => *offset,
        }
    }

    /// The canonical spelling.
    pub fn canonical(&self) -> &str {
        match self {
            Token::Single { text, .. } => text,
            Token::Alternatives { texts, .. } => texts.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Length of the canonical spelling in characters.
    pub fn char_len(&self) -> usize {
        self.canonical().chars().count()
    }

    /// Every spelling this token accepts.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Token::Single { text, .. } => std::slice::from_ref(text),
            Token::Alternatives { texts, .. } => texts,
        };
        slice.iter().map(String::as_str)
    }

    /// Whether `text` is one of this token's spellings.
    pub fn accepts(&self, text: &str) -> bool {
        self.spellings().any(|s| s == text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Single { text, .. } => f.write_str(text),
            Token::Alternatives { texts, .. } => write!(f, "{{{}}}", texts.join("|")),
        }
    }
}

/// A token sequence with the position of the query point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub tokens: Vec<Token>,
    /// Index of the token holding the query point, `None` when empty.
    pub marked_index: Option<usize>,
    /// Offset of the query point inside the marked token's normalized text.
    pub char_offset: usize,
}

impl Context {
    /// A context without a query point, used for the target side.
    pub fn unmarked(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            marked_index: None,
            char_offset: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The marked token, if any.
    pub fn marked(&self) -> Option<&Token> {
        self.marked_index.and_then(|idx| self.tokens.get(idx))
    }

    /// Canonical spellings joined by single spaces.
    pub fn render(&self) -> String {
        self.tokens
            .iter()
            .map(Token::canonical)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
