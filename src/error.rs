use thiserror::Error;

/// Compact byte-span used by the lexer and parser diagnostics.
///
/// Spans are `u32` byte offsets into a single source file; inputs larger than
/// 4GiB are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        let s = if start > u32::MAX as usize {
            u32::MAX
        } else {
            start as u32
        };
        let e = if end > u32::MAX as usize {
            u32::MAX
        } else {
            end as u32
        };
        Self { start: s, end: e }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        let p = if pos > u32::MAX as usize {
            u32::MAX
        } else {
            pos as u32
        };
        Self { start: p, end: p }
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Syntax error produced by the lexer or parser.
///
/// `location` is pre-rendered as `file:line:column` because the position
/// index that produced it is session-local and does not travel with the
/// error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub location: String,
    pub message: String,
}

impl ParseError {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Everything that can go wrong between source text and wire tree.
///
/// The fatal decode kinds (`UnsupportedToken`, `UnknownNodeKind`,
/// `Malformed`) signal corrupt or version-incompatible wire input and are
/// surfaced to the caller with no retry; a best-effort position miss is not
/// an error and degrades to the no-position sentinel instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unsupported token string {0:?}")]
    UnsupportedToken(String),

    #[error("unknown node kind {0:?}")]
    UnknownNodeKind(String),

    #[error("malformed wire tree: {0}")]
    Malformed(String),

    #[error("invalid wire JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand used by the decoder when a required field is missing or has
    /// the wrong shape.
    pub(crate) fn malformed(context: &str, detail: impl std::fmt::Display) -> Self {
        Error::Malformed(format!("{context}: {detail}"))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
