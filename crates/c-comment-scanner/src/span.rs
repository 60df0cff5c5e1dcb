use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Lexical classification of a contiguous region of source bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    /// Ordinary code, including whitespace and newlines
    Code,
    /// `// ...` up to (not including) the terminating newline
    LineComment,
    /// `/* ... */`, including both delimiters
    BlockComment,
    /// `"..."`, including both quotes
    StringLiteral,
    /// `'...'`, including both quotes
    CharLiteral,
    /// A preprocessor directive up to (not including) its terminating newline.
    /// Comments inside a directive split it into several spans.
    PreprocessorLine,
}

impl SpanKind {
    /// Check if this span holds a comment
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::LineComment => "line-comment",
            Self::BlockComment => "block-comment",
            Self::StringLiteral => "string",
            Self::CharLiteral => "char",
            Self::PreprocessorLine => "preprocessor",
        }
    }
}

/// A classified byte range of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,

    /// Byte offset of the first byte
    pub start: usize,

    /// Byte offset one past the last byte
    pub end: usize,

    /// Line of the first byte (1-indexed)
    pub line: usize,

    /// Byte column of the first byte (1-indexed)
    pub column: usize,

    /// False when end of input or an unescaped newline cut the region short
    pub terminated: bool,
}

impl Span {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Slice this span out of the source it was produced from
    #[must_use]
    pub fn bytes<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start..self.end]
    }

    /// Number of newlines inside the span
    #[must_use]
    pub fn newlines(&self, source: &[u8]) -> usize {
        self.bytes(source).iter().filter(|&&b| b == b'\n').count()
    }

    /// Line of the last byte (1-indexed)
    #[must_use]
    pub fn end_line(&self, source: &[u8]) -> usize {
        let trailing_newline = usize::from(self.bytes(source).last() == Some(&b'\n'));
        self.line + self.newlines(source) - trailing_newline
    }
}
