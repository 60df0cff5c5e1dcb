//! Coarse token stream for the association heuristic
//!
//! Code spans are split into words and single-byte punctuators. Literals,
//! directives and logical comments each collapse into one token so the binder
//! can step over them without looking inside.

use crate::comment::RawComment;
use crate::directive::Directive;
use crate::lexer::is_ident_byte;
use crate::span::{Span, SpanKind};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or keyword
    Word,
    Number,
    Punct(u8),
    /// String or char literal
    Literal,
    /// Index into the directive list
    Directive(usize),
    /// Index into the comment list
    Comment(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub end_line: usize,
}

impl Token {
    pub fn bytes<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start..self.end]
    }

    pub fn text<'a>(&self, source: &'a [u8]) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes(source))
    }

    pub const fn is_punct(&self, byte: u8) -> bool {
        matches!(self.kind, TokenKind::Punct(b) if b == byte)
    }

    pub const fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_))
    }
}

/// Build the token stream. `comments` and `directives` must be in source order.
pub(crate) fn tokenize(
    source: &[u8],
    spans: &[Span],
    comments: &[RawComment],
    directives: &[Directive],
) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut next_comment = 0;
    let mut next_directive = 0;

    for (idx, span) in spans.iter().enumerate() {
        match span.kind {
            SpanKind::Code => split_code(source, span, &mut tokens),
            SpanKind::StringLiteral | SpanKind::CharLiteral => tokens.push(Token {
                kind: TokenKind::Literal,
                start: span.start,
                end: span.end,
                line: span.line,
                end_line: span.end_line(source),
            }),
            SpanKind::PreprocessorLine => {
                // Later fragments of the same directive produce nothing
                if let Some(d) = directives.get(next_directive).filter(|d| d.first_span == idx) {
                    tokens.push(Token {
                        kind: TokenKind::Directive(next_directive),
                        start: span.start,
                        end: span.end,
                        line: d.line,
                        end_line: d.end_line,
                    });
                    next_directive += 1;
                }
            }
            SpanKind::LineComment | SpanKind::BlockComment => {
                if let Some(c) = comments.get(next_comment).filter(|c| c.first_span == idx) {
                    tokens.push(Token {
                        kind: TokenKind::Comment(next_comment),
                        start: c.start,
                        end: c.end,
                        line: c.start_line,
                        end_line: c.end_line,
                    });
                    next_comment += 1;
                }
            }
        }
    }

    tokens
}

fn split_code(source: &[u8], span: &Span, tokens: &mut Vec<Token>) {
    let mut line = span.line;
    let mut i = span.start;

    while i < span.end {
        let b = source[i];
        if b == b'\n' {
            line += 1;
            i += 1;
        } else if b.is_ascii_whitespace() || b == b'\\' || b == 0x0b {
            i += 1;
        } else if is_ident_byte(b) {
            let start = i;
            while i < span.end && is_ident_byte(source[i]) {
                i += 1;
            }
            let kind = if b.is_ascii_digit() {
                TokenKind::Number
            } else {
                TokenKind::Word
            };
            tokens.push(Token {
                kind,
                start,
                end: i,
                line,
                end_line: line,
            });
        } else {
            tokens.push(Token {
                kind: TokenKind::Punct(b),
                start: i,
                end: i + 1,
                line,
                end_line: line,
            });
            i += 1;
        }
    }
}
