//! Lexer (region classifier) for C source bytes
//!
//! Walks the input once, left to right, and cuts it into [`Span`]s. Only the
//! lexical surface needed to find comments reliably is modelled: literals,
//! comments, preprocessor lines and `\`-newline continuations. Everything else
//! is plain [`SpanKind::Code`].
//!
//! The concatenation of the produced spans is always the input itself.

use crate::span::{Span, SpanKind};

#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

/// Single-pass region classifier for C source
pub struct Lexer<'a> {
    input: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    /// Only blanks (or block comments) since the start of the logical line
    at_line_start: bool,
    in_directive: bool,
    /// Inside a numeric literal, where `'` is a digit separator
    in_number: bool,
    /// Start of the pending code or directive run
    plain: Mark,
    spans: Vec<Span>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over raw source bytes.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            in_directive: false,
            in_number: false,
            plain: Mark {
                pos: 0,
                line: 1,
                column: 1,
            },
            spans: Vec::new(),
        }
    }

    /// Classify the entire input
    pub fn tokenize(mut self) -> Vec<Span> {
        while let Some(byte) = self.peek() {
            match byte {
                b'/' if self.peek_ahead(1) == Some(b'/') => {
                    self.region(SpanKind::LineComment);
                }
                b'/' if self.peek_ahead(1) == Some(b'*') => {
                    self.region(SpanKind::BlockComment);
                }
                b'\'' if self.is_digit_separator() => {
                    self.advance();
                }
                b'"' | b'\'' if self.in_directive => {
                    // Quotes shield comment delimiters but stay part of the directive
                    self.skip_quoted(byte);
                    self.at_line_start = false;
                    self.in_number = false;
                }
                b'"' => self.region(SpanKind::StringLiteral),
                b'\'' => self.region(SpanKind::CharLiteral),
                b'#' if self.at_line_start && !self.in_directive => {
                    self.flush_plain();
                    self.in_directive = true;
                    self.at_line_start = false;
                    self.advance();
                }
                b'\n' => self.newline(),
                b'\\' if self.continuation_len() > 0 => {
                    self.in_number = false;
                    for _ in 0..self.continuation_len() {
                        self.advance();
                    }
                }
                _ => self.plain_byte(byte),
            }
        }

        self.flush_plain();
        self.spans
    }

    /// Lex one comment or literal region starting at the current byte
    fn region(&mut self, kind: SpanKind) {
        self.flush_plain();
        self.in_number = false;

        let start = self.mark();
        let terminated = match kind {
            SpanKind::LineComment => self.skip_line_comment(),
            SpanKind::BlockComment => self.skip_block_comment(),
            SpanKind::StringLiteral => self.skip_quoted(b'"'),
            SpanKind::CharLiteral => self.skip_quoted(b'\''),
            SpanKind::Code | SpanKind::PreprocessorLine => true,
        };

        self.spans.push(Span {
            kind,
            start: start.pos,
            end: self.position,
            line: start.line,
            column: start.column,
            terminated,
        });

        // Block comments count as whitespace for `#` detection
        if kind != SpanKind::BlockComment {
            self.at_line_start = false;
        }
        self.plain = self.mark();
    }

    /// Skip `// ...` up to the end of the (possibly continued) line
    fn skip_line_comment(&mut self) -> bool {
        self.advance(); // skip '/'
        self.advance(); // skip '/'

        while let Some(ch) = self.peek() {
            match ch {
                b'\n' => break,
                b'\\' if self.continuation_len() > 0 => {
                    for _ in 0..self.continuation_len() {
                        self.advance();
                    }
                }
                _ => self.advance(),
            }
        }
        true
    }

    /// Skip `/* ... */`; the first `*/` closes
    fn skip_block_comment(&mut self) -> bool {
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some(b'*') && self.peek_ahead(1) == Some(b'/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return true;
            }
            self.advance();
        }

        false
    }

    /// Skip a quoted literal; stops before an unescaped newline
    fn skip_quoted(&mut self, quote: u8) -> bool {
        self.advance(); // opening quote

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance();
                return true;
            }

            match ch {
                b'\n' => return false,
                b'\\' if self.continuation_len() > 0 => {
                    for _ in 0..self.continuation_len() {
                        self.advance();
                    }
                }
                b'\\' => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                _ => self.advance(),
            }
        }

        false
    }

    fn newline(&mut self) {
        if self.in_directive {
            // The directive ends before its newline
            self.flush_plain();
            self.in_directive = false;
        }
        self.in_number = false;
        self.advance();
        self.at_line_start = true;
    }

    fn plain_byte(&mut self, byte: u8) {
        let follows_ident = self
            .position
            .checked_sub(1)
            .and_then(|p| self.input.get(p))
            .is_some_and(|&b| is_ident_byte(b));

        if byte.is_ascii_digit() && !follows_ident {
            self.in_number = true;
        } else if self.in_number && !(is_ident_byte(byte) || byte == b'.') {
            self.in_number = false;
        }

        if !matches!(byte, b' ' | b'\t' | b'\r' | 0x0b | 0x0c) {
            self.at_line_start = false;
        }

        self.advance();
    }

    fn is_digit_separator(&self) -> bool {
        self.in_number
            && self
                .peek_ahead(1)
                .is_some_and(|b| b.is_ascii_alphanumeric())
    }

    /// Length of a `\`-newline sequence at the current position, or 0
    fn continuation_len(&self) -> usize {
        if self.peek() != Some(b'\\') {
            return 0;
        }
        match (self.peek_ahead(1), self.peek_ahead(2)) {
            (Some(b'\n'), _) => 2,
            (Some(b'\r'), Some(b'\n')) => 3,
            _ => 0,
        }
    }

    /// Emit the pending code or directive run, if any
    fn flush_plain(&mut self) {
        if self.position > self.plain.pos {
            let kind = if self.in_directive {
                SpanKind::PreprocessorLine
            } else {
                SpanKind::Code
            };
            self.spans.push(Span {
                kind,
                start: self.plain.pos,
                end: self.position,
                line: self.plain.line,
                column: self.plain.column,
                terminated: true,
            });
        }
        self.plain = self.mark();
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) {
        if let Some(&ch) = self.input.get(self.position) {
            self.position += 1;
            if ch == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

/// Bytes that may appear inside an identifier (non-ASCII is passed through)
pub(crate) const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}
