//! Preprocessor directive grouping
//!
//! A directive may be split into several [`SpanKind::PreprocessorLine`] spans
//! by comments. This module stitches the fragments back together and reads
//! just enough of the result to name `#define`d macros.

use crate::lexer::is_ident_byte;
use crate::span::{Span, SpanKind};
use crate::types::{MacroDefinition, SymbolKind};

/// One logical preprocessor directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive {
    /// Directive name (`define`, `include`, `ifdef`, ...), empty for a bare `#`
    pub keyword: String,
    pub line: usize,
    pub end_line: usize,
    /// Span index of the first fragment
    pub first_span: usize,
    /// Macro name for `#define`
    pub name: Option<String>,
    pub parameters: Option<Vec<String>>,
    pub body: String,
}

impl Directive {
    /// The declaration a comment directly above this directive documents
    pub fn declaration(&self) -> Option<(String, SymbolKind)> {
        if self.keyword != "define" {
            return None;
        }
        let name = self.name.clone()?;
        let kind = if self.parameters.is_some() {
            SymbolKind::FunctionMacro
        } else {
            SymbolKind::Macro
        };
        Some((name, kind))
    }

    pub fn to_macro(&self, filename: &str) -> Option<MacroDefinition> {
        Some(MacroDefinition {
            name: self.name.clone()?,
            parameters: self.parameters.clone(),
            body: self.body.clone(),
            line: self.line,
            filename: filename.to_string(),
        })
    }
}

/// Collect every directive in source order
pub(crate) fn collect_directives(source: &[u8], spans: &[Span]) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut idx = 0;

    while idx < spans.len() {
        if spans[idx].kind != SpanKind::PreprocessorLine {
            idx += 1;
            continue;
        }

        let first = idx;
        let mut last = idx;
        let mut text: Vec<u8> = Vec::new();

        // Fragments separated only by comments belong to the same directive
        while idx < spans.len() {
            let span = &spans[idx];
            match span.kind {
                SpanKind::PreprocessorLine => {
                    text.extend_from_slice(span.bytes(source));
                    last = idx;
                }
                SpanKind::BlockComment | SpanKind::LineComment => text.push(b' '),
                _ => break,
            }
            idx += 1;
        }

        let end_line = spans[last].end_line(source);
        directives.push(parse(&splice(&text), spans[first].line, end_line, first));
    }

    directives
}

/// Remove `\`-newline continuations
fn splice(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i] == b'\\' {
            match (text.get(i + 1), text.get(i + 2)) {
                (Some(b'\n'), _) => {
                    i += 2;
                    continue;
                }
                (Some(b'\r'), Some(b'\n')) => {
                    i += 3;
                    continue;
                }
                _ => {}
            }
        }
        out.push(text[i]);
        i += 1;
    }
    out
}

fn parse(text: &[u8], line: usize, end_line: usize, first_span: usize) -> Directive {
    let mut cursor = Cursor { text, pos: 0 };
    cursor.eat(b'#');
    cursor.skip_blanks();
    let keyword = cursor.ident();

    let mut directive = Directive {
        keyword: lossy(keyword),
        line,
        end_line,
        first_span,
        name: None,
        parameters: None,
        body: String::new(),
    };

    if keyword != b"define" {
        return directive;
    }

    cursor.skip_blanks();
    let name = cursor.ident();
    if name.is_empty() || name[0].is_ascii_digit() {
        return directive;
    }
    directive.name = Some(lossy(name));

    // Function-like only when `(` touches the name
    if cursor.peek() == Some(b'(') {
        cursor.pos += 1;
        let start = cursor.pos;
        while let Some(b) = cursor.peek() {
            if b == b')' {
                break;
            }
            cursor.pos += 1;
        }
        let params = &text[start..cursor.pos];
        cursor.eat(b')');

        let params: Vec<String> = String::from_utf8_lossy(params)
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        directive.parameters = Some(params);
    }

    directive.body = String::from_utf8_lossy(&text[cursor.pos..])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    directive
}

struct Cursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) {
        if self.peek() == Some(byte) {
            self.pos += 1;
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | 0x0b | 0x0c)) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
