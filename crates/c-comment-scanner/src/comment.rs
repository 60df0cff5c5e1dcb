//! Comment grouping and text normalization
//!
//! Turns comment spans into logical comments: adjacent own-line `//` comments
//! are merged, delimiters and `*` decoration are stripped, and gtk-doc style
//! header lines are recognized.

use crate::span::{Span, SpanKind};
use crate::types::CommentKind;
use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SECTION:\s*(\S+)\s*$").expect("valid section regex"));

static SYMBOL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*(?:::?[A-Za-z0-9_-]+|\.[A-Za-z0-9_]+)?)\s*:(?:\s*\(.*\))?\s*$")
        .expect("valid symbol header regex")
});

/// A logical comment: one block comment or a run of merged line comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawComment {
    pub kind: CommentKind,
    /// Byte range covering every span of the group
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub column: usize,
    /// Span indices (inclusive) of the first and last member
    pub first_span: usize,
    pub last_span: usize,
    pub terminated: bool,
    /// Code precedes the comment on its first line
    pub trailing: bool,
}

impl RawComment {
    /// Comment exactly as written
    pub fn raw(&self, source: &[u8]) -> String {
        String::from_utf8_lossy(&source[self.start..self.end]).into_owned()
    }

    /// Normalized comment body
    pub fn text(&self, source: &[u8], spans: &[Span]) -> String {
        let members = &spans[self.first_span..=self.last_span];
        let mut lines: Vec<String> = Vec::new();

        for span in members.iter().filter(|s| s.kind.is_comment()) {
            let body = String::from_utf8_lossy(span.bytes(source));
            match span.kind {
                SpanKind::BlockComment => block_lines(&body, span.terminated, &mut lines),
                // Each member of a merged run keeps its own opener
                _ => line_comment_lines(&body, comment_kind(body.as_bytes(), span.kind), &mut lines),
            }
        }

        finish(lines)
    }
}

/// Group comment spans into logical comments, in source order
pub(crate) fn collect_comments(
    source: &[u8],
    spans: &[Span],
    merge_line_comments: bool,
) -> Vec<RawComment> {
    let mut comments: Vec<RawComment> = Vec::new();

    for (idx, span) in spans.iter().enumerate() {
        if !span.kind.is_comment() {
            continue;
        }

        let trailing = code_precedes_on_line(source, spans, idx);

        if merge_line_comments && span.kind == SpanKind::LineComment && !trailing {
            if let Some(prev) = comments.last_mut() {
                if can_merge(source, spans, prev, idx) {
                    prev.end = span.end;
                    prev.end_line = span.end_line(source);
                    prev.last_span = idx;
                    continue;
                }
            }
        }

        comments.push(RawComment {
            kind: comment_kind(span.bytes(source), span.kind),
            start: span.start,
            end: span.end,
            start_line: span.line,
            end_line: span.end_line(source),
            column: span.column,
            first_span: idx,
            last_span: idx,
            terminated: span.terminated,
            trailing,
        });
    }

    comments
}

/// Symbol named by a gtk-doc header on the first line of a doc comment
pub(crate) fn declared_name(text: &str) -> Option<String> {
    let first = text.lines().next()?.trim();

    if let Some(caps) = SECTION_HEADER.captures(first) {
        return Some(format!("SECTION:{}", &caps[1]));
    }

    SYMBOL_HEADER
        .captures(first)
        .map(|caps| caps[1].to_string())
}

fn comment_kind(bytes: &[u8], kind: SpanKind) -> CommentKind {
    let third = bytes.get(2).copied();
    let fourth = bytes.get(3).copied();
    match kind {
        SpanKind::BlockComment if third == Some(b'*') && !matches!(fourth, Some(b'*' | b'/')) => {
            CommentKind::Doc
        }
        SpanKind::LineComment if third == Some(b'/') && fourth != Some(b'/') => CommentKind::Doc,
        SpanKind::LineComment => CommentKind::Line,
        _ => CommentKind::Block,
    }
}

/// `prev` ends with the line comment right above span `idx`, with nothing but
/// one newline between them
fn can_merge(source: &[u8], spans: &[Span], prev: &RawComment, idx: usize) -> bool {
    if prev.trailing || spans[prev.last_span].kind != SpanKind::LineComment {
        return false;
    }
    if idx != prev.last_span + 2 {
        return false;
    }

    let gap = &spans[prev.last_span + 1];
    gap.kind == SpanKind::Code
        && gap.newlines(source) == 1
        && gap.bytes(source).iter().all(|&b| is_blank(b) || b == b'\n')
}

fn code_precedes_on_line(source: &[u8], spans: &[Span], idx: usize) -> bool {
    for span in spans[..idx].iter().rev() {
        match span.kind {
            SpanKind::BlockComment => continue,
            SpanKind::LineComment => return false,
            SpanKind::Code => {
                let bytes = span.bytes(source);
                let (tail, has_newline) = match bytes.iter().rposition(|&b| b == b'\n') {
                    Some(pos) => (&bytes[pos + 1..], true),
                    None => (bytes, false),
                };
                if !tail.iter().all(|&b| is_blank(b)) {
                    return true;
                }
                if has_newline {
                    return false;
                }
            }
            SpanKind::StringLiteral | SpanKind::CharLiteral | SpanKind::PreprocessorLine => {
                return true
            }
        }
    }
    false
}

fn block_lines(body: &str, terminated: bool, out: &mut Vec<String>) {
    let mut inner = body.strip_prefix("/*").unwrap_or(body);
    if terminated {
        inner = inner.strip_suffix("*/").unwrap_or(inner);
    }
    // `/**` and the Doxygen member marker `/**<`
    let inner = match inner.strip_prefix('*') {
        Some(rest) => rest.strip_prefix('<').unwrap_or(rest),
        None => inner,
    };

    for (i, line) in inner.split('\n').enumerate() {
        if i == 0 {
            out.push(line.trim().to_string());
        } else {
            out.push(strip_decoration(line).trim_end().to_string());
        }
    }
}

fn line_comment_lines(body: &str, kind: CommentKind, out: &mut Vec<String>) {
    let opener = if kind == CommentKind::Doc { "///" } else { "//" };
    let inner = body
        .strip_prefix(opener)
        .or_else(|| body.strip_prefix("//"))
        .unwrap_or(body);
    let inner = if kind == CommentKind::Doc {
        inner.strip_prefix('<').unwrap_or(inner)
    } else {
        inner
    };
    let inner = inner.strip_prefix(' ').unwrap_or(inner);

    // A continued line comment spans several physical lines
    let mut parts = inner.split('\n').peekable();
    while let Some(part) = parts.next() {
        let part = part.trim_end();
        let part = if parts.peek().is_some() {
            part.strip_suffix('\\').unwrap_or(part).trim_end()
        } else {
            part
        };
        out.push(part.to_string());
    }
}

/// Drop one leading `*` (after indentation) and exactly one space after it
fn strip_decoration(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

fn finish(lines: Vec<String>) -> String {
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

const fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | 0x0b | 0x0c)
}
