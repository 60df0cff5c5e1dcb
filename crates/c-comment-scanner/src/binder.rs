//! Comment-to-declaration association
//!
//! Purely lexical: a forward walk over the token stream keeps a stack of open
//! braces classified as aggregate, enum, linkage or body scopes. Each comment
//! is then bound by reading the tokens after it (or, for a trailing comment,
//! the tokens before it on the same line) until the first token that settles
//! which name is being declared.

use crate::comment::RawComment;
use crate::config::ScannerConfig;
use crate::directive::Directive;
use crate::token::{Token, TokenKind};
use crate::types::SymbolKind;

/// The name a comment documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub name: String,
    pub kind: SymbolKind,
}

impl Declaration {
    fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Where a token sits relative to the enclosing braces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// File scope, or inside `extern "C" { }`
    File,
    /// Struct or union body
    Aggregate,
    /// Enum body
    Enum,
    /// Function body, initializer, or any brace nested in one
    Body,
}

/// What has been seen since the last statement boundary
#[derive(Debug, Default)]
struct Statement {
    call: bool,
    assign: bool,
    aggregate: Option<Context>,
    linkage: bool,
}

pub(crate) struct Binder<'a> {
    source: &'a [u8],
    tokens: &'a [Token],
    comments: &'a [RawComment],
    directives: &'a [Directive],
    config: &'a ScannerConfig,
}

impl<'a> Binder<'a> {
    pub fn new(
        source: &'a [u8],
        tokens: &'a [Token],
        comments: &'a [RawComment],
        directives: &'a [Directive],
        config: &'a ScannerConfig,
    ) -> Self {
        Self {
            source,
            tokens,
            comments,
            directives,
            config,
        }
    }

    /// Bind every comment; the result is indexed like the comment list
    pub fn bind_all(&self) -> Vec<Option<Declaration>> {
        let contexts = self.contexts();
        let mut bindings = vec![None; self.comments.len()];

        for (pos, token) in self.tokens.iter().enumerate() {
            if let TokenKind::Comment(ci) = token.kind {
                let binding = self.bind_comment(ci, pos, &contexts);
                log::trace!(
                    "comment at line {} -> {:?}",
                    self.comments[ci].start_line,
                    binding
                );
                bindings[ci] = binding;
            }
        }

        bindings
    }

    fn bind_comment(&self, ci: usize, pos: usize, contexts: &[Context]) -> Option<Declaration> {
        let comment = &self.comments[ci];

        if comment.trailing {
            if !self.config.bind_trailing_comments {
                return None;
            }
            // Inside a body only a comment right after the opening brace binds
            if contexts[pos] == Context::Body {
                let prev = self.tokens[..pos].iter().rposition(|t| !t.is_comment());
                let opens_body = prev.is_some_and(|j| {
                    self.tokens[j].is_punct(b'{') && contexts[j] != Context::Body
                });
                if !opens_body {
                    return None;
                }
            }
            let start = self.line_start(pos, comment.start_line);
            if contexts[start] == Context::Body {
                return None;
            }
            return self.find_declaration(&self.tokens[start..pos], contexts[start]);
        }

        if contexts[pos] == Context::Body {
            return None;
        }

        let next = self.tokens.get(pos + 1)?;
        if next.is_comment() {
            return None;
        }

        let gap = next.line.saturating_sub(comment.end_line + 1);
        if gap > self.config.max_blank_lines {
            return None;
        }

        self.find_declaration(&self.tokens[pos + 1..], contexts[pos + 1])
    }

    /// First token index of the run ending at `pos` that ends on `line`
    fn line_start(&self, pos: usize, line: usize) -> usize {
        let mut start = pos;
        while start > 0 && self.tokens[start - 1].end_line >= line {
            start -= 1;
        }
        start
    }

    /// Scope in effect before each token
    fn contexts(&self) -> Vec<Context> {
        let mut contexts = Vec::with_capacity(self.tokens.len());
        let mut stack: Vec<Context> = Vec::new();
        let mut statement = Statement::default();
        let mut prev: Option<&Token> = None;

        for token in self.tokens {
            contexts.push(stack.last().copied().unwrap_or(Context::File));

            match token.kind {
                TokenKind::Comment(_) => continue,
                TokenKind::Word => match token.bytes(self.source) {
                    b"struct" | b"union" => {
                        statement.aggregate = Some(Context::Aggregate);
                        statement.call = false;
                    }
                    b"enum" => {
                        statement.aggregate = Some(Context::Enum);
                        statement.call = false;
                    }
                    _ => {}
                },
                TokenKind::Literal => {
                    if prev.is_some_and(|p| p.bytes(self.source) == b"extern") {
                        statement.linkage = true;
                    }
                }
                TokenKind::Punct(b'(') => {
                    if prev.is_some_and(|p| self.is_name(p)) {
                        statement.call = true;
                    }
                }
                TokenKind::Punct(b'=') => statement.assign = true,
                TokenKind::Punct(b'{') => {
                    let outer = stack.last().copied();
                    let scope = if outer == Some(Context::Body) {
                        Context::Body
                    } else if statement.linkage {
                        Context::File
                    } else if statement.assign || statement.call {
                        Context::Body
                    } else {
                        statement.aggregate.unwrap_or(Context::Body)
                    };
                    stack.push(scope);
                    statement = Statement::default();
                }
                TokenKind::Punct(b'}') => {
                    stack.pop();
                    statement = Statement::default();
                }
                TokenKind::Punct(b';') => statement = Statement::default(),
                _ => {}
            }

            prev = Some(token);
        }

        contexts
    }

    /// Read a declaration from the start of `tokens`
    fn find_declaration(&self, tokens: &[Token], context: Context) -> Option<Declaration> {
        let first = tokens.iter().position(|t| !t.is_comment())?;
        if let TokenKind::Directive(d) = tokens[first].kind {
            return self.directives[d]
                .declaration()
                .map(|(name, kind)| Declaration::new(name, kind));
        }

        let mut reader = Reader {
            context,
            last_word: None,
            tag: None,
            aggregate: None,
            is_typedef: false,
            had_body: false,
            candidate: None,
        };

        let mut prev_end: Option<usize> = None;
        let mut i = first;
        while i < tokens.len() {
            let token = &tokens[i];

            if let TokenKind::Comment(ci) = token.kind {
                // An own-line comment documents what follows it, not this declaration
                if !self.comments[ci].trailing {
                    return reader.candidate;
                }
                i += 1;
                continue;
            }
            if prev_end.is_some_and(|end| token.line > end + 1 + self.config.max_blank_lines) {
                return reader.candidate;
            }
            prev_end = Some(token.end_line);

            match token.kind {
                TokenKind::Comment(_) | TokenKind::Directive(_) => {}
                TokenKind::Literal | TokenKind::Number => reader.last_word = None,
                TokenKind::Word => {
                    let word = token.bytes(self.source);
                    match word {
                        b"typedef" => reader.is_typedef = true,
                        b"struct" | b"union" | b"enum" => {
                            reader.aggregate = Some(match word {
                                b"struct" => SymbolKind::Struct,
                                b"union" => SymbolKind::Union,
                                _ => SymbolKind::Enum,
                            });
                            reader.tag = tokens[i + 1..]
                                .iter()
                                .find(|t| !t.is_comment())
                                .filter(|t| self.is_name(t))
                                .map(|t| self.word(t));
                        }
                        _ => {}
                    }
                    reader.last_word = self.is_name(token).then(|| self.word(token));
                }
                TokenKind::Punct(b'(') => {
                    let close = matching(tokens, i, b'(', b')');
                    let inner_end = close.unwrap_or(tokens.len());

                    if let Some(name) = self.pointer_name(&tokens[i + 1..inner_end]) {
                        let params_follow = close
                            .and_then(|c| tokens[c + 1..].iter().find(|t| !t.is_comment()))
                            .is_some_and(|t| t.is_punct(b'('));
                        if params_follow {
                            let kind = if reader.is_typedef {
                                SymbolKind::Callback
                            } else {
                                SymbolKind::FunctionPointer
                            };
                            return Some(Declaration::new(name, kind));
                        }

                        // `(*name)[N]` and friends: a plain declarator in parens
                        let Some(close) = close else {
                            return reader.at_end();
                        };
                        reader.last_word = Some(name);
                        prev_end = Some(tokens[close].end_line);
                        i = close + 1;
                        continue;
                    }

                    if let Some(name) = reader.last_word.take() {
                        let kind = if is_all_caps(&name) {
                            SymbolKind::MacroCall
                        } else {
                            SymbolKind::Function
                        };
                        if reader
                            .candidate
                            .as_ref()
                            .map_or(true, |c| c.kind == SymbolKind::MacroCall)
                        {
                            reader.candidate = Some(Declaration::new(name, kind));
                        }
                    }

                    let Some(close) = close else {
                        return reader.at_end();
                    };

                    // A macro call followed by a blank line stands alone
                    if reader
                        .candidate
                        .as_ref()
                        .is_some_and(|c| c.kind == SymbolKind::MacroCall)
                    {
                        let after = tokens[close + 1..].iter().find(|t| !t.is_comment());
                        if after.map_or(true, |t| t.line > tokens[close].end_line + 1) {
                            return reader.candidate;
                        }
                    }

                    prev_end = Some(tokens[close].end_line);
                    i = close;
                }
                TokenKind::Punct(b'[' | b'=' | b',' | b':') => return reader.settle(),
                TokenKind::Punct(b';') => return reader.at_semicolon(),
                TokenKind::Punct(b'{') => {
                    if reader.candidate.is_some() {
                        return reader.candidate;
                    }
                    let Some(kind) = reader.aggregate else {
                        return None;
                    };
                    if let (Some(tag), false) = (&reader.tag, reader.is_typedef) {
                        return Some(Declaration::new(tag.clone(), kind));
                    }
                    let close = matching(tokens, i, b'{', b'}')?;
                    reader.had_body = true;
                    reader.last_word = None;
                    prev_end = Some(tokens[close].end_line);
                    i = close;
                }
                TokenKind::Punct(b'}') => {
                    return if context == Context::Enum {
                        reader.settle()
                    } else {
                        reader.candidate
                    };
                }
                TokenKind::Punct(b')' | b']') => return reader.candidate,
                TokenKind::Punct(_) => reader.last_word = None,
            }
            i += 1;
        }

        reader.at_end()
    }

    /// Name declared by `( * name ... )`, given the tokens inside the parens
    fn pointer_name(&self, inner: &[Token]) -> Option<String> {
        let first = inner.iter().find(|t| !t.is_comment())?;
        if !(first.is_punct(b'*') || first.is_punct(b'^')) {
            return None;
        }

        let mut depth = 0usize;
        for token in inner {
            match token.kind {
                TokenKind::Punct(b'(' | b'[') => depth += 1,
                TokenKind::Punct(b')' | b']') => depth = depth.saturating_sub(1),
                TokenKind::Word if depth == 0 && self.is_name(token) => {
                    return Some(self.word(token));
                }
                _ => {}
            }
        }
        None
    }

    fn is_name(&self, token: &Token) -> bool {
        token.kind == TokenKind::Word && !is_keyword(token.bytes(self.source))
    }

    fn word(&self, token: &Token) -> String {
        token.text(self.source).into_owned()
    }
}

/// Declaration reading state
struct Reader {
    context: Context,
    /// Most recent non-keyword identifier
    last_word: Option<String>,
    /// Identifier right after `struct`/`union`/`enum`
    tag: Option<String>,
    aggregate: Option<SymbolKind>,
    is_typedef: bool,
    /// An aggregate body was skipped
    had_body: bool,
    candidate: Option<Declaration>,
}

impl Reader {
    /// A plain declarator ends here
    fn settle(self) -> Option<Declaration> {
        if self.has_firm_candidate() {
            return self.candidate;
        }
        self.named().or(self.candidate)
    }

    fn at_semicolon(self) -> Option<Declaration> {
        if self.has_firm_candidate() {
            return self.candidate;
        }

        let Some(word) = &self.last_word else {
            return self.candidate;
        };
        if let Some(kind) = self.aggregate {
            if self.is_typedef && self.had_body {
                return Some(Declaration::new(word.clone(), kind));
            }
            if !self.is_typedef && !self.had_body && self.tag.as_ref() == Some(word) {
                return Some(Declaration::new(word.clone(), kind));
            }
        }
        self.named()
    }

    fn at_end(self) -> Option<Declaration> {
        if self.context == Context::Enum {
            self.settle()
        } else {
            self.candidate
        }
    }

    /// A candidate that later tokens cannot replace
    fn has_firm_candidate(&self) -> bool {
        self.candidate
            .as_ref()
            .is_some_and(|c| c.kind != SymbolKind::MacroCall)
    }

    fn named(&self) -> Option<Declaration> {
        let name = self.last_word.clone()?;
        let kind = if self.is_typedef {
            SymbolKind::Typedef
        } else {
            match self.context {
                Context::Aggregate => SymbolKind::Field,
                Context::Enum => SymbolKind::EnumConstant,
                Context::File | Context::Body => SymbolKind::Variable,
            }
        };
        Some(Declaration::new(name, kind))
    }
}

/// Index of the bracket closing the one at `open_at`
fn matching(tokens: &[Token], open_at: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open_at) {
        if token.is_punct(open) {
            depth += 1;
        } else if token.is_punct(close) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Identifiers that never name a declaration
fn is_keyword(word: &[u8]) -> bool {
    matches!(
        word,
        b"auto"
            | b"break"
            | b"case"
            | b"char"
            | b"const"
            | b"continue"
            | b"default"
            | b"do"
            | b"double"
            | b"else"
            | b"enum"
            | b"extern"
            | b"float"
            | b"for"
            | b"goto"
            | b"if"
            | b"inline"
            | b"int"
            | b"long"
            | b"register"
            | b"restrict"
            | b"return"
            | b"short"
            | b"signed"
            | b"sizeof"
            | b"static"
            | b"struct"
            | b"switch"
            | b"typedef"
            | b"union"
            | b"unsigned"
            | b"void"
            | b"volatile"
            | b"while"
            | b"bool"
            | b"_Bool"
            | b"_Complex"
            | b"_Imaginary"
            | b"_Alignas"
            | b"_Alignof"
            | b"_Atomic"
            | b"_Noreturn"
            | b"_Static_assert"
            | b"_Thread_local"
            | b"asm"
            | b"typeof"
            | b"__asm__"
            | b"__attribute__"
            | b"__attribute"
            | b"__declspec"
            | b"__extension__"
            | b"__inline"
            | b"__inline__"
            | b"__restrict"
            | b"__restrict__"
            | b"__const"
            | b"__volatile__"
            | b"__typeof__"
            | b"__cdecl"
            | b"__stdcall"
    )
}

/// `G_DEFINE_TYPE`, `DEPRECATED_FOR`: uppercase letters and no lowercase
fn is_all_caps(name: &str) -> bool {
    name.bytes().any(|b| b.is_ascii_uppercase()) && !name.bytes().any(|b| b.is_ascii_lowercase())
}
