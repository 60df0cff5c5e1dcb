use crate::binder::Binder;
use crate::comment::{collect_comments, declared_name};
use crate::config::ScannerConfig;
use crate::directive::collect_directives;
use crate::error::{Result, ScannerError};
use crate::lexer::Lexer;
use crate::token::tokenize;
use crate::types::{CommentKind, CommentRecord, ScanOutput};
use std::path::Path;

/// Main scanner interface for extracting comments from C sources
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    /// Create a new scanner with configuration
    pub fn new(config: ScannerConfig) -> Result<Self> {
        config.validate().map_err(ScannerError::invalid_config)?;
        Ok(Self { config })
    }

    /// Scan a file and return its comments in order of appearance
    pub fn scan_file(&self, path: impl AsRef<Path>) -> Result<Vec<CommentRecord>> {
        Ok(self.extract_file(path)?.comments)
    }

    /// Scan a file, returning comments and macro definitions
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<ScanOutput> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| ScannerError::file_access(path, e))?;
        let filename = path.to_string_lossy();

        Ok(self.extract_bytes(&content, &filename))
    }

    /// Scan in-memory source; `filename` only tags the records
    #[must_use]
    pub fn scan_bytes(&self, content: &[u8], filename: &str) -> Vec<CommentRecord> {
        self.extract_bytes(content, filename).comments
    }

    #[must_use]
    pub fn scan_str(&self, content: &str, filename: &str) -> Vec<CommentRecord> {
        self.scan_bytes(content.as_bytes(), filename)
    }

    /// Scan in-memory source, returning comments and macro definitions
    #[must_use]
    pub fn extract_bytes(&self, content: &[u8], filename: &str) -> ScanOutput {
        let spans = Lexer::new(content).tokenize();
        let comments = collect_comments(content, &spans, self.config.merge_line_comments);
        let directives = collect_directives(content, &spans);
        let tokens = tokenize(content, &spans, &comments, &directives);
        let bindings =
            Binder::new(content, &tokens, &comments, &directives, &self.config).bind_all();

        let mut records = Vec::with_capacity(comments.len());
        for (comment, binding) in comments.iter().zip(bindings) {
            if self.config.doc_comments_only && comment.kind != CommentKind::Doc {
                continue;
            }

            let text = comment.text(content, &spans);
            let truncated = !comment.terminated;
            if truncated {
                log::warn!(
                    "{}:{}: unterminated comment runs to end of file",
                    filename,
                    comment.start_line
                );
            }

            let declared_name = if comment.kind == CommentKind::Doc {
                declared_name(&text)
            } else {
                None
            };
            let (associated_symbol, symbol_kind) = match binding {
                Some(decl) => (Some(decl.name), Some(decl.kind)),
                None => (None, None),
            };

            records.push(CommentRecord {
                text,
                start_line: comment.start_line,
                end_line: comment.end_line,
                column: comment.column,
                associated_symbol,
                symbol_kind,
                declared_name,
                kind: comment.kind,
                raw: comment.raw(content),
                truncated,
                filename: filename.to_string(),
            });
        }

        let macros = directives
            .iter()
            .filter_map(|d| d.to_macro(filename))
            .collect();

        log::debug!("{}: {}", filename, Self::get_stats(&records));

        ScanOutput {
            comments: records,
            macros,
        }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Get statistics about scan results
    #[must_use]
    pub fn get_stats(records: &[CommentRecord]) -> ScanStats {
        let associated = records.iter().filter(|r| r.is_associated()).count();
        ScanStats {
            total_comments: records.len(),
            associated,
            unassociated: records.len() - associated,
            doc_comments: records.iter().filter(|r| r.is_doc()).count(),
            truncated: records.iter().filter(|r| r.truncated).count(),
        }
    }
}

/// Statistics about scan results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub total_comments: usize,
    pub associated: usize,
    pub unassociated: usize,
    pub doc_comments: usize,
    pub truncated: usize,
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Comments: {} | Associated: {} | Unassociated: {} | Doc: {} | Truncated: {}",
            self.total_comments,
            self.associated,
            self.unassociated,
            self.doc_comments,
            self.truncated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;
    use pretty_assertions::assert_eq;

    const HEADER: &str = r#"#ifndef TEST_GREETER_H
#define TEST_GREETER_H

/**
 * TEST_GREETER_VERSION:
 *
 * The version of the greeter API.
 */
#define TEST_GREETER_VERSION 2

/**
 * TestGreeterLanguage:
 * @TEST_GREETER_ENGLISH: Hello
 * @TEST_GREETER_FRENCH: Bonjour
 */
typedef enum {
  TEST_GREETER_ENGLISH,
  TEST_GREETER_FRENCH
} TestGreeterLanguage;

/* internal helper, not documented */
int _test_greeter_private (void);

/**
 * test_greeter_greet:
 * @greeter: a greeter
 * @language: (allow-none): the language
 *
 * Returns: %TRUE on success
 */
gboolean test_greeter_greet (TestGreeter *greeter, TestGreeterLanguage language);

#endif
"#;

    #[test]
    fn test_scan_str() {
        let records = Scanner::default().scan_str(HEADER, "test-greeter.h");
        let summary: Vec<(usize, &str, Option<SymbolKind>)> = records
            .iter()
            .map(|r| (r.start_line, r.symbol(), r.symbol_kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                (4, "TEST_GREETER_VERSION", Some(SymbolKind::Macro)),
                (11, "TestGreeterLanguage", Some(SymbolKind::Enum)),
                (21, "_test_greeter_private", Some(SymbolKind::Function)),
                (24, "test_greeter_greet", Some(SymbolKind::Function)),
            ]
        );
        assert!(records.iter().all(|r| r.filename == "test-greeter.h"));
    }

    #[test]
    fn test_declared_names() {
        let records = Scanner::default().scan_str(HEADER, "test-greeter.h");
        let names: Vec<Option<&str>> = records.iter().map(|r| r.declared_name.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                Some("TEST_GREETER_VERSION"),
                Some("TestGreeterLanguage"),
                None,
                Some("test_greeter_greet"),
            ]
        );
    }

    #[test]
    fn test_doc_comments_only() {
        let scanner = Scanner::new(ScannerConfig::gtk_doc()).unwrap();
        let records = scanner.scan_str(HEADER, "test-greeter.h");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(CommentRecord::is_doc));
    }

    #[test]
    fn test_filtered_comment_still_breaks_adjacency() {
        let scanner = Scanner::new(ScannerConfig::gtk_doc()).unwrap();
        let records = scanner.scan_str("/** doc */\n/* plain */\nint x;\n", "a.c");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].associated_symbol, None);
    }

    #[test]
    fn test_macros_are_collected() {
        let output = Scanner::default().extract_bytes(HEADER.as_bytes(), "test-greeter.h");
        let names: Vec<&str> = output.macros.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["TEST_GREETER_H", "TEST_GREETER_VERSION"]);
        assert_eq!(output.macros[1].body, "2");
        assert_eq!(output.macros[1].line, 9);
    }

    #[test]
    fn test_literal_immunity() {
        let records = Scanner::default().scan_str(r#"const char *s = "// not a comment";"#, "a.c");
        assert!(records.is_empty());
    }

    #[test]
    fn test_unterminated_comment() {
        let records = Scanner::default().scan_str("/* never closed", "a.c");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "never closed");
        assert!(records[0].truncated);
        assert_eq!(records[0].associated_symbol, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScannerConfig {
            max_blank_lines: 1000,
            ..Default::default()
        };
        assert!(matches!(
            Scanner::new(config),
            Err(ScannerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_scan_stats() {
        let records = Scanner::default().scan_str(HEADER, "test-greeter.h");
        let stats = Scanner::get_stats(&records);
        assert_eq!(
            stats,
            ScanStats {
                total_comments: 4,
                associated: 4,
                unassociated: 0,
                doc_comments: 3,
                truncated: 0,
            }
        );
        assert_eq!(
            stats.to_string(),
            "Comments: 4 | Associated: 4 | Unassociated: 0 | Doc: 3 | Truncated: 0"
        );
    }

    #[test]
    fn test_scanner_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scanner>();
    }
}
