//! # C Comment Scanner
//!
//! Fast extraction of documentation comments from C sources, with each
//! comment bound to the declaration it documents.
//!
//! ## Philosophy
//!
//! No C front end is involved. The scanner reads raw bytes once and relies on
//! purely lexical heuristics, so it copes with unpreprocessed headers, macro
//! soup and code that would not compile:
//! - Comment delimiters inside string and char literals are never comments
//! - Unterminated comments are truncated at end of file, never fatal
//! - Ambiguous comments stay unassociated instead of guessing wildly
//!
//! ## Architecture
//!
//! ```text
//! Source bytes
//!     │
//!     ├──> Lexer → Span[] (code, comments, literals, directives)
//!     │
//!     ├──> Comment grouping → logical comments (merged `//` runs)
//!     │
//!     ├──> Directive grouping → #define names and macro bodies
//!     │
//!     ├──> Binder over coarse tokens
//!     │    ├─> Scope walk (aggregate / enum / body braces)
//!     │    └─> Declaration reading after (or before) each comment
//!     │
//!     └──> CommentRecord[] in order of appearance
//! ```
//!
//! ## Example
//!
//! ```rust
//! use c_comment_scanner::Scanner;
//!
//! let code = "/** Adds two numbers. */\nint add(int a, int b);\n";
//!
//! let records = Scanner::default().scan_str(code, "math.h");
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].text, "Adds two numbers.");
//! assert_eq!(records[0].associated_symbol.as_deref(), Some("add"));
//! ```

mod binder;
mod comment;
mod config;
mod directive;
mod error;
mod lexer;
mod scanner;
mod span;
mod token;
mod types;

pub use config::{ScannerConfig, MAX_BLANK_LINE_TOLERANCE};
pub use error::{Result, ScannerError};
pub use lexer::Lexer;
pub use scanner::{ScanStats, Scanner};
pub use span::{Span, SpanKind};
pub use types::{CommentKind, CommentRecord, MacroDefinition, ScanOutput, SymbolKind};

use std::path::Path;

/// Scan one file with the default configuration
///
/// Returns every comment in order of appearance, or
/// [`ScannerError::FileAccess`] when the file cannot be read.
pub fn scan(path: impl AsRef<Path>) -> Result<Vec<CommentRecord>> {
    Scanner::default().scan_file(path)
}
