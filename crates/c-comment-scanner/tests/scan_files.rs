use c_comment_scanner::{
    scan, CommentKind, CommentRecord, Lexer, Scanner, ScannerConfig, ScannerError, SymbolKind,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn write_source(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();
    (temp, path)
}

fn scan_source(content: &str) -> Vec<CommentRecord> {
    let (_temp, path) = write_source("test.c", content.as_bytes());
    scan(&path).expect("scan failed")
}

#[test]
fn binds_doc_comment_to_function() {
    let records = scan_source("/** Adds two numbers. */\nint add(int a, int b);\n");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Adds two numbers.");
    assert_eq!(records[0].start_line, 1);
    assert_eq!(records[0].associated_symbol.as_deref(), Some("add"));
    assert_eq!(records[0].symbol_kind, Some(SymbolKind::Function));
    assert_eq!(records[0].kind, CommentKind::Doc);
}

#[test]
fn orphan_comment_has_no_symbol() {
    let records = scan_source("/* orphan */");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "orphan");
    assert_eq!(records[0].associated_symbol, None);
}

#[test]
fn unterminated_comment_is_not_an_error() {
    let records = scan_source("/* never closed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "never closed");
    assert!(records[0].truncated);
    assert_eq!(records[0].associated_symbol, None);
}

#[test]
fn consecutive_line_comments_merge() {
    let records = scan_source("// line one\n// line two\nvoid f(void);\n");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "line one\nline two");
    assert_eq!(records[0].associated_symbol.as_deref(), Some("f"));
    assert_eq!((records[0].start_line, records[0].end_line), (1, 2));
}

#[test]
fn comment_markers_in_literals_are_ignored() {
    assert!(scan_source(r#"const char *s = "// not a comment";"#).is_empty());
    assert!(scan_source("char a = '/', b = '*';\nconst char *t = \"/* nope */\";\n").is_empty());
}

#[test]
fn missing_file_is_file_access_error() {
    let err = scan("/nonexistent/path.c").unwrap_err();
    assert!(matches!(err, ScannerError::FileAccess { .. }), "got: {err}");
    assert_eq!(
        err.path().map(|p| p.to_string_lossy().into_owned()),
        Some("/nonexistent/path.c".to_string())
    );
}

#[test]
fn directory_is_file_access_error() {
    let temp = tempdir().unwrap();
    assert!(matches!(
        scan(temp.path()),
        Err(ScannerError::FileAccess { .. })
    ));
}

#[test]
fn scanning_twice_gives_identical_records() {
    let (_temp, path) = write_source(
        "twice.c",
        b"/* a */\nint a;\n// b\n// c\nstatic void b (void) { /* inner */ }\n",
    );
    let first = scan(&path).unwrap();
    let second = scan(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn filename_is_echoed() {
    let (_temp, path) = write_source("echo.h", b"/* x */\n");
    let records = scan(&path).unwrap();
    assert_eq!(records[0].filename, path.to_string_lossy());
}

#[test]
fn non_utf8_bytes_are_tolerated() {
    let (_temp, path) = write_source("latin1.c", b"/* caf\xe9 */\nint caf;\n");
    let records = scan(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].associated_symbol.as_deref(), Some("caf"));
    assert!(records[0].text.starts_with("caf"));
}

#[test]
fn spans_reproduce_file_bytes() {
    let content = b"#include <stdio.h>\n/* a */ int x = '\\''; // t \\\n more\nchar *s = \"\\\"/*\";\n";
    let spans = Lexer::new(content).tokenize();
    let rebuilt: Vec<u8> = spans
        .iter()
        .flat_map(|s| s.bytes(content).iter().copied())
        .collect();
    assert_eq!(rebuilt, content.to_vec());
}

const GREETER_C: &str = r#"/**
 * SECTION:test-greeter
 * @title: TestGreeter
 *
 * A greeter that says hello.
 */

#include "test-greeter.h"

/**
 * TestGreeter::greeted:
 * @greeter: the greeter
 *
 * Emitted after a greeting.
 */

G_DEFINE_TYPE (TestGreeter, test_greeter, G_TYPE_OBJECT)

/**
 * test_greeter_greet:
 * @self: a #TestGreeter
 *
 * Greets.
 *
 * Returns: (transfer none): the greeting
 */
const char *
test_greeter_greet (TestGreeter *self)
{
  /* pick the language */
  return "hello"; /* always english */
}

/** The maximum number of greetings. */
static int max_greetings = 10;

/**
 * TestGreeterPoint:
 * @x: abscissa
 * @y: ordinate
 */
typedef struct {
  int x; /* the x */
  int y; /**< the y */
} TestGreeterPoint;
"#;

#[test]
fn gtk_doc_style_source() {
    let (_temp, path) = write_source("test-greeter.c", GREETER_C.as_bytes());
    let records = scan(&path).unwrap();

    let summary: Vec<(usize, Option<&str>, Option<SymbolKind>, Option<&str>)> = records
        .iter()
        .map(|r| {
            (
                r.start_line,
                r.associated_symbol.as_deref(),
                r.symbol_kind,
                r.declared_name.as_deref(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            (1, None, None, Some("SECTION:test-greeter")),
            (
                10,
                Some("G_DEFINE_TYPE"),
                Some(SymbolKind::MacroCall),
                Some("TestGreeter::greeted")
            ),
            (
                19,
                Some("test_greeter_greet"),
                Some(SymbolKind::Function),
                Some("test_greeter_greet")
            ),
            (30, None, None, None),
            (31, None, None, None),
            (
                34,
                Some("max_greetings"),
                Some(SymbolKind::Variable),
                None
            ),
            (
                37,
                Some("TestGreeterPoint"),
                Some(SymbolKind::Struct),
                Some("TestGreeterPoint")
            ),
            (43, Some("x"), Some(SymbolKind::Field), None),
            (44, Some("y"), Some(SymbolKind::Field), None),
        ]
    );

    let doc = &records[2];
    assert_eq!(
        doc.text,
        "test_greeter_greet:\n@self: a #TestGreeter\n\nGreets.\n\nReturns: (transfer none): the greeting"
    );
    assert!(doc.raw.starts_with("/**\n * test_greeter_greet:"));
    assert!(doc.raw.ends_with("*/"));
    assert_eq!(doc.end_line, 26);

    assert_eq!(records[8].text, "the y");
    assert_eq!(records[8].kind, CommentKind::Doc);
}

#[test]
fn own_line_comments_and_blank_runs_end_a_declaration() {
    let records = scan_source(
        "/* begin decls */\nG_BEGIN_DECLS\n\n/** doc */\nvoid foo(void);\n\n/* section marker */\nFOO_EXPORT\n\n\n\n\nint bar;\n",
    );
    let bound: Vec<Option<&str>> = records
        .iter()
        .map(|r| r.associated_symbol.as_deref())
        .collect();
    assert_eq!(bound, vec![None, Some("foo"), None]);
}

#[test]
fn pointer_to_array_is_a_variable() {
    let records = scan_source("/* rows */\nint (*rows)[4];\n");
    assert_eq!(records[0].associated_symbol.as_deref(), Some("rows"));
    assert_eq!(records[0].symbol_kind, Some(SymbolKind::Variable));
}

#[test]
fn gtk_doc_preset_keeps_only_doc_comments() {
    let (_temp, path) = write_source("test-greeter.c", GREETER_C.as_bytes());
    let scanner = Scanner::new(ScannerConfig::gtk_doc()).unwrap();
    let records = scanner.scan_file(&path).unwrap();
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(CommentRecord::is_doc));
    // Trailing binding is off in this preset
    assert_eq!(records[5].associated_symbol, None);
}

#[test]
fn macros_are_extracted() {
    let (_temp, path) = write_source(
        "macros.h",
        b"/**\n * TEST_MAX:\n */\n#define TEST_MAX(a, b) \\\n    ((a) > (b) ? (a) : (b))\n#define TEST_ANSWER 42 /* the answer */\n",
    );
    let output = Scanner::default().extract_file(&path).unwrap();

    assert_eq!(output.macros.len(), 2);
    assert_eq!(output.macros[0].name, "TEST_MAX");
    assert_eq!(
        output.macros[0].parameters,
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(output.macros[0].body, "((a) > (b) ? (a) : (b))");
    assert_eq!(output.macros[1].parameters, None);
    assert_eq!(output.macros[1].body, "42");

    let bound: Vec<(&str, Option<SymbolKind>)> = output
        .comments
        .iter()
        .map(|r| (r.symbol(), r.symbol_kind))
        .collect();
    assert_eq!(
        bound,
        vec![
            ("TEST_MAX", Some(SymbolKind::FunctionMacro)),
            ("TEST_ANSWER", Some(SymbolKind::Macro)),
        ]
    );
}

#[test]
fn records_serialize_to_json() {
    let records = scan_source("/** Adds two numbers. */\nint add(int a, int b);\n");
    let value = serde_json::to_value(&records[0]).unwrap();

    assert_eq!(value["text"], "Adds two numbers.");
    assert_eq!(value["start_line"], 1);
    assert_eq!(value["associated_symbol"], "add");
    assert_eq!(value["symbol_kind"], "Function");
    assert_eq!(value["kind"], "Doc");
    assert_eq!(value["truncated"], false);

    let back: CommentRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, records[0]);
}
