use serde::{Deserialize, Serialize};

/// One extracted comment and the declaration it documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRecord {
    /// Normalized comment body (delimiters and decoration stripped)
    pub text: String,

    /// First line of the comment (1-indexed)
    pub start_line: usize,

    /// Last line of the comment (1-indexed, inclusive)
    pub end_line: usize,

    /// Byte column of the opening delimiter (1-indexed)
    pub column: usize,

    /// Name of the declaration the comment is bound to
    pub associated_symbol: Option<String>,

    /// What kind of declaration `associated_symbol` names
    pub symbol_kind: Option<SymbolKind>,

    /// Symbol named in a gtk-doc style header line (`name:`), if any
    #[serde(default)]
    pub declared_name: Option<String>,

    /// Comment style
    pub kind: CommentKind,

    /// Comment exactly as written, delimiters included
    pub raw: String,

    /// The comment ran into end of file without its closing delimiter
    #[serde(default)]
    pub truncated: bool,

    /// Source file path
    pub filename: String,
}

impl CommentRecord {
    /// Get the number of lines in this comment
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if comment covers a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Check if the comment is bound to a declaration
    #[must_use]
    pub const fn is_associated(&self) -> bool {
        self.associated_symbol.is_some()
    }

    /// Check if this is a doc comment (`/** */` or `///`)
    #[must_use]
    pub fn is_doc(&self) -> bool {
        self.kind == CommentKind::Doc
    }

    /// Bound symbol name, or the empty string when unassociated
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.associated_symbol.as_deref().unwrap_or_default()
    }
}

/// Lexical style of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum CommentKind {
    /// `// ...`, possibly several merged lines
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */` or `/// ...`
    Doc,
}

impl CommentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Block => "block",
            Self::Doc => "doc",
        }
    }
}

/// Lexical category of a bound declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum SymbolKind {
    /// Function prototype or definition
    Function,
    /// `#define NAME(args)`
    FunctionMacro,
    /// `#define NAME`
    Macro,
    /// Top-level macro invocation such as `G_DEFINE_TYPE (...)`
    MacroCall,
    /// `typedef ... Name;`
    Typedef,
    /// `typedef ret (*Name) (...);`
    Callback,
    /// `ret (*name) (...)` variable or member
    FunctionPointer,
    /// `struct Tag`
    Struct,
    /// `union Tag`
    Union,
    /// `enum Tag`
    Enum,
    /// Member of an enum body
    EnumConstant,
    /// Member of a struct or union body
    Field,
    /// File-scope variable
    Variable,
}

impl SymbolKind {
    /// Check if this kind comes from the preprocessor
    #[must_use]
    pub const fn is_macro(self) -> bool {
        matches!(self, Self::Macro | Self::FunctionMacro | Self::MacroCall)
    }

    /// Check if this kind names a type
    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::Typedef | Self::Callback | Self::Struct | Self::Union | Self::Enum
        )
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::FunctionMacro => "function-macro",
            Self::Macro => "macro",
            Self::MacroCall => "macro-call",
            Self::Typedef => "typedef",
            Self::Callback => "callback",
            Self::FunctionPointer => "function-pointer",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::EnumConstant => "enum-constant",
            Self::Field => "field",
            Self::Variable => "variable",
        }
    }
}

/// A `#define` found while scanning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,

    /// Parameter names for function-like macros (`...` kept verbatim)
    pub parameters: Option<Vec<String>>,

    /// Replacement list with continuations joined and comments removed
    pub body: String,

    /// Line of the `#` (1-indexed)
    pub line: usize,

    pub filename: String,
}

impl MacroDefinition {
    #[must_use]
    pub const fn is_function_like(&self) -> bool {
        self.parameters.is_some()
    }
}

/// Everything extracted from one file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanOutput {
    /// Comments in order of appearance
    pub comments: Vec<CommentRecord>,

    /// Macro definitions in order of appearance
    pub macros: Vec<MacroDefinition>,
}
