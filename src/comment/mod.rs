// WHY: Comment model shared by extraction, conversion and replacement
// Leaves first: lexer -> style -> merger -> codec, then extraction ties them to symbols

pub mod codec;
pub mod extractor;
pub mod lexer;
pub mod merger;
pub mod style;
pub mod symbols;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::range::Range;

// Re-export core types
pub use codec::{extract, render};
pub use extractor::{CommentExtractor, SourceCommentExtractor};
pub use lexer::{find_comments, RawComment};
pub use merger::{find_comment_groups, merge_comments, CommentGroup};
pub use style::{resolve_style, CommentStyle, StyleCategory};
pub use symbols::{DeclarationScanner, Language, SymbolProvider};

/// Symbol kinds reported for C sources
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CSymbol {
    Function,
    Struct,
    Union,
    Enum,
    EnumConstant,
    Field,
    Variable,
    Typedef,
    Macro,
}

/// Symbol kinds reported for C++ sources
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CppSymbol {
    Function,
    Method,
    Constructor,
    Destructor,
    FunctionTemplate,
    Class,
    ClassTemplate,
    Struct,
    Union,
    Enum,
    EnumConstant,
    Field,
    Variable,
    Namespace,
    TypeAlias,
    Macro,
}

/// Kind of the symbol a comment documents, per source language
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    C(CSymbol),
    Cpp(CppSymbol),
}

impl SymbolType {
    /// Function, method, constructor or function template
    pub fn is_function_like(self) -> bool {
        match self {
            SymbolType::C(kind) => matches!(kind, CSymbol::Function),
            SymbolType::Cpp(kind) => matches!(
                kind,
                CppSymbol::Function
                    | CppSymbol::Method
                    | CppSymbol::Constructor
                    | CppSymbol::FunctionTemplate
            ),
        }
    }

    /// Field, variable or enum constant; documented after the declaration
    pub fn is_member_like(self) -> bool {
        match self {
            SymbolType::C(kind) => matches!(
                kind,
                CSymbol::Field | CSymbol::Variable | CSymbol::EnumConstant
            ),
            SymbolType::Cpp(kind) => matches!(
                kind,
                CppSymbol::Field | CppSymbol::Variable | CppSymbol::EnumConstant
            ),
        }
    }
}

/// Declaration a comment is attached to, as reported by a [`SymbolProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub text: String,
    pub range: Range,
    pub symbol_type: SymbolType,
    /// Leading whitespace of the symbol's line; empty if the symbol does not start its line
    pub indentation: String,
}

/// One recognized comment of a source buffer
///
/// Built once per extraction pass and consumed by exactly one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
    range: Range,
    style: CommentStyle,
    symbol: Option<Symbol>,
    indentation: String,
    /// Non-whitespace text follows the comment on its last line
    code_after: bool,
}

impl Comment {
    /// Build a comment from a merged group of `source`
    pub fn from_group(source: &str, group: &CommentGroup, symbol: Option<Symbol>) -> Self {
        let range = group.span();
        let indentation = match &symbol {
            Some(symbol) => symbol.indentation.clone(),
            None => line_indentation(source, range.start()).to_string(),
        };
        Self {
            text: group.text(source).to_string(),
            range,
            style: group.style,
            symbol,
            indentation,
            code_after: code_follows(source, range.end()),
        }
    }

    /// Build a comment from parts; `text` must equal the buffer slice at `range`
    pub fn new(
        text: impl Into<String>,
        range: Range,
        style: CommentStyle,
        symbol: Option<Symbol>,
        indentation: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            range,
            style,
            symbol,
            indentation: indentation.into(),
            code_after: false,
        }
    }

    /// Mark whether code follows the comment on its last line
    pub fn with_code_after(mut self, code_after: bool) -> Self {
        self.code_after = code_after;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn style(&self) -> CommentStyle {
        self.style
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    pub fn symbol_type(&self) -> Option<SymbolType> {
        self.symbol.as_ref().map(|symbol| symbol.symbol_type)
    }

    pub fn indentation(&self) -> &str {
        &self.indentation
    }

    /// Comment placed after the declaration it documents
    pub fn is_trailing(&self) -> bool {
        self.symbol
            .as_ref()
            .is_some_and(|symbol| symbol.range.end() <= self.range.start())
    }

    /// Code continues after the comment on the same line, as in `f(/* x */ 1);`
    pub fn has_code_after(&self) -> bool {
        self.code_after
    }

    /// Trailing comment on a field, variable or enum constant
    pub fn is_member_position(&self) -> bool {
        self.is_trailing()
            && self
                .symbol_type()
                .is_some_and(SymbolType::is_member_like)
    }

    /// Delimiter-free content of this comment
    pub fn content(&self) -> EngineResult<String> {
        codec::extract(&self.text, self.style)
    }
}

/// Whether anything but whitespace sits between `offset` and the end of its line
fn code_follows(source: &str, offset: usize) -> bool {
    let rest = &source[offset..];
    let line = rest.find('\n').map_or(rest, |i| &rest[..i]);
    !line.trim().is_empty()
}

/// Leading whitespace of the line holding `offset`, or empty if other text
/// precedes `offset` on that line
pub fn line_indentation(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..offset];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}
