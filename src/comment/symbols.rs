// WHY: Symbol metadata normally comes from a C/C++ front end; the scanner here is a
// line-level stand-in so the engine runs without one. It never parses grammar.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{line_indentation, CSymbol, CppSymbol, Symbol, SymbolType};
use crate::range::Range;

/// Source language, decides which symbol variant set is reported
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    C,
    Cpp,
}

/// Tokens that only appear in C++ sources
const CPP_MARKERS: &[&str] = &["class ", "namespace ", "template<", "template <", "::", "public:", "private:"];

impl Language {
    /// Language implied by a file extension; headers count as C
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "c" | "h" => Some(Language::C),
            "cc" | "cpp" | "cxx" | "c++" | "hh" | "hpp" | "hxx" | "h++" | "ipp" | "inl" | "tpp" => {
                Some(Language::Cpp)
            }
            _ => None,
        }
    }

    /// Guess from content when no extension is available
    pub fn detect(source: &str) -> Self {
        if CPP_MARKERS.iter().any(|marker| source.contains(marker)) {
            Language::Cpp
        } else {
            Language::C
        }
    }
}

/// Supplies the declaration a comment documents
pub trait SymbolProvider: Send + Sync {
    /// Symbol attached to the comment at `comment` in `source`, if any
    fn symbol_for(&self, source: &str, comment: Range) -> Option<Symbol>;
}

/// Keyword-driven declaration finder
///
/// A comment sharing its line with preceding code documents that code
/// (member position). Otherwise it documents the declaration that follows,
/// up to the first `;`, `{` or blank line.
#[derive(Debug, Clone, Default)]
pub struct DeclarationScanner {
    /// Fixed language, or `None` to detect per buffer
    pub language: Option<Language>,
}

impl DeclarationScanner {
    pub fn new(language: Option<Language>) -> Self {
        Self { language }
    }

    fn language_for(&self, source: &str) -> Language {
        self.language.unwrap_or_else(|| Language::detect(source))
    }

    fn trailing_symbol(&self, source: &str, comment: Range, language: Language) -> Option<Symbol> {
        let line_start = source[..comment.start()].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &source[line_start..comment.start()];
        let code = prefix.trim_end();
        let leading = code.len() - code.trim_start().len();
        let code = code.trim_start();
        if code.is_empty() || code == "}" || code == "};" {
            return None;
        }
        let start = line_start + leading;
        let range = Range::spanning(start, start + code.len());
        let indentation = line_indentation(source, start).to_string();
        let symbol_type = match enum_constant(code) {
            Some(_) => enum_constant_type(language),
            None => classify(code, language, !indentation.is_empty()),
        };
        Some(Symbol {
            text: code.to_string(),
            range,
            symbol_type,
            indentation,
        })
    }

    fn following_symbol(&self, source: &str, comment: Range, language: Language) -> Option<Symbol> {
        let rest = &source[comment.end()..];
        let skipped = rest.len() - rest.trim_start().len();
        let gap = &rest[..skipped];
        // more than one blank line detaches the comment from what follows
        if gap.matches('\n').count() > 2 {
            return None;
        }
        let start = comment.end() + skipped;
        let body = &source[start..];
        if body.is_empty() || body.starts_with("/*") || body.starts_with("//") || body.starts_with('}') {
            return None;
        }
        if body.starts_with('#') && !body.starts_with("#define") {
            return None;
        }

        let end = declaration_end(body);
        let text = body[..end].trim_end();
        if text.is_empty() {
            return None;
        }
        let indentation = line_indentation(source, start).to_string();
        let (text, symbol_type) = match enum_constant(text) {
            Some(constant) => (constant, enum_constant_type(language)),
            None => (text, classify(text, language, !indentation.is_empty())),
        };
        Some(Symbol {
            text: text.to_string(),
            range: Range::spanning(start, start + text.len()),
            symbol_type,
            indentation,
        })
    }
}

impl SymbolProvider for DeclarationScanner {
    fn symbol_for(&self, source: &str, comment: Range) -> Option<Symbol> {
        let language = self.language_for(source);
        let symbol = self
            .trailing_symbol(source, comment, language)
            .or_else(|| self.following_symbol(source, comment, language));
        if let Some(ref symbol) = symbol {
            debug!("Comment {} documents {:?} `{}`", comment, symbol.symbol_type, symbol.text);
        }
        symbol
    }
}

/// Byte length of the declaration at the head of `body`
fn declaration_end(body: &str) -> usize {
    let mut previous_newline = false;
    for (i, ch) in body.char_indices() {
        match ch {
            ';' => return i + 1,
            '{' => return i,
            '\n' if body.starts_with("#define") => return i,
            '\n' if previous_newline => return i,
            '\n' => previous_newline = true,
            c if c.is_whitespace() => {}
            _ => previous_newline = false,
        }
    }
    body.len()
}

/// First line of `text` when it reads as an enumerator (`NAME [= value],`)
fn enum_constant(text: &str) -> Option<&str> {
    let line = text.lines().next()?.trim_end();
    let head = line.strip_suffix(',').unwrap_or(line);
    if !line.ends_with(',') && line != text.trim_end() {
        return None;
    }
    let name = head.split('=').next()?.trim();
    let is_identifier = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    let rest_ok = head.split_once('=').map_or(true, |(_, value)| !value.contains(';'));
    (is_identifier && rest_ok && !line.ends_with(';')).then_some(line)
}

fn enum_constant_type(language: Language) -> SymbolType {
    match language {
        Language::C => SymbolType::C(CSymbol::EnumConstant),
        Language::Cpp => SymbolType::Cpp(CppSymbol::EnumConstant),
    }
}

/// Classify a declaration by keywords and shape
pub fn classify(declaration: &str, language: Language, nested: bool) -> SymbolType {
    let text = declaration.trim();
    if text.starts_with("#define") {
        return by_language(language, CSymbol::Macro, CppSymbol::Macro);
    }

    let (is_template, text) = match text.strip_prefix("template") {
        Some(rest) if rest.trim_start().starts_with('<') => (true, skip_template_header(rest)),
        _ => (false, text),
    };

    // everything before an initializer or body decides the shape
    let head = text.split(|c: char| c == '=' || c == '{').next().unwrap_or(text);
    let first = head.split_whitespace().next().unwrap_or_default();

    if let Some(paren) = head.find('(') {
        if !matches!(first, "typedef" | "using") {
            return classify_function(&head[..paren], language, nested, is_template);
        }
    }

    match first {
        "typedef" => by_language(language, CSymbol::Typedef, CppSymbol::TypeAlias),
        "using" => by_language(language, CSymbol::Typedef, CppSymbol::TypeAlias),
        "namespace" => by_language(language, CSymbol::Variable, CppSymbol::Namespace),
        "class" if is_template => SymbolType::Cpp(CppSymbol::ClassTemplate),
        "struct" if is_template => SymbolType::Cpp(CppSymbol::ClassTemplate),
        "class" => by_language(language, CSymbol::Struct, CppSymbol::Class),
        "struct" => by_language(language, CSymbol::Struct, CppSymbol::Struct),
        "union" => by_language(language, CSymbol::Union, CppSymbol::Union),
        "enum" => by_language(language, CSymbol::Enum, CppSymbol::Enum),
        _ if nested => by_language(language, CSymbol::Field, CppSymbol::Field),
        _ => by_language(language, CSymbol::Variable, CppSymbol::Variable),
    }
}

fn classify_function(head: &str, language: Language, nested: bool, is_template: bool) -> SymbolType {
    if language == Language::C {
        return SymbolType::C(CSymbol::Function);
    }
    if is_template {
        return SymbolType::Cpp(CppSymbol::FunctionTemplate);
    }

    let tokens: Vec<&str> = head
        .split_whitespace()
        .filter(|token| !SPECIFIERS.contains(token))
        .collect();
    let name = tokens.last().copied().unwrap_or_default();
    let unqualified = name.rsplit("::").next().unwrap_or(name);

    if unqualified.starts_with('~') {
        return SymbolType::Cpp(CppSymbol::Destructor);
    }
    if let Some((scope, _)) = name.rsplit_once("::") {
        let owner = scope.rsplit("::").next().unwrap_or(scope);
        return if owner == unqualified {
            SymbolType::Cpp(CppSymbol::Constructor)
        } else {
            SymbolType::Cpp(CppSymbol::Method)
        };
    }
    if nested {
        // no return type inside a class body means a constructor
        return if tokens.len() == 1 {
            SymbolType::Cpp(CppSymbol::Constructor)
        } else {
            SymbolType::Cpp(CppSymbol::Method)
        };
    }
    SymbolType::Cpp(CppSymbol::Function)
}

const SPECIFIERS: &[&str] = &["explicit", "inline", "virtual", "static", "constexpr", "extern", "friend"];

fn by_language(language: Language, c: CSymbol, cpp: CppSymbol) -> SymbolType {
    match language {
        Language::C => SymbolType::C(c),
        Language::Cpp => SymbolType::Cpp(cpp),
    }
}

/// Text after a balanced `<...>` template parameter list
fn skip_template_header(rest: &str) -> &str {
    let mut depth = 0usize;
    for (i, ch) in rest.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return rest[i + 1..].trim_start();
                }
            }
            _ => {}
        }
    }
    rest.trim_start()
}
