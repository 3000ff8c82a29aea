use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Structural shape of a comment's delimiters
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
    /// `// ...` up to end of line
    Line,
    /// `/* ... */` spanning more than one line
    Block,
    /// `/* ... */` closed on the line it opened
    BlockInline,
}

/// A named comment convention
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    CLine,
    QtLine,
    CppLine,
    QtLineMember,
    CppLineMember,
    CBlock,
    QtBlock,
    JavadocBlock,
    QtBlockMember,
    JavadocBlockMember,
    CInline,
    QtInline,
    JavadocInline,
    QtInlineMember,
    JavadocInlineMember,
}

/// Every style in declaration order
pub const ALL_STYLES: [CommentStyle; 15] = [
    CommentStyle::CLine,
    CommentStyle::QtLine,
    CommentStyle::CppLine,
    CommentStyle::QtLineMember,
    CommentStyle::CppLineMember,
    CommentStyle::CBlock,
    CommentStyle::QtBlock,
    CommentStyle::JavadocBlock,
    CommentStyle::QtBlockMember,
    CommentStyle::JavadocBlockMember,
    CommentStyle::CInline,
    CommentStyle::QtInline,
    CommentStyle::JavadocInline,
    CommentStyle::QtInlineMember,
    CommentStyle::JavadocInlineMember,
];

/// Resolution order per category: most specific first
const LINE_RESOLUTION: [CommentStyle; 5] = [
    CommentStyle::CppLineMember,
    CommentStyle::QtLineMember,
    CommentStyle::CppLine,
    CommentStyle::QtLine,
    CommentStyle::CLine,
];

const BLOCK_RESOLUTION: [CommentStyle; 5] = [
    CommentStyle::JavadocBlockMember,
    CommentStyle::QtBlockMember,
    CommentStyle::JavadocBlock,
    CommentStyle::QtBlock,
    CommentStyle::CBlock,
];

const INLINE_RESOLUTION: [CommentStyle; 5] = [
    CommentStyle::JavadocInlineMember,
    CommentStyle::QtInlineMember,
    CommentStyle::JavadocInline,
    CommentStyle::QtInline,
    CommentStyle::CInline,
];

impl StyleCategory {
    /// Least specific style of the category; every other style extends its delimiter
    pub fn base_style(self) -> CommentStyle {
        match self {
            StyleCategory::Line => CommentStyle::CLine,
            StyleCategory::Block => CommentStyle::CBlock,
            StyleCategory::BlockInline => CommentStyle::CInline,
        }
    }

    /// Styles of this category, most specific first
    pub fn resolution_order(self) -> &'static [CommentStyle] {
        match self {
            StyleCategory::Line => &LINE_RESOLUTION,
            StyleCategory::Block => &BLOCK_RESOLUTION,
            StyleCategory::BlockInline => &INLINE_RESOLUTION,
        }
    }

    /// Whether adjacent comments of this category read as one unit
    pub fn is_mergeable(self) -> bool {
        match self {
            StyleCategory::Line | StyleCategory::BlockInline => true,
            StyleCategory::Block => false,
        }
    }
}

impl CommentStyle {
    pub fn category(self) -> StyleCategory {
        use CommentStyle::*;
        match self {
            CLine | QtLine | CppLine | QtLineMember | CppLineMember => StyleCategory::Line,
            CBlock | QtBlock | JavadocBlock | QtBlockMember | JavadocBlockMember => {
                StyleCategory::Block
            }
            CInline | QtInline | JavadocInline | QtInlineMember | JavadocInlineMember => {
                StyleCategory::BlockInline
            }
        }
    }

    pub fn start_delimiter(self) -> &'static str {
        use CommentStyle::*;
        match self {
            CLine => "//",
            QtLine => "//!",
            CppLine => "///",
            QtLineMember => "//!<",
            CppLineMember => "///<",
            CBlock | CInline => "/*",
            QtBlock | QtInline => "/*!",
            JavadocBlock | JavadocInline => "/**",
            QtBlockMember | QtInlineMember => "/*!<",
            JavadocBlockMember | JavadocInlineMember => "/**<",
        }
    }

    /// Closing delimiter; absent for line comments
    pub fn end_delimiter(self) -> Option<&'static str> {
        match self.category() {
            StyleCategory::Line => None,
            StyleCategory::Block | StyleCategory::BlockInline => Some("*/"),
        }
    }

    /// Marker repeated on continuation lines of a block comment
    pub fn decoration_prefix(self) -> &'static str {
        match self.category() {
            StyleCategory::Block => "*",
            StyleCategory::Line | StyleCategory::BlockInline => "",
        }
    }

    /// Conventionally placed after a field, variable or enum constant
    pub fn is_member(self) -> bool {
        use CommentStyle::*;
        match self {
            QtLineMember | CppLineMember | QtBlockMember | JavadocBlockMember
            | QtInlineMember | JavadocInlineMember => true,
            CLine | QtLine | CppLine | CBlock | QtBlock | JavadocBlock | CInline | QtInline
            | JavadocInline => false,
        }
    }

    /// Already recognized by doxygen as documentation
    pub fn is_doxygen(self) -> bool {
        use CommentStyle::*;
        match self {
            CLine | CBlock | CInline => false,
            QtLine | CppLine | QtLineMember | CppLineMember | QtBlock | JavadocBlock
            | QtBlockMember | JavadocBlockMember | QtInline | JavadocInline | QtInlineMember
            | JavadocInlineMember => true,
        }
    }

    /// Rank within the category; 0 is the category's base style
    pub fn specificity(self) -> u8 {
        use CommentStyle::*;
        match self {
            CLine | CBlock | CInline => 0,
            QtLine | CppLine | QtBlock | JavadocBlock | QtInline | JavadocInline => 1,
            QtLineMember | CppLineMember | QtBlockMember | JavadocBlockMember | QtInlineMember
            | JavadocInlineMember => 2,
        }
    }

    /// Character that turns this style's opener into a banner (`////`, `/***`)
    fn banner_char(self) -> Option<u8> {
        use CommentStyle::*;
        match self {
            CppLine => Some(b'/'),
            JavadocBlock | JavadocInline => Some(b'*'),
            CLine | QtLine | QtLineMember | CppLineMember | CBlock | QtBlock | QtBlockMember
            | JavadocBlockMember | CInline | QtInline | QtInlineMember | JavadocInlineMember => {
                None
            }
        }
    }

    /// Whether `text` opens with this style's delimiters
    pub fn matches(self, text: &str) -> bool {
        let start = self.start_delimiter();
        if !text.starts_with(start) {
            return false;
        }
        if let Some(banner) = self.banner_char() {
            if text.as_bytes().get(start.len()) == Some(&banner) {
                return false;
            }
        }
        match self.end_delimiter() {
            // `/**/` is an empty C comment, not a javadoc opener
            Some(end) if self.specificity() > 0 && text.ends_with(end) => {
                text.len() >= start.len() + end.len()
            }
            _ => true,
        }
    }

    /// Least specific common style of two members of one group
    ///
    /// The lower-ranked style wins when its delimiter prefixes the other's;
    /// otherwise the group degrades to the category's base style.
    pub fn join(self, other: CommentStyle) -> CommentStyle {
        if self == other {
            return self;
        }
        let (low, high) = if self.specificity() <= other.specificity() {
            (self, other)
        } else {
            (other, self)
        };
        if low.category() == high.category()
            && low.specificity() < high.specificity()
            && high.start_delimiter().starts_with(low.start_delimiter())
        {
            low
        } else {
            self.category().base_style()
        }
    }

    pub fn name(self) -> &'static str {
        use CommentStyle::*;
        match self {
            CLine => "c_line",
            QtLine => "qt_line",
            CppLine => "cpp_line",
            QtLineMember => "qt_line_member",
            CppLineMember => "cpp_line_member",
            CBlock => "c_block",
            QtBlock => "qt_block",
            JavadocBlock => "javadoc_block",
            QtBlockMember => "qt_block_member",
            JavadocBlockMember => "javadoc_block_member",
            CInline => "c_inline",
            QtInline => "qt_inline",
            JavadocInline => "javadoc_inline",
            QtInlineMember => "qt_inline_member",
            JavadocInlineMember => "javadoc_inline_member",
        }
    }
}

/// Resolve the concrete style of a comment whose category the lexer already knows
pub fn resolve_style(text: &str, category: StyleCategory) -> CommentStyle {
    category
        .resolution_order()
        .iter()
        .copied()
        .find(|style| style.matches(text))
        .unwrap_or_else(|| category.base_style())
}

impl fmt::Display for CommentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommentStyle {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ALL_STYLES
            .iter()
            .copied()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| EngineError::config(format!("unknown comment style: {s}")))
    }
}
