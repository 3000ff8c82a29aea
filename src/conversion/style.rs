use tracing::debug;

use super::{ConversionResult, Converter};
use crate::comment::{render, Comment, CommentStyle, StyleCategory};

/// Re-renders comments in one target style
#[derive(Debug, Clone, Copy)]
pub struct StyleConverter {
    target: CommentStyle,
}

impl StyleConverter {
    pub fn new(target: CommentStyle) -> Self {
        Self { target }
    }

    pub fn target(&self) -> CommentStyle {
        self.target
    }
}

impl Converter for StyleConverter {
    fn convert(&self, comment: &Comment) -> ConversionResult {
        let content = match comment.content() {
            Ok(content) => content,
            Err(e) => return ConversionResult::error(e.to_string()),
        };

        if comment.style() == self.target {
            return ConversionResult::empty(format!("already {}", self.target));
        }
        if let Some(end) = self.target.end_delimiter() {
            if content.contains(end) {
                return ConversionResult::empty(format!("content contains `{end}`"));
            }
        }
        // a line comment would swallow the code after it
        if self.target.category() == StyleCategory::Line && comment.has_code_after() {
            return ConversionResult::unsupported("code follows the comment on its line");
        }
        if comment.is_trailing() && !self.target.is_member() {
            return ConversionResult::unsupported("trailing comment needs a member style");
        }
        if self.target.is_member() && !comment.is_member_position() {
            return ConversionResult::unsupported(format!(
                "{} only documents a preceding member",
                self.target
            ));
        }
        if self.target.is_member()
            && self.target.category() == StyleCategory::BlockInline
            && content.contains('\n')
        {
            return ConversionResult::unsupported(format!("multi-line content for {}", self.target));
        }

        let rendered = render(&content, self.target, comment.indentation());
        if rendered == comment.text() {
            return ConversionResult::empty("unchanged");
        }
        debug!(
            "Converting {} at {} from {} to {}",
            match self.target.category() {
                StyleCategory::Line => "line comment",
                StyleCategory::Block => "block comment",
                StyleCategory::BlockInline => "inline comment",
            },
            comment.range(),
            comment.style(),
            self.target
        );
        ConversionResult::Present(rendered)
    }

    fn name(&self) -> &'static str {
        "normalize"
    }
}
