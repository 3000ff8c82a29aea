use super::lexer::{find_comments, RawComment};
use super::style::{resolve_style, CommentStyle};
use crate::range::Range;

/// One logical comment: consecutive lexer results sharing a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// Member ranges in ascending order
    pub ranges: Vec<Range>,
    /// Least specific style among the members
    pub style: CommentStyle,
}

impl CommentGroup {
    /// Range from the first member's start to the last member's end
    pub fn span(&self) -> Range {
        match (self.ranges.first(), self.ranges.last()) {
            (Some(first), Some(last)) => first.cover(last),
            _ => Range::spanning(0, 0),
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let span = self.span();
        &source[span.start()..span.end()]
    }
}

/// Line terminators a gap may contain: the first comment's own line end plus
/// at most one blank line
const MAX_GAP_NEWLINES: usize = 2;

/// Whether the text between two comments lets them read as one unit
///
/// Whitespace only, spanning at most one blank line. Anything else keeps
/// them apart.
pub fn is_adjacent_gap(gap: &str) -> bool {
    gap.chars().all(char::is_whitespace) && gap.matches('\n').count() <= MAX_GAP_NEWLINES
}

/// Group lexer results into logical comments
pub fn merge_comments(text: &str, comments: &[RawComment]) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();
    let mut current: Option<(CommentGroup, RawComment)> = None;

    for comment in comments {
        let style = resolve_style(comment.text(text), comment.category);

        if let Some((group, last)) = current.as_mut() {
            let gap = &text[last.range.end()..comment.range.start()];
            if last.category == comment.category
                && comment.category.is_mergeable()
                && is_adjacent_gap(gap)
            {
                group.ranges.push(comment.range);
                group.style = group.style.join(style);
                *last = *comment;
                continue;
            }
        }

        if let Some((group, _)) = current.take() {
            groups.push(group);
        }
        current = Some((
            CommentGroup {
                ranges: vec![comment.range],
                style,
            },
            *comment,
        ));
    }

    if let Some((group, _)) = current {
        groups.push(group);
    }
    groups
}

/// Lex and merge in one call
pub fn find_comment_groups(text: &str) -> Vec<CommentGroup> {
    merge_comments(text, &find_comments(text))
}
