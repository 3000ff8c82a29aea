// WHY: Single left-to-right pass over bytes; every delimiter is ASCII so byte
// offsets always land on UTF-8 boundaries

use tracing::debug;

use super::style::StyleCategory;
use crate::range::Range;

/// Lexer states; `*Star` states have just seen a `*` that may close the comment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LexState {
    Start,
    Slash,
    Line,
    BlockInline,
    BlockInlineStar,
    Block,
    BlockStar,
}

/// A comment found by the lexer, before style resolution and merging
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawComment {
    pub range: Range,
    pub category: StyleCategory,
}

impl RawComment {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start()..self.range.end()]
    }
}

/// Find every comment in `text`, in ascending non-overlapping order
///
/// Does not understand string literals or the preprocessor. An unterminated
/// comment at end of input is closed at the buffer length.
pub fn find_comments(text: &str) -> Vec<RawComment> {
    let bytes = text.as_bytes();
    let mut comments = Vec::new();
    let mut state = LexState::Start;
    let mut start = 0usize;

    let mut emit = |start: usize, end: usize, category: StyleCategory| {
        comments.push(RawComment {
            range: Range::spanning(start, end),
            category,
        });
    };

    for (i, &byte) in bytes.iter().enumerate() {
        state = match (state, byte) {
            (LexState::Start, b'/') => {
                start = i;
                LexState::Slash
            }
            (LexState::Start, _) => LexState::Start,

            (LexState::Slash, b'/') => LexState::Line,
            (LexState::Slash, b'*') => LexState::BlockInline,
            (LexState::Slash, _) => LexState::Start,

            (LexState::Line, b'\n') => {
                emit(start, i, StyleCategory::Line);
                LexState::Start
            }
            (LexState::Line, _) => LexState::Line,

            (LexState::BlockInline, b'*') => LexState::BlockInlineStar,
            (LexState::BlockInline, b'\n') => LexState::Block,
            (LexState::BlockInline, _) => LexState::BlockInline,

            (LexState::BlockInlineStar, b'/') => {
                emit(start, i + 1, StyleCategory::BlockInline);
                LexState::Start
            }
            (LexState::BlockInlineStar, b'\n') => LexState::Block,
            // `**/` still closes the comment
            (LexState::BlockInlineStar, b'*') => LexState::BlockInlineStar,
            (LexState::BlockInlineStar, _) => LexState::BlockInline,

            (LexState::Block, b'*') => LexState::BlockStar,
            (LexState::Block, _) => LexState::Block,

            (LexState::BlockStar, b'/') => {
                emit(start, i + 1, StyleCategory::Block);
                LexState::Start
            }
            (LexState::BlockStar, b'*') => LexState::BlockStar,
            (LexState::BlockStar, _) => LexState::Block,
        };
    }

    let len = bytes.len();
    match state {
        LexState::Start | LexState::Slash => {}
        LexState::Line => emit(start, len, StyleCategory::Line),
        LexState::BlockInline | LexState::BlockInlineStar => {
            debug!("Unterminated comment at byte {} closed at end of input", start);
            emit(start, len, StyleCategory::BlockInline)
        }
        LexState::Block | LexState::BlockStar => {
            debug!("Unterminated block comment at byte {} closed at end of input", start);
            emit(start, len, StyleCategory::Block)
        }
    }

    comments
}
