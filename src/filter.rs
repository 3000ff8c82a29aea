use crate::comment::Comment;

/// Decides which extracted comments reach the converter
pub trait CommentFilter: Send + Sync {
    fn is_valid(&self, comment: &Comment) -> bool;
}

impl<F> CommentFilter for F
where
    F: Fn(&Comment) -> bool + Send + Sync,
{
    fn is_valid(&self, comment: &Comment) -> bool {
        self(comment)
    }
}

/// Accepts every comment
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CommentFilter for AcceptAll {
    fn is_valid(&self, _comment: &Comment) -> bool {
        true
    }
}

/// Rejects comments already written in a Doxygen style
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipDoxygen;

impl CommentFilter for SkipDoxygen {
    fn is_valid(&self, comment: &Comment) -> bool {
        !comment.style().is_doxygen()
    }
}

/// Rejects comments not attached to a declaration
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireSymbol;

impl CommentFilter for RequireSymbol {
    fn is_valid(&self, comment: &Comment) -> bool {
        comment.symbol().is_some()
    }
}
