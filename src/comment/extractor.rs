use tracing::debug;

use super::merger::find_comment_groups;
use super::symbols::{DeclarationScanner, SymbolProvider};
use super::Comment;
use crate::error::EngineResult;

/// Produces the comments of a source buffer, in ascending range order
pub trait CommentExtractor: Send + Sync {
    fn extract_comments(&self, code: &str) -> EngineResult<Vec<Comment>>;
}

/// Lexer + merger extraction with symbols from a [`SymbolProvider`]
#[derive(Debug, Clone, Default)]
pub struct SourceCommentExtractor<P: SymbolProvider = DeclarationScanner> {
    provider: P,
}

impl<P: SymbolProvider> SourceCommentExtractor<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl SourceCommentExtractor {
    /// Extractor backed by a [`DeclarationScanner`] that detects the language
    pub fn with_scanner() -> Self {
        Self::new(DeclarationScanner::default())
    }
}

impl<P: SymbolProvider> CommentExtractor for SourceCommentExtractor<P> {
    fn extract_comments(&self, code: &str) -> EngineResult<Vec<Comment>> {
        let groups = find_comment_groups(code);
        debug!("Found {} comment groups in {} bytes", groups.len(), code.len());

        let comments = groups
            .iter()
            .map(|group| {
                let symbol = self.provider.symbol_for(code, group.span());
                Comment::from_group(code, group, symbol)
            })
            .collect();
        Ok(comments)
    }
}
