//! Turns conversion results into edits and splices them into the buffer.
//!
//! All ranges refer to the pristine buffer. Edits are validated as a whole
//! before any text is written, so a bad set never produces a partial rewrite.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comment::{extract, find_comment_groups, render, Comment, StyleCategory};
use crate::conversion::ConversionResult;
use crate::error::{EngineError, EngineResult};
use crate::range::TextReplacement;

/// Marker line separating preserved and new content in a merged block
pub const NEW_COMMENT: &str = "NEW_COMMENT";

/// How new comment text is placed relative to the original
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    /// Overwrite the original comment
    #[default]
    Replace,
    /// Keep the original and add the new comment on the next line
    Append,
    /// Merge both into one block when both are block comments, else `Append`
    AppendInline,
}

impl ReplaceMode {
    pub fn name(self) -> &'static str {
        match self {
            ReplaceMode::Replace => "replace",
            ReplaceMode::Append => "append",
            ReplaceMode::AppendInline => "append_inline",
        }
    }
}

impl fmt::Display for ReplaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplaceMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "replace" => Ok(ReplaceMode::Replace),
            "append" => Ok(ReplaceMode::Append),
            "append_inline" => Ok(ReplaceMode::AppendInline),
            other => Err(EngineError::config(format!("unknown replace mode `{other}`"))),
        }
    }
}

/// Builds edits for `Present` results in one [`ReplaceMode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Replacer {
    mode: ReplaceMode,
}

impl Replacer {
    pub fn new(mode: ReplaceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ReplaceMode {
        self.mode
    }

    /// One edit per `Present` result, in input order
    pub fn build(&self, results: &[(Comment, ConversionResult)]) -> Vec<TextReplacement> {
        results
            .iter()
            .filter_map(|(comment, result)| match result {
                ConversionResult::Present(text) => Some(self.replacement_for(comment, text)),
                _ => None,
            })
            .collect()
    }

    fn replacement_for(&self, comment: &Comment, new_text: &str) -> TextReplacement {
        let text = match self.mode {
            ReplaceMode::Replace => new_text.to_string(),
            ReplaceMode::Append => appended(comment, new_text),
            ReplaceMode::AppendInline => {
                merged_block(comment, new_text).unwrap_or_else(|| appended(comment, new_text))
            }
        };
        TextReplacement::new(comment.range(), text)
    }
}

fn appended(comment: &Comment, new_text: &str) -> String {
    format!("{}\n{}{}", comment.text(), comment.indentation(), new_text)
}

/// Old and new content in one block of the old style, or `None` unless both
/// comments are block comments
fn merged_block(comment: &Comment, new_text: &str) -> Option<String> {
    if comment.style().category() != StyleCategory::Block {
        return None;
    }
    let group = find_comment_groups(new_text).into_iter().next()?;
    if group.style.category() != StyleCategory::Block || group.text(new_text) != new_text.trim() {
        return None;
    }

    let old_content = comment.content().ok()?;
    let new_content = extract(group.text(new_text), group.style).ok()?;
    let merged = format!("{old_content}\n\n{NEW_COMMENT}\n{new_content}");
    Some(render(&merged, comment.style(), comment.indentation()))
}

/// Splice `replacements` into `text` in one pass
///
/// Ranges must be ascending, non-overlapping (touching is fine), inside the
/// buffer and on char boundaries. Any violation aborts with
/// [`EngineError::InvariantViolation`] and nothing is applied.
pub fn apply_replacements(text: &str, replacements: &[TextReplacement]) -> EngineResult<String> {
    let mut previous: Option<&TextReplacement> = None;
    for replacement in replacements {
        let range = replacement.range;
        if range.end() > text.len() {
            return Err(EngineError::out_of_bounds(range, text.len()));
        }
        if !text.is_char_boundary(range.start()) || !text.is_char_boundary(range.end()) {
            return Err(EngineError::InvariantViolation(format!(
                "range {range} splits a character"
            )));
        }
        if let Some(prev) = previous {
            if prev.range.end() > range.start() {
                return Err(EngineError::overlap(prev.range, range));
            }
        }
        previous = Some(replacement);
    }

    let added: usize = replacements.iter().map(|r| r.replacement.len()).sum();
    let mut out = String::with_capacity(text.len() + added);
    let mut cursor = 0;
    for replacement in replacements {
        out.push_str(&text[cursor..replacement.range.start()]);
        out.push_str(&replacement.replacement);
        cursor = replacement.range.end();
    }
    out.push_str(&text[cursor..]);

    debug!("Applied {} replacements", replacements.len());
    Ok(out)
}
